use super::*;
use pangaea_lexer::tokenize;
use pretty_assertions::assert_eq;

fn cursor(src: &str) -> Cursor {
    Cursor::new(tokenize(src, 0).unwrap_or_default(), src.len())
}

#[test]
fn test_peek_and_advance() {
    let mut c = cursor("a.b");
    assert_eq!(c.peek(), Some(&Token::Ident("a".into())));
    assert_eq!(c.peek_nth(1), Some(&Token::Dot));
    c.advance();
    assert!(c.eat(&Token::Dot));
    assert!(!c.eat(&Token::Dot));
    c.advance();
    assert!(c.at_end());
    assert_eq!(c.span(), Span::new(3, 3));
}

#[test]
fn test_adjacency() {
    let mut c = cursor("f(1) g (2)");
    c.advance();
    assert!(c.adjacent());
    c.advance();
    c.advance();
    c.advance();
    c.advance();
    assert!(!c.adjacent());
}

#[test]
fn test_unexpected_reports_found_token() {
    let c = cursor(")");
    let err = c.unexpected("expression");
    assert_eq!(err.to_string(), "unexpected `)`, expected expression");
    assert_eq!(err.span(), Span::new(0, 1));
}

#[test]
fn test_eof_error() {
    let c = cursor("");
    assert!(matches!(c.unexpected("`]`"), ParseError::UnexpectedEof { .. }));
}
