use super::*;
use pretty_assertions::assert_eq;

fn kinds(src: &str) -> Vec<Token> {
    tokenize(src, 0)
        .unwrap_or_else(|e| panic!("lex error: {e}"))
        .into_iter()
        .map(|t| t.value)
        .collect()
}

#[test]
fn test_chain_sigils() {
    assert_eq!(
        kinds("a~@b =@c &.d $(0)+"),
        vec![
            Token::Ident("a".into()),
            Token::Tilde,
            Token::At,
            Token::Ident("b".into()),
            Token::Eq,
            Token::At,
            Token::Ident("c".into()),
            Token::Amp,
            Token::Dot,
            Token::Ident("d".into()),
            Token::Dollar,
            Token::LParen,
            Token::Int(0),
            Token::RParen,
            Token::Plus,
        ]
    );
}

#[test]
fn test_ident_suffixes_and_scoped_vars() {
    assert_eq!(
        kinds(r"even? sort! \ \1 \_ \name"),
        vec![
            Token::Ident("even?".into()),
            Token::Ident("sort!".into()),
            Token::ScopedIdent("\\".into()),
            Token::ScopedIdent("\\1".into()),
            Token::ScopedIdent("\\_".into()),
            Token::ScopedIdent("\\name".into()),
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("1 2.5 1e3 3.foo"),
        vec![
            Token::Int(1),
            Token::Float(2.5),
            Token::Float(1000.0),
            Token::Int(3),
            Token::Dot,
            Token::Ident("foo".into()),
        ]
    );
}

#[test]
fn test_string_with_nested_hole() {
    let toks = kinds(r#""Hello, #{ "world" }!" x"#);
    assert_eq!(
        toks,
        vec![
            Token::Str(r#"Hello, #{ "world" }!"#.into()),
            Token::Ident("x".into()),
        ]
    );
}

#[test]
fn test_raw_char_and_sym() {
    assert_eq!(
        kinds("`a\"b` ?c 'sym '+ '<=>"),
        vec![
            Token::RawStr("a\"b".into()),
            Token::Char("c".into()),
            Token::Sym("sym".into()),
            Token::Sym("+".into()),
            Token::Sym("<=>".into()),
        ]
    );
}

#[test]
fn test_comments_and_newlines() {
    assert_eq!(
        kinds("a # note {x}\nb; c"),
        vec![
            Token::Ident("a".into()),
            Token::Newline,
            Token::Ident("b".into()),
            Token::Semicolon,
            Token::Ident("c".into()),
        ]
    );
}

#[test]
fn test_compound_assign_and_operators() {
    assert_eq!(
        kinds("a += 1; b //= 2; c <=> d /& e"),
        vec![
            Token::Ident("a".into()),
            Token::CompoundAssign("+".into()),
            Token::Int(1),
            Token::Semicolon,
            Token::Ident("b".into()),
            Token::CompoundAssign("//".into()),
            Token::Int(2),
            Token::Semicolon,
            Token::Ident("c".into()),
            Token::Spaceship,
            Token::Ident("d".into()),
            Token::BitAnd,
            Token::Ident("e".into()),
        ]
    );
}

#[test]
fn test_collection_openers() {
    assert_eq!(
        kinds("<{|| 1}> %{} <> {||}"),
        vec![
            Token::IterOpen,
            Token::OrOr,
            Token::Int(1),
            Token::IterClose,
            Token::MapOpen,
            Token::RBrace,
            Token::Diamond,
            Token::LBrace,
            Token::OrOr,
            Token::RBrace,
        ]
    );
}

#[test]
fn test_unterminated_string_is_an_error() {
    let err = tokenize("x := \"abc", 0);
    assert!(matches!(err, Err(LexError::UnterminatedStr { .. })));
}

#[test]
fn test_base_offset_applies_to_spans() {
    let toks = tokenize("ab", 10).unwrap_or_default();
    assert_eq!(toks[0].span, Span::new(10, 12));
}

#[test]
fn test_unescape() {
    assert_eq!(unescape(r"a\nb\t\\\q"), "a\nb\t\\\\q");
    assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
}

#[test]
fn test_str_pieces_split_holes() {
    let raw = r#"abc#{1}def#{ "x#{y}" }ghi"#;
    assert_eq!(
        str_pieces(raw),
        vec![
            StrPiece::Text("abc"),
            StrPiece::Hole { code: "1", offset: 5 },
            StrPiece::Text("def"),
            StrPiece::Hole {
                code: r#" "x#{y}" "#,
                offset: 12,
            },
            StrPiece::Text("ghi"),
        ]
    );
}

#[test]
fn test_escaped_hole_is_text() {
    assert_eq!(str_pieces(r"a\#{b}"), vec![StrPiece::Text(r"a\#{b}")]);
}

#[test]
fn test_token_display() {
    assert_eq!(Token::Spaceship.to_string(), "<=>");
    assert_eq!(Token::Ident("foo".into()).to_string(), "foo");
    assert_eq!(Token::IterClose.to_string(), "}>");
}
