use pangaea_ir::{ExprKind, StmtKind};
use pretty_assertions::assert_eq;

use super::*;

fn display(src: &str) -> String {
    match parse(src) {
        Ok(program) => program.to_string(),
        Err(e) => panic!("failed to parse {src:?}: {e}"),
    }
}

fn check(cases: &[(&str, &str)]) {
    for (src, expected) in cases {
        assert_eq!(display(src), *expected, "source: {src}");
    }
}

#[test]
fn test_prefix_precedence() {
    check(&[
        ("-3+1", "((-3) + 1)"),
        ("-(3+1)", "(-(3 + 1))"),
        ("!3-1", "((!3) - 1)"),
        ("-3**1", "((-3) ** 1)"),
        ("--1", "(-(-1))"),
        ("+-1", "(+(-1))"),
        ("-1---1", "((-1) - (-(-1)))"),
    ]);
}

#[test]
fn test_infix_precedence() {
    check(&[
        ("1 + 2 * 3", "(1 + (2 * 3))"),
        ("1 * 2 + 3", "((1 * 2) + 3)"),
        ("2 ** 3 ** 2", "(2 ** (3 ** 2))"),
        ("a || b && c", "(a || (b && c))"),
        ("1 < 2 == true", "((1 < 2) == true)"),
        ("1 << 2 + 3", "(1 << (2 + 3))"),
        ("a /| b /& c", "(a /| (b /& c))"),
        ("1 +\n  2", "(1 + 2)"),
    ]);
}

#[test]
fn test_chain_precedence() {
    check(&[
        ("-3.even?", "(-3).even?()"),
        ("2.p ** 3.q", "(2.p() ** 3.q())"),
        ("10.find {|a| a+b}.sum", "10.find({|a| (a + b)}).sum()"),
        ("10.find(1) {|a| a+b}.sum", "10.find(1, {|a| (a + b)}).sum()"),
        (
            "10.find(1, 2) {|a| a+b} {|c| c+d}.sum",
            "10.find(1, 2, {|a| (a + b)}, {|c| (c + d)}).sum()",
        ),
        ("(4-3).even?", "(4 - 3).even?()"),
        ("a.b.c", "a.b().c()"),
    ]);
}

#[test]
fn test_chain_sigils() {
    check(&[
        ("x&.foo", "x&.foo()"),
        ("[1]~@bar", "[1]~@bar()"),
        ("[1]=@bar", "[1]=@bar()"),
        ("[1, 2, 3]$(0)+", "[1, 2, 3]$(0)+()"),
        ("[1, 2]@{|x| x * 2}", "[1, 2]@{|x| (x * 2)}"),
        ("a.^f", "a.^f"),
        ("a~$(1)^f", "a~$(1)^f"),
        (".foo", ".foo()"),
        ("@{|x| x}", "@{|x| x}"),
        ("1.+(2)", "1.+(2)"),
        ("o.m{|a| a}", "o.{|self, a| a}"),
    ]);
}

#[test]
fn test_call_args() {
    check(&[
        ("f(1)", "f.call(1)"),
        ("f(1, k: 2)", "f.call(1, k: 2)"),
        ("a.b(y: 1, x: 2)", "a.b(x: 2, y: 1)"),
        ("f(*a, **o)", "f.call((*a), (**o))"),
        ("f(\n  1,\n  2,\n)", "f.call(1, 2)"),
        ("{|i| i}(1)", "{|i| i}.call(1)"),
    ]);
}

#[test]
fn test_subscripts() {
    check(&[
        ("-[1,2,3][0]", "(-[1, 2, 3].at([0]))"),
        ("5[0:3]", "5.at([(0:3:)])"),
        ("a[::-1]", "a.at([(::(-1))])"),
        ("a[1, 2]", "a.at([1, 2])"),
        ("a[0][1]", "a.at([0]).at([1])"),
    ]);
}

#[test]
fn test_assignment() {
    check(&[
        ("a := 1 + 2", "(a := (1 + 2))"),
        ("a += 1", "(a := (a + 1))"),
        ("a ||= b", "(a := (a || b))"),
        ("1 + 2 => a", "(a := (1 + 2))"),
        ("a := b := 3", "(a := (b := 3))"),
    ]);
}

#[test]
fn test_if_expression() {
    check(&[
        ("1 if c else 2", "(1 if c else 2)"),
        ("1 if c", "(1 if c)"),
        ("1 if a else 2 if b else 3", "(1 if a else (2 if b else 3))"),
    ]);
}

#[test]
fn test_literals() {
    check(&[
        ("1", "1"),
        ("1.5", "1.5"),
        ("\"a\\nb\"", "\"a\\nb\""),
        ("`raw#{x}`", "`raw#{x}`"),
        ("?a", "\"a\""),
        ("'even?", "'even?"),
        ("(1:10:2)", "(1:10:2)"),
        ("(:5)", "(:5:)"),
        ("[*a, 1]", "[(*a), 1]"),
        ("{a: 1, **o}", "{\"a\": 1, **o}"),
        ("{^k: 1}", "{^k: 1}"),
        ("%{1: 2, a: b}", "%{1: 2, a: b}"),
        ("{}", "{}"),
        ("<>", "<>"),
        ("\\", "\\"),
        ("\\1 + \\foo", "(\\1 + \\foo)"),
    ]);
}

#[test]
fn test_embedded_str() {
    check(&[
        (
            "\"abc#{1}def#{1+1}ghi#{foo.bar}jkl\"",
            "\"abc#{ 1 }def#{ (1 + 1) }ghi#{ foo.bar() }jkl\"",
        ),
        ("\"#{\"in\"}\"", "\"#{ \"in\" }\""),
    ]);
}

#[test]
fn test_func_literals() {
    check(&[
        ("{|| }", "{|| }"),
        ("{|a, b| a}", "{|a, b| a}"),
        ("{|a, k: 1| a}", "{|a, k: 1| a}"),
        ("{|a| a; b}", "{|a|\na\nb\n}"),
        ("m{c}", "{|self| c}"),
        ("m{|a| c}", "{|self, a| c}"),
        ("<{|a| yield a; recur(a + 1)}>", "<{|a|\nyield a\nrecur.call((a + 1))\n}>"),
    ]);
}

#[test]
fn test_jump_statements() {
    check(&[
        ("return 1", "return 1"),
        ("return", "return "),
        ("raise Err.new(\"x\")", "raise Err.new(\"x\")"),
        ("yield a if c", "yield a if c"),
        ("defer a.p", "defer a.p()"),
        ("return 1 if c else 2", "return (1 if c else 2)"),
        ("return if c", "return  if c"),
    ]);
}

#[test]
fn test_statement_separators() {
    let program = parse("a := 1; b := 2\n\n# comment\nc").unwrap_or_default();
    assert_eq!(program.stmts.len(), 3);
}

#[test]
fn test_source_positions() {
    let program = parse("1\n  foo.bar").unwrap_or_default();
    let stmt = &program.stmts[1];
    assert_eq!(stmt.src.pos.line, 1);
    assert_eq!(stmt.src.pos.col, 2);
    assert_eq!(&*stmt.src.line, "  foo.bar");
    assert!(matches!(stmt.kind, StmtKind::Expr(_)));
}

#[test]
fn test_hole_positions_point_into_source() {
    let program = parse("\"ab#{x}\"").unwrap_or_default();
    let StmtKind::Expr(expr) = &program.stmts[0].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::EmbeddedStr { segments, .. } = &expr.kind else {
        panic!("expected embedded string, got {expr}");
    };
    assert_eq!(segments[0].expr.src.pos.col, 5);
}

#[test]
fn test_syntax_errors() {
    assert!(matches!(parse("(1"), Err(ParseError::UnexpectedEof { .. })));
    assert!(matches!(parse("1 2"), Err(ParseError::Unexpected { .. })));
    assert!(matches!(parse("\"abc"), Err(ParseError::Lex(_))));
    assert!(matches!(parse("{|a| a"), Err(ParseError::UnexpectedEof { .. })));
}
