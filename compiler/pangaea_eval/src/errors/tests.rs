use pangaea_ir::{LineIndex, Span};
use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_err_kind_index_matches_all() {
    for (i, kind) in ErrKind::ALL.iter().enumerate() {
        assert_eq!(kind.index(), i, "{kind}");
    }
}

#[test]
fn test_display_is_kind_and_message() {
    let e = value_err("bad value");
    assert_eq!(e.to_string(), "ValueErr: bad value");
    assert_eq!(zero_division_err().to_string(), "ZeroDivisionErr: cannot be divided by 0");
}

#[test]
fn test_with_trace_appends_segments() {
    let index = LineIndex::new("a := 1\nb.foo");
    let e = name_err("x")
        .with_trace(&index.source(Span::new(7, 12)))
        .with_trace(&index.source(Span::new(0, 6)));
    assert_eq!(
        e.stack_trace,
        "line: 2, col: 1\nb.foo\nline: 1, col: 1\na := 1"
    );
}

#[test]
fn test_with_trace_skips_repeated_suffix() {
    let index = LineIndex::new("f(f(1))");
    let src = index.source(Span::new(0, 7));
    let e = type_err("x").with_trace(&src).with_trace(&src).with_trace(&src);
    assert_eq!(e.stack_trace, "line: 1, col: 1\nf(f(1))");
}

#[test]
fn test_report_without_trace() {
    assert_eq!(assertion_err("1 != 2").report(), "AssertionErr: 1 != 2");
}

#[test]
fn test_report_with_trace() {
    let index = LineIndex::new("raise 1");
    let e = type_err("`1` cannot be raised").with_trace(&index.source(Span::new(0, 7)));
    assert_eq!(
        e.report(),
        "TypeErr: `1` cannot be raised\nline: 1, col: 1\nraise 1"
    );
}

#[test]
fn test_arity_err_pluralizes() {
    assert_eq!(arity_err("Int#B", 1).message, "Int#B requires at least 1 arg");
    assert_eq!(arity_err("Int#+", 2).message, "Int#+ requires at least 2 args");
}

#[test]
fn test_cannot_treat_inspects_value() {
    let e = cannot_treat(&Value::str("a"), "int");
    assert_eq!(e.kind, ErrKind::TypeErr);
    assert_eq!(e.message, "\"a\" cannot be treated as int");
}

#[test]
fn test_parse_error_becomes_syntax_err() {
    let Err(parse_error) = pangaea_parse::parse("1 +") else {
        panic!("`1 +` must not parse");
    };
    let e = EvalError::from(parse_error);
    assert_eq!(e.kind, ErrKind::SyntaxErr);
    assert!(!e.is_stop_iter());
}
