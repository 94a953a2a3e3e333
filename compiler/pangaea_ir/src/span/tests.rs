use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_position_display_is_one_based() {
    assert_eq!(Position::new(0, 0).to_string(), "line: 1, col: 1");
    assert_eq!(Position::new(2, 4).to_string(), "line: 3, col: 5");
}

#[test]
fn test_line_index_resolves_offsets() {
    let index = LineIndex::new("a := 1\nb := a.foo\n");
    let src = index.source(Span::new(12, 15));
    assert_eq!(src.pos, Position::new(1, 5));
    assert_eq!(&*src.line, "b := a.foo");
    assert_eq!(src.trace_segment(), "line: 2, col: 6\nb := a.foo");
}

#[test]
fn test_line_index_counts_chars_not_bytes() {
    let index = LineIndex::new("\"日本\".x");
    let src = index.source(Span::new(8, 10));
    assert_eq!(src.pos, Position::new(0, 4));
}

#[test]
fn test_span_merge() {
    assert_eq!(Span::new(3, 5).merge(Span::new(1, 4)), Span::new(1, 5));
    assert_eq!(Span::from_range(2..9).to_range(), 2..9);
}
