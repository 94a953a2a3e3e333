//! Syntax error rendering.
//!
//! Runtime errors carry their own `line: L, col: C` trace and are printed as
//! is; syntax errors are rendered against the source with `ariadne` so the
//! offending span is underlined.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use pangaea_parse::ParseError;

/// Render `error` as a report over `source`, named `name` in the header.
///
/// Output is uncolored so it reads the same on a terminal, in a pipe and in
/// test runner logs.
pub fn render_parse_error(name: &str, source: &str, error: &ParseError) -> String {
    let range = clamp(error.span().to_range(), source.len());
    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, name, range.start)
        .with_config(Config::default().with_color(false))
        .with_message(format!("SyntaxErr: {error}"))
        .with_label(Label::new((name, range)).with_message(error.to_string()))
        .finish()
        .write((name, Source::from(source)), &mut buf);
    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(e) => {
            tracing::warn!("failed to render syntax error: {e}");
            format!("SyntaxErr: {error}")
        }
    }
}

fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    start..range.end.clamp(start, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        match pangaea_parse::parse(source) {
            Ok(_) => panic!("{source:?} must not parse"),
            Err(e) => render_parse_error("script.pg", source, &e),
        }
    }

    #[test]
    fn test_report_names_file_and_quotes_line() {
        let out = render("a := 1\nb := (1 + ]");
        assert!(out.contains("SyntaxErr: "), "{out}");
        assert!(out.contains("script.pg"), "{out}");
        assert!(out.contains("b := (1 + ]"), "{out}");
    }

    #[test]
    fn test_report_at_end_of_input() {
        let out = render("1 +");
        assert!(out.contains("unexpected end of input"), "{out}");
    }

    #[test]
    fn test_clamp_keeps_range_inside_source() {
        assert_eq!(clamp(3..10, 5), 3..5);
        assert_eq!(clamp(7..9, 5), 5..5);
        assert_eq!(clamp(1..2, 5), 1..2);
    }
}
