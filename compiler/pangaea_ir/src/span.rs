//! Source locations.
//!
//! [`Span`] is the byte range a node covers and feeds diagnostic rendering.
//! [`Source`] is what the evaluator appends to an error's stack trace: the
//! 0-based line/column plus the full text of that line.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

/// Byte range in the script text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Convert a lexer range, saturating offsets beyond `u32::MAX`.
    pub fn from_range(range: Range<usize>) -> Self {
        let clamp = |v: usize| u32::try_from(v).unwrap_or(u32::MAX);
        Span {
            start: clamp(range.start),
            end: clamp(range.end),
        }
    }

    /// Smallest span covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Zero-based line and column (in chars).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub const fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line: {}, col: {}", self.line + 1, self.col + 1)
    }
}

/// Location of a node as shown in stack traces.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Source {
    /// Full text of the line the node starts on.
    pub line: Rc<str>,
    pub pos: Position,
    pub span: Span,
}

impl Source {
    pub fn new(line: Rc<str>, pos: Position, span: Span) -> Self {
        Source { line, pos, span }
    }

    /// Placeholder for synthesized nodes.
    pub fn dummy() -> Self {
        Source {
            line: Rc::from(""),
            pos: Position::default(),
            span: Span::DUMMY,
        }
    }

    /// The stack-trace segment for this location: position, newline, line text.
    pub fn trace_segment(&self) -> String {
        format!("{}\n{}", self.pos, self.line)
    }
}

/// Maps byte offsets of one script to [`Source`] values.
///
/// Line texts are shared between all nodes on the same line.
#[derive(Clone, Debug)]
pub struct LineIndex {
    starts: Vec<usize>,
    lines: Vec<Rc<str>>,
    text: Rc<str>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        let lines = text.split('\n').map(|l| Rc::from(l.trim_end_matches('\r'))).collect();
        LineIndex {
            starts,
            lines,
            text: Rc::from(text),
        }
    }

    /// Source location of the byte offset `span.start`.
    pub fn source(&self, span: Span) -> Source {
        let offset = (span.start as usize).min(self.text.len());
        let line = self.starts.partition_point(|&s| s <= offset).saturating_sub(1);
        let line_start = self.starts[line];
        let col = self
            .text
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Source {
            line: Rc::clone(&self.lines[line]),
            pos: Position::new(
                u32::try_from(line).unwrap_or(u32::MAX),
                u32::try_from(col).unwrap_or(u32::MAX),
            ),
            span,
        }
    }
}

#[cfg(test)]
mod tests;
