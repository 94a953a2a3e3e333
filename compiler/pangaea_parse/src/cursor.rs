//! Token cursor: lookahead, consumption and adjacency checks.

use pangaea_ir::Span;
use pangaea_lexer::{SpannedToken, Token};

use crate::ParseError;

pub(crate) struct Cursor {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Zero-width span at end of input, reported for EOF errors.
    eof: Span,
}

impl Cursor {
    pub(crate) fn new(tokens: Vec<SpannedToken>, end: usize) -> Self {
        let end = Span::from_range(end..end);
        let eof = tokens.last().map_or(end, |t| Span::new(t.span.end, t.span.end));
        Cursor {
            tokens,
            pos: 0,
            eof,
        }
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<&Token> {
        self.peek_nth(0)
    }

    #[inline]
    pub(crate) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|t| &t.value)
    }

    /// Span of the current token, or the end-of-input span.
    pub(crate) fn span(&self) -> Span {
        self.tokens.get(self.pos).map_or(self.eof, |t| t.span)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    #[inline]
    pub(crate) fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, token: &Token, expected: &'static str) -> Result<Span, ParseError> {
        if self.check(token) {
            let span = self.span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.pos += 1;
        }
    }

    /// Whether the current token starts exactly where the previous one ended.
    pub(crate) fn adjacent(&self) -> bool {
        match (self.pos.checked_sub(1).and_then(|p| self.tokens.get(p)), self.tokens.get(self.pos)) {
            (Some(prev), Some(cur)) => prev.span.end == cur.span.start,
            _ => false,
        }
    }

    pub(crate) fn unexpected(&self, expected: &'static str) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(tok) => ParseError::Unexpected {
                found: tok.value.to_string(),
                expected,
                span: tok.span,
            },
            None => ParseError::UnexpectedEof {
                expected,
                span: self.eof,
            },
        }
    }
}

#[cfg(test)]
mod tests;
