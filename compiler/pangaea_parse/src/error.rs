use pangaea_ir::Span;
use pangaea_lexer::LexError;

/// Syntax error with the span it refers to.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected `{found}`, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        span: Span,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::Unexpected { span, .. } | ParseError::UnexpectedEof { span, .. } => *span,
        }
    }
}
