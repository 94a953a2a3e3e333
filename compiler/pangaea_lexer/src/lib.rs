//! Tokenizer for Pangaea scripts.
//!
//! Built on `logos`. Newlines are significant (they separate statements);
//! other whitespace and `#` comments are skipped. Double-quoted strings may
//! embed `#{ expr }` holes containing arbitrary code, including nested
//! strings, so they are scanned by hand rather than by a regex. The token
//! keeps the raw text between the quotes; the parser splits holes and
//! resolves escapes.

mod lexer;

pub use lexer::{str_pieces, tokenize, unescape, LexError, Spanned, SpannedToken, StrPiece, Token};
