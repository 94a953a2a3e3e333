//! Recursive-descent parser for Pangaea.
//!
//! Produces a [`pangaea_ir::Program`]. Every node carries the [`pangaea_ir::Source`]
//! of its first token so runtime errors can report where they happened.
//!
//! Desugarings performed here:
//! - `x[i, j]` becomes `x.at([i, j])`; bare ranges are allowed inside the brackets
//! - `f(args)` becomes `f.call(args)`
//! - `a op= b` becomes `a := a op b`
//! - `m{...}` becomes a func literal whose first parameter is `self`
//! - a func literal right after a prop call's arguments is appended to them

mod cursor;
mod error;
mod grammar;

pub use error::ParseError;

use pangaea_ir::{LineIndex, Program};
use pangaea_lexer::tokenize;

use cursor::Cursor;
use grammar::Parser;

/// Parse a whole script.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let tokens = tokenize(source, 0)?;
    let lines = LineIndex::new(source);
    let mut parser = Parser::new(Cursor::new(tokens, source.len()), &lines);
    let program = parser.parse_program()?;
    tracing::debug!(stmts = program.stmts.len(), "parsed program");
    Ok(program)
}

#[cfg(test)]
mod tests;
