//! Pangaea IR - shared data structures for the interpreter pipeline.
//!
//! - [`Name`]: interned symbol, the key of every Obj pair and env binding
//! - [`Span`], [`Position`], [`Source`]: source locations for diagnostics and stack traces
//! - [`ast`]: the tree handed from the parser to the evaluator
//!
//! The AST renders back to source form through `Display`; parser tests compare
//! against that rendering.

pub mod ast;
mod interner;
mod name;
mod span;

pub use ast::{
    AdditionalChain, Chain, Expr, ExprKind, FuncComponent, JumpKind, MainChain, Pair, Program,
    Stmt, StmtKind, StrSegment,
};
pub use interner::{interner, InternError, StringInterner};
pub use name::Name;
pub use span::{LineIndex, Position, Source, Span};
