//! `InterpreterBuilder` for creating Interpreter instances.

use std::cell::Cell;

use super::interned_names::SymNames;
use super::Interpreter;
use crate::io::IoHandles;
use crate::props::PropContainer;
use crate::protos::Protos;

/// Nested calls allowed unless [`InterpreterBuilder::max_call_depth`] says
/// otherwise.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 5_000;

/// Builder for [`Interpreter`].
///
/// Defaults to process stdio, an empty `Kernel.argv` and
/// [`DEFAULT_MAX_CALL_DEPTH`].
pub struct InterpreterBuilder {
    io: Option<IoHandles>,
    argv: Vec<String>,
    max_call_depth: usize,
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        InterpreterBuilder {
            io: None,
            argv: Vec::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder::default()
    }

    /// Handles behind `IO`, `p` and `<>`.
    #[must_use]
    pub fn io(mut self, io: IoHandles) -> Self {
        self.io = Some(io);
        self
    }

    /// Script arguments exposed as `Kernel.argv`.
    #[must_use]
    pub fn argv(mut self, argv: Vec<String>) -> Self {
        self.argv = argv;
        self
    }

    /// Func calls that may be in progress at once; one more raises
    /// `Err` instead of exhausting memory.
    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn build(self) -> Interpreter {
        let container = PropContainer::with_builtins();
        let protos = Protos::new(&container);
        Interpreter {
            protos,
            names: SymNames::new(pangaea_ir::interner()),
            io: self.io.unwrap_or_default(),
            argv: self.argv,
            call_depth: Cell::new(0),
            max_call_depth: self.max_call_depth,
        }
    }
}
