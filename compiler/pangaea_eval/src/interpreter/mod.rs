//! Tree-walking interpreter for Pangaea.
//!
//! # Architecture
//!
//! Every expression goes through [`Interpreter::eval_expr`], which grows the
//! stack when needed and appends the node's source location to any error
//! passing through it. The pieces:
//!
//! - `dispatch` - prototype walk, prop calls, `_missing`, tracing a value to
//!   the built-in it was born from
//! - `expr` - literals, identifiers, operators, if-expressions
//! - `stmts` - statement sequencing with `return`/`yield`/`defer`/`raise`
//! - `chain` - the chain-call engine (`.`/`@`/`$` x vanilla/`&`/`~`/`=`)
//! - `call` - argument evaluation and binding, func invocation
//! - `iter` - iterator resumption, `recur`, `Iter.new`
//!
//! Native props live in `crate::props` and call back into the interpreter
//! through the public helpers defined here.

mod builder;
mod call;
mod chain;
mod dispatch;
mod expr;
mod interned_names;
mod iter;
mod stmts;

pub use builder::{InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};

pub(crate) use interned_names::SymNames;
pub(crate) use stmts::Outcome;

use std::cell::Cell;

use pangaea_ir::Program;

use crate::environment::Env;
use crate::errors::EvalResult;
use crate::io::IoHandles;
use crate::protos::Protos;
use crate::value::Value;

pub struct Interpreter {
    protos: Protos,
    names: SymNames,
    io: IoHandles,
    argv: Vec<String>,
    /// Func and iter bodies currently running.
    call_depth: Cell<usize>,
    max_call_depth: usize,
}

impl Interpreter {
    /// An interpreter on process stdio.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub fn protos(&self) -> &Protos {
        &self.protos
    }

    #[inline]
    pub(crate) fn names(&self) -> &SymNames {
        &self.names
    }

    pub fn io(&self) -> &IoHandles {
        &self.io
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// A fresh top-level env: prototypes, Kernel props and `IO`.
    pub fn global_env(&self) -> Env {
        let env = Env::new();
        for (name, value) in self.protos.globals() {
            env.set(name, value);
        }
        if let Value::Obj(kernel) = &self.protos.kernel {
            for (name, value) in kernel.public_pairs() {
                env.set(name, value.clone());
            }
        }
        env.inject_io(self.io.clone());
        env
    }

    /// Parse and evaluate `source` in a fresh global env.
    pub fn eval_source(&self, source: &str) -> EvalResult {
        self.eval_source_in(source, &self.global_env())
    }

    /// Parse and evaluate `source` in `env`. Syntax errors become SyntaxErr.
    pub fn eval_source_in(&self, source: &str, env: &Env) -> EvalResult {
        let program = pangaea_parse::parse(source)?;
        self.eval_program(&program, env)
    }

    /// Evaluate a parsed program; the value of its last statement.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = program.stmts.len()))]
    pub fn eval_program(&self, program: &Program, env: &Env) -> EvalResult {
        let outcome = self.eval_stmts(&program.stmts, env);
        if let Err(e) = &outcome {
            tracing::debug!(kind = %e.kind, message = %e.message, "program raised");
        }
        outcome.map(Outcome::into_value)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
