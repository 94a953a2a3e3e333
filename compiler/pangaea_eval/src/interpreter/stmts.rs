//! Statement sequencing and jump statements.

use smallvec::SmallVec;

use pangaea_ir::{Expr, JumpKind, Stmt, StmtKind};

use super::Interpreter;
use crate::environment::Env;
use crate::errors::{stop_iter_err, type_err, EvalError, EvalResult};
use crate::value::Value;

/// What one statement asks of the enclosing body.
pub(crate) enum Flow<'a> {
    Value(Value),
    Return(Value),
    Yield(Value),
    /// Run this expression once the body is done.
    Defer(&'a Expr),
}

/// How a body finished.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Ran off the end; the last statement's value.
    Completed(Value),
    Returned(Value),
    Yielded(Value),
}

impl Outcome {
    pub(crate) fn into_value(self) -> Value {
        match self {
            Outcome::Completed(v) | Outcome::Returned(v) | Outcome::Yielded(v) => v,
        }
    }
}

impl Interpreter {
    /// Evaluate a body.
    ///
    /// `return` stops the body; `yield` records its first value and keeps
    /// going. Deferred expressions run afterwards in registration order, also
    /// after an error, and an error they raise replaces the outcome. A return
    /// value wins over a yielded one.
    pub(crate) fn eval_stmts(&self, stmts: &[Stmt], env: &Env) -> EvalResult<Outcome> {
        let mut deferred: SmallVec<[&Expr; 2]> = SmallVec::new();
        let mut last = Value::Nil;
        let mut yielded = None;
        let mut returned = None;
        let mut error = None;

        for stmt in stmts {
            match self.eval_stmt(stmt, env) {
                Ok(Flow::Value(v)) => last = v,
                Ok(Flow::Return(v)) => {
                    returned = Some(v);
                    break;
                }
                Ok(Flow::Yield(v)) => {
                    if yielded.is_none() {
                        yielded = Some(v);
                    }
                }
                Ok(Flow::Defer(expr)) => deferred.push(expr),
                Err(e) => {
                    error = Some(e);
                    break;
                }
            }
        }

        for expr in deferred {
            if let Err(e) = self.eval_expr(expr, env) {
                error = Some(e);
            }
        }

        if let Some(e) = error {
            return Err(e);
        }
        Ok(match (returned, yielded) {
            (Some(v), _) => Outcome::Returned(v),
            (None, Some(v)) => Outcome::Yielded(v),
            (None, None) => Outcome::Completed(last),
        })
    }

    fn eval_stmt<'a>(&self, stmt: &'a Stmt, env: &Env) -> EvalResult<Flow<'a>> {
        let flow = match &stmt.kind {
            StmtKind::Expr(expr) => self.eval_expr(expr, env).map(Flow::Value),
            StmtKind::Jump { kind, value } => self.eval_jump(*kind, value.as_ref(), env),
            StmtKind::JumpIf { kind, value, cond } => {
                self.eval_jump_if(*kind, value.as_ref(), cond, env)
            }
        };
        flow.map_err(|e| e.with_trace(&stmt.src))
    }

    fn eval_jump<'a>(
        &self,
        kind: JumpKind,
        value: Option<&'a Expr>,
        env: &Env,
    ) -> EvalResult<Flow<'a>> {
        if kind == JumpKind::Defer {
            return Ok(value.map_or(Flow::Value(Value::Nil), Flow::Defer));
        }
        let v = match value {
            Some(expr) => self.eval_expr(expr, env)?,
            None => Value::Nil,
        };
        match kind {
            JumpKind::Return => Ok(Flow::Return(v)),
            JumpKind::Yield => Ok(Flow::Yield(v)),
            JumpKind::Raise => Err(self.raised(&v)),
            JumpKind::Defer => Ok(Flow::Value(Value::Nil)),
        }
    }

    /// `jump value if cond`. A false condition is a no-op, except that a
    /// conditional `yield` ends the iteration.
    fn eval_jump_if<'a>(
        &self,
        kind: JumpKind,
        value: Option<&'a Expr>,
        cond: &Expr,
        env: &Env,
    ) -> EvalResult<Flow<'a>> {
        let c = self.eval_expr(cond, env)?;
        if self.is_truthy(env, &c)? {
            return self.eval_jump(kind, value, env);
        }
        match kind {
            JumpKind::Yield => Err(stop_iter_err()),
            _ => Ok(Flow::Value(Value::Nil)),
        }
    }

    /// The error a `raise` of `value` propagates.
    fn raised(&self, value: &Value) -> EvalError {
        match self.trace_err(value) {
            Some(err) => EvalError {
                stack_trace: String::new(),
                ..(*err).clone()
            },
            None => type_err(format!("`{}` cannot be raised", value.inspect())),
        }
    }
}
