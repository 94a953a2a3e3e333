//! Runtime errors.
//!
//! Errors travel up the evaluator as the `Err` side of [`EvalResult`]. Each
//! node that sees one on the way out appends its source location to
//! `stack_trace`, unless the trace already ends with that exact segment, so a
//! tight recursive loop does not repeat the same line thousands of times.
//!
//! When a script needs an error as a plain value (`Err.new("x")`), it is
//! wrapped in `Value::Err` and only becomes a propagating error again on
//! `raise`.

use std::fmt;

use pangaea_ir::Source;

use crate::Value;

/// The closed set of error kinds. Each has a prototype object of the same name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrKind {
    Err,
    AssertionErr,
    NameErr,
    NoPropErr,
    NotImplementedErr,
    StopIterErr,
    SyntaxErr,
    TypeErr,
    ValueErr,
    ZeroDivisionErr,
    FileNotFoundErr,
}

impl ErrKind {
    pub const ALL: [ErrKind; 11] = [
        ErrKind::Err,
        ErrKind::AssertionErr,
        ErrKind::NameErr,
        ErrKind::NoPropErr,
        ErrKind::NotImplementedErr,
        ErrKind::StopIterErr,
        ErrKind::SyntaxErr,
        ErrKind::TypeErr,
        ErrKind::ValueErr,
        ErrKind::ZeroDivisionErr,
        ErrKind::FileNotFoundErr,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ErrKind::Err => "Err",
            ErrKind::AssertionErr => "AssertionErr",
            ErrKind::NameErr => "NameErr",
            ErrKind::NoPropErr => "NoPropErr",
            ErrKind::NotImplementedErr => "NotImplementedErr",
            ErrKind::StopIterErr => "StopIterErr",
            ErrKind::SyntaxErr => "SyntaxErr",
            ErrKind::TypeErr => "TypeErr",
            ErrKind::ValueErr => "ValueErr",
            ErrKind::ZeroDivisionErr => "ZeroDivisionErr",
            ErrKind::FileNotFoundErr => "FileNotFoundErr",
        }
    }

    /// Position in [`ErrKind::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ErrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime error with the trace accumulated so far.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("{kind}: {message}")]
pub struct EvalError {
    pub kind: ErrKind,
    pub message: String,
    /// Newline-joined segments, innermost first.
    pub stack_trace: String,
}

impl EvalError {
    pub fn new(kind: ErrKind, message: impl Into<String>) -> Self {
        EvalError {
            kind,
            message: message.into(),
            stack_trace: String::new(),
        }
    }

    /// Append the segment for `src` unless the trace already ends with it.
    #[must_use]
    pub fn with_trace(mut self, src: &Source) -> Self {
        let segment = src.trace_segment();
        if self.stack_trace.ends_with(&segment) {
            return self;
        }
        if !self.stack_trace.is_empty() {
            self.stack_trace.push('\n');
        }
        self.stack_trace.push_str(&segment);
        self
    }

    #[inline]
    pub fn is_stop_iter(&self) -> bool {
        self.kind == ErrKind::StopIterErr
    }

    /// `Kind: message` followed by the stack trace, as the CLI prints it.
    pub fn report(&self) -> String {
        if self.stack_trace.is_empty() {
            self.to_string()
        } else {
            format!("{self}\n{}", self.stack_trace)
        }
    }
}

/// Result of evaluating anything.
pub type EvalResult<T = Value> = Result<T, EvalError>;

#[cold]
pub fn name_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::NameErr, message)
}

#[cold]
pub fn no_prop_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::NoPropErr, message)
}

#[cold]
pub fn type_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::TypeErr, message)
}

#[cold]
pub fn value_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::ValueErr, message)
}

#[cold]
pub fn zero_division_err() -> EvalError {
    EvalError::new(ErrKind::ZeroDivisionErr, "cannot be divided by 0")
}

pub fn stop_iter_err() -> EvalError {
    EvalError::new(ErrKind::StopIterErr, "iter stopped")
}

#[cold]
pub fn syntax_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::SyntaxErr, message)
}

#[cold]
pub fn assertion_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::AssertionErr, message)
}

#[cold]
pub fn not_implemented_err() -> EvalError {
    EvalError::new(ErrKind::NotImplementedErr, "Not implemented")
}

/// More func calls in progress than the interpreter allows.
#[cold]
pub fn stack_overflow_err(max_depth: usize) -> EvalError {
    EvalError::new(
        ErrKind::Err,
        format!("stack overflow: more than {max_depth} nested calls"),
    )
}

#[cold]
pub fn file_not_found_err(message: impl Into<String>) -> EvalError {
    EvalError::new(ErrKind::FileNotFoundErr, message)
}

/// `Type#prop requires at least n args`
#[cold]
pub fn arity_err(prop: &str, n: usize) -> EvalError {
    let plural = if n == 1 { "arg" } else { "args" };
    type_err(format!("{prop} requires at least {n} {plural}"))
}

/// `x cannot be treated as int`
#[cold]
pub fn cannot_treat(value: &Value, as_type: &str) -> EvalError {
    type_err(format!("{} cannot be treated as {as_type}", value.inspect()))
}

impl From<pangaea_parse::ParseError> for EvalError {
    fn from(e: pangaea_parse::ParseError) -> Self {
        syntax_err(e.to_string())
    }
}

#[cfg(test)]
mod tests;
