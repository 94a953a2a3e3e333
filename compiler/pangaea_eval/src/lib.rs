//! Pangaea Eval - the evaluator for the Pangaea scripting language.
//!
//! # Architecture
//!
//! - [`Value`]: closed sum of runtime values; Obj, Arr, Map and Range are
//!   immutable and shared through `Rc`
//! - [`Env`]: lexical frames, the only mutable state a script can reach
//! - [`Protos`]: the built-in prototype graph, filled from the
//!   [`PropContainer`] of native props
//! - [`Interpreter`]: tree walk, prototype dispatch, the chain-call engine
//!   and iterator resumption
//! - [`EvalError`]: script-level errors, propagated as `Err` and carrying a
//!   stack trace that grows as they unwind
//!
//! ```
//! use pangaea_eval::{Interpreter, IoHandles, Value};
//!
//! let io = IoHandles::buffered("");
//! let interp = Interpreter::builder().io(io.clone()).build();
//! let v = interp.eval_source("[1, 2, 3]$(0)+").unwrap();
//! assert_eq!(v, Value::Int(6));
//! ```

pub mod environment;
pub mod errors;
pub mod interpreter;
pub mod io;
pub mod props;
pub mod protos;
pub mod value;

pub use environment::{Env, LocalScope, Scope};
pub use errors::{ErrKind, EvalError, EvalResult};
pub use interpreter::{Interpreter, InterpreterBuilder, DEFAULT_MAX_CALL_DEPTH};
pub use io::IoHandles;
pub use props::PropContainer;
pub use protos::Protos;
pub use value::{
    BuiltInFunc, BuiltInIter, FuncKind, FuncValue, HashKey, MapValue, ObjValue, RangeValue, Value,
};

#[cfg(test)]
mod tests;
