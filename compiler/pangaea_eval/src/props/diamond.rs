//! `Diamond` (`<>`), which reads lines from `IO`, and `IO` itself.

use std::rc::Rc;

use pangaea_ir::Name;

use super::{check_arity, PropContainer};
use crate::environment::Env;
use crate::errors::{name_err, stop_iter_err, type_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::io::IoHandles;
use crate::value::{BuiltInIter, Value};

fn io_of(interp: &Interpreter, env: &Env) -> EvalResult<IoHandles> {
    match env.get(interp.names().io) {
        Some(Value::Io(io)) => Ok(io),
        Some(_) => Err(type_err("name `IO` must be IO obj")),
        None => Err(name_err("`IO` is not found in env")),
    }
}

/// The next input line, or `""` once input is exhausted.
fn read_line(interp: &Interpreter, env: &Env) -> EvalResult<Value> {
    let io = io_of(interp, env)?;
    Ok(Value::str(io.read_line().unwrap_or_default()))
}

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Diamond", "_iter", |interp, env, _, args| {
        check_arity(args, 1, "Diamond#_iter")?;
        let io = io_of(interp, env)?;
        Ok(Value::BuiltInIter(Rc::new(BuiltInIter::new(move |_, _| {
            io.read_line().map(Value::str).ok_or_else(stop_iter_err)
        }))))
    });
    c.builtin("Diamond", "S", |interp, env, _, args| {
        check_arity(args, 1, "Diamond#S")?;
        read_line(interp, env)
    });
    // <>.uc and friends: any Str prop, applied to the next line
    c.builtin("Diamond", "_missing", |interp, env, kwargs, args| {
        check_arity(args, 2, "Diamond#_missing")?;
        let name = interp
            .trace_str(&args[1])
            .ok_or_else(|| type_err("\\2 must be prop name str"))?;
        let line = read_line(interp, env)?;
        interp.call_prop(env, &line, Name::intern(&name), &args[2..], kwargs)
    });

    c.builtin("IO", "S", |_, _, _, args| {
        check_arity(args, 1, "IO#S")?;
        Ok(Value::str("IO"))
    });
}
