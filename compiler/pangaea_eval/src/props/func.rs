//! `Func` and `Iter`.

use std::rc::Rc;

use super::{arg, check_arity, proto_identity, PropContainer};
use crate::errors::{cannot_treat, type_err};
use crate::interpreter::Interpreter;
use crate::value::{FuncKind, Value};

/// Func literals are equal when their source is; native funcs and iters
/// only to themselves.
fn callables_equal(interp: &Interpreter, a: &Value, b: &Value) -> bool {
    match (interp.trace(a), interp.trace(b)) {
        (Value::Func(f), Value::Func(g)) => f.kind == g.kind && f.inspect() == g.inspect(),
        (Value::BuiltIn(f), Value::BuiltIn(g)) => Rc::ptr_eq(&f, &g),
        (Value::BuiltInIter(f), Value::BuiltInIter(g)) => Rc::ptr_eq(&f, &g),
        _ => false,
    }
}

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Func", "==", |interp, _, _, args| {
        check_arity(args, 2, "Func#==")?;
        if let Some(eq) = proto_identity(&args[0], &args[1], &interp.protos().func) {
            return Ok(Value::Bool(eq));
        }
        Ok(Value::Bool(callables_equal(interp, &args[0], &args[1])))
    });
    c.builtin("Func", "B", |_, _, _, args| {
        check_arity(args, 1, "Func#B")?;
        Ok(Value::Bool(true))
    });
    c.builtin("Func", "call", |interp, env, kwargs, args| {
        check_arity(args, 1, "Func#call")?;
        match interp.trace(&args[0]) {
            f @ Value::BuiltIn(_) => interp.call_func(env, &f, &args[1..], kwargs),
            Value::Func(f) => interp.call_pan_func(&f, &args[1..], kwargs),
            _ => Err(type_err("\\1 must be func")),
        }
    });
    c.builtin("Func", "arity", |interp, _, _, args| {
        check_arity(args, 1, "Func#arity")?;
        match interp.trace(&args[0]) {
            Value::Func(f) => Ok(Value::Int(i64::try_from(f.params().len()).unwrap_or(i64::MAX))),
            _ => Err(type_err("\\1 must be func")),
        }
    });
    c.builtin("Func", "new", |interp, _, _, args| {
        let x = arg(args, 1);
        match interp.trace(&x) {
            f @ (Value::Func(_) | Value::BuiltIn(_)) => Ok(f),
            _ => Err(cannot_treat(&x, "func")),
        }
    });

    c.builtin("Iter", "==", |interp, _, _, args| {
        check_arity(args, 2, "Iter#==")?;
        if let Some(eq) = proto_identity(&args[0], &args[1], &interp.protos().iter) {
            return Ok(Value::Bool(eq));
        }
        Ok(Value::Bool(callables_equal(interp, &args[0], &args[1])))
    });
    c.builtin("Iter", "_iter", |interp, _, _, args| {
        check_arity(args, 1, "Iter#_iter")?;
        interp
            .iter_copy(&interp.trace(&args[0]))
            .map_err(|_| cannot_treat(&args[0], "iter"))
    });
    c.builtin("Iter", "B", |_, _, _, args| {
        check_arity(args, 1, "Iter#B")?;
        Ok(Value::Bool(true))
    });
    c.builtin("Iter", "new", |interp, _, kwargs, args| {
        check_arity(args, 1, "Iter#new")?;
        interp.iter_new(&args[0], &args[1..], kwargs)
    });
    c.builtin("Iter", "next", |interp, env, _, args| {
        check_arity(args, 1, "Iter#next")?;
        let it = interp.trace(&args[0]);
        match &it {
            Value::BuiltInIter(_) => interp.iter_advance(env, &it),
            Value::Func(f) if f.kind == FuncKind::Iter => interp.iter_advance(env, &it),
            _ => Err(cannot_treat(&args[0], "iter")),
        }
    });
}
