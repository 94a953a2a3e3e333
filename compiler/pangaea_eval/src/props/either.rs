//! `Either` and its two halves: `EitherVal` wraps a value, `EitherErr` a
//! caught error. `x.try` starts a chain and `fmap` stops calling once an
//! error has been caught.

use pangaea_ir::Name;

use super::{check_arity, PropContainer};
use crate::errors::{cannot_treat, not_implemented_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{ObjValue, Value};

pub(super) fn register(c: &mut PropContainer) {
    // the abstract props every Either provides
    for prop in ["A", "err", "fmap", "or", "val"] {
        c.builtin("Either", prop, |_, _, _, _| Err(not_implemented_err()));
    }

    c.builtin("EitherVal", "A", |interp, _, _, args| {
        check_arity(args, 1, "EitherVal#A")?;
        let v = wrapped_val(interp, &args[0])?;
        Ok(Value::arr(vec![v, Value::Nil]))
    });
    c.builtin("EitherVal", "err", |interp, _, _, args| {
        check_arity(args, 1, "EitherVal#err")?;
        wrapped_val(interp, &args[0])?;
        Ok(Value::Nil)
    });
    c.builtin("EitherVal", "fmap", |interp, env, _, args| {
        check_arity(args, 2, "EitherVal#fmap")?;
        let v = wrapped_val(interp, &args[0])?;
        let f = &args[1];
        let call = interp.names().call;
        if interp.find_prop(f, call).is_none() {
            return Ok(either_val(interp, Value::Nil));
        }
        match interp.call_prop(env, f, call, &[v], &ObjValue::default()) {
            Ok(err @ Value::Err(_)) => Ok(either_err(interp, err)),
            Ok(v) => Ok(either_val(interp, v)),
            Err(e) => Ok(either_err(interp, Value::wrap_err(e))),
        }
    });
    c.builtin("EitherVal", "or", |interp, _, _, args| {
        check_arity(args, 2, "EitherVal#or")?;
        wrapped_val(interp, &args[0])
    });
    c.builtin("EitherVal", "val", |interp, _, _, args| {
        check_arity(args, 1, "EitherVal#val")?;
        wrapped_val(interp, &args[0])
    });

    c.builtin("EitherErr", "A", |interp, _, _, args| {
        check_arity(args, 1, "EitherErr#A")?;
        let e = wrapped_err(interp, &args[0])?;
        Ok(Value::arr(vec![Value::Nil, e]))
    });
    c.builtin("EitherErr", "err", |interp, _, _, args| {
        check_arity(args, 1, "EitherErr#err")?;
        wrapped_err(interp, &args[0])
    });
    c.builtin("EitherErr", "fmap", |interp, _, _, args| {
        check_arity(args, 2, "EitherErr#fmap")?;
        wrapped_err(interp, &args[0])?;
        Ok(args[0].clone())
    });
    c.builtin("EitherErr", "or", |interp, _, _, args| {
        check_arity(args, 2, "EitherErr#or")?;
        wrapped_err(interp, &args[0])?;
        Ok(args[1].clone())
    });
    c.builtin("EitherErr", "val", |interp, _, _, args| {
        check_arity(args, 1, "EitherErr#val")?;
        wrapped_err(interp, &args[0])?;
        Ok(Value::Nil)
    });
}

/// `EitherVal` holding `v`; what `v.try` gives.
pub(super) fn either_val(interp: &Interpreter, v: Value) -> Value {
    let proto = interp.protos().either_val.clone();
    Value::obj(ObjValue::new([(interp.names().value, v)], Some(proto)))
}

fn either_err(interp: &Interpreter, err: Value) -> Value {
    let proto = interp.protos().either_err.clone();
    Value::obj(ObjValue::new([(interp.names().error, err)], Some(proto)))
}

fn wrapped_val(interp: &Interpreter, recv: &Value) -> EvalResult {
    wrapped(interp, recv, interp.names().value, "EitherVal")
}

fn wrapped_err(interp: &Interpreter, recv: &Value) -> EvalResult {
    wrapped(interp, recv, interp.names().error, "EitherErr")
}

/// The pair `key` held by an Either obj (or an obj born from one).
fn wrapped(interp: &Interpreter, recv: &Value, key: Name, ty: &str) -> EvalResult {
    match recv {
        Value::Obj(_) => interp
            .find_prop(recv, key)
            .ok_or_else(|| cannot_treat(recv, ty)),
        _ => Err(cannot_treat(recv, ty)),
    }
}
