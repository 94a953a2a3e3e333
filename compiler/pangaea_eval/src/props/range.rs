//! `Range`.
//!
//! Iteration is generic: it starts at `start` and steps with `_incBy`
//! until `<=>` against `stop` says the bound is reached, so any value with
//! those two props can be a range endpoint (`("a":"e")`).

use std::cell::RefCell;
use std::rc::Rc;

use pangaea_ir::Name;

use super::{arg, check_arity, proto_identity, PropContainer};
use crate::environment::Env;
use crate::errors::{stop_iter_err, type_err, value_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{BuiltInIter, ObjValue, RangeValue, Value};

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Range", "==", |interp, env, _, args| {
        check_arity(args, 2, "Range#==")?;
        if let Some(eq) = proto_identity(&args[0], &args[1], &interp.protos().range) {
            return Ok(Value::Bool(eq));
        }
        let (Some(a), Some(b)) = (interp.trace_range(&args[0]), interp.trace_range(&args[1]))
        else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(
            interp.values_equal(env, &a.start, &b.start)?
                && interp.values_equal(env, &a.stop, &b.stop)?
                && interp.values_equal(env, &a.step, &b.step)?,
        ))
    });
    c.builtin("Range", "_iter", |interp, _, _, args| {
        check_arity(args, 1, "Range#_iter")?;
        let r = range_arg(interp, args)?;
        range_iter(interp, r)
    });
    c.builtin("Range", "B", |_, _, _, args| {
        check_arity(args, 1, "Range#B")?;
        Ok(Value::Bool(true))
    });
    c.builtin("Range", "new", |_, _, _, args| {
        check_arity(args, 2, "Range#new")?;
        Ok(Value::range(args[1].clone(), arg(args, 2), arg(args, 3)))
    });
    c.builtin("Range", "start", |interp, _, _, args| {
        check_arity(args, 1, "Range#start")?;
        Ok(range_arg(interp, args)?.start.clone())
    });
    c.builtin("Range", "stop", |interp, _, _, args| {
        check_arity(args, 1, "Range#stop")?;
        Ok(range_arg(interp, args)?.stop.clone())
    });
    c.builtin("Range", "step", |interp, _, _, args| {
        check_arity(args, 1, "Range#step")?;
        Ok(range_arg(interp, args)?.step.clone())
    });
}

fn range_arg(interp: &Interpreter, args: &[Value]) -> EvalResult<Rc<RangeValue>> {
    interp
        .trace_range(&args[0])
        .ok_or_else(|| type_err("\\1 must be Range"))
}

/// Nil means 1; anything else must be a nonzero Int.
fn step_of(interp: &Interpreter, r: &RangeValue) -> EvalResult<i64> {
    if r.step.is_nil() {
        return Ok(1);
    }
    match interp.trace_int(&r.step) {
        Some(0) => Err(value_err("cannot use 0 for range step")),
        Some(step) => Ok(step),
        None => Err(value_err("step must be Int")),
    }
}

fn range_iter(interp: &Interpreter, r: Rc<RangeValue>) -> EvalResult {
    let step = step_of(interp, &r)?;
    // None once an Int step would overflow: the last value was the end
    let current = RefCell::new(Some(r.start.clone()));
    let inc_by = Name::intern("_incBy");
    let spaceship = Name::intern("<=>");
    Ok(Value::BuiltInIter(Rc::new(BuiltInIter::new(
        move |interp: &Interpreter, env: &Env| -> EvalResult {
            let Some(value) = current.borrow().clone() else {
                return Err(stop_iter_err());
            };
            if reaches_stop(interp, env, spaceship, &value, &r.stop, step)? {
                return Err(stop_iter_err());
            }
            let next = match &value {
                Value::Int(i) => i.checked_add(step).map(Value::Int),
                _ => Some(interp.call_prop(
                    env,
                    &value,
                    inc_by,
                    &[Value::Int(step)],
                    &ObjValue::default(),
                )?),
            };
            *current.borrow_mut() = next;
            Ok(value)
        },
    ))))
}

/// Whether `value` has passed `stop` in the direction of `step`.
/// A nil stop never stops.
fn reaches_stop(
    interp: &Interpreter,
    env: &Env,
    spaceship: Name,
    value: &Value,
    stop: &Value,
    step: i64,
) -> EvalResult<bool> {
    if stop.is_nil() {
        return Ok(false);
    }
    let ord = interp.call_prop(
        env,
        value,
        spaceship,
        std::slice::from_ref(stop),
        &ObjValue::default(),
    )?;
    let ord = interp
        .trace_int(&ord)
        .ok_or_else(|| value_err("<=> returned non-int value"))?;
    Ok(if step > 0 { ord != -1 } else { ord != 1 })
}
