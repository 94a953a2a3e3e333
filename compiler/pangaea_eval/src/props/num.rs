//! `Num`: the common prototype of Int and Float, plus the operand rules
//! their arithmetic shares.

use super::{arg, check_arity, PropContainer};
use crate::errors::{cannot_treat, type_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Num", "ceil", |interp, _, _, args| {
        check_arity(args, 1, "Num#ceil")?;
        to_int_by(interp, &args[0], f64::ceil)
    });
    c.builtin("Num", "floor", |interp, _, _, args| {
        check_arity(args, 1, "Num#floor")?;
        to_int_by(interp, &args[0], f64::floor)
    });
    c.builtin("Num", "round", |interp, _, _, args| {
        check_arity(args, 1, "Num#round")?;
        to_int_by(interp, &args[0], f64::round)
    });
    c.builtin("Num", "F", |interp, _, _, args| {
        check_arity(args, 1, "Num#F")?;
        match num_of(interp, &args[0]) {
            Some(Num::Int(i)) => Ok(Value::Float(i as f64)),
            Some(Num::Float(x)) => Ok(Value::Float(x)),
            None => Err(cannot_treat(&args[0], "num")),
        }
    });
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) enum Num {
    Int(i64),
    Float(f64),
}

/// Both operands of a binary numeric op, promoted to a common type.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) enum Operands {
    Ints(i64, i64),
    Floats(f64, f64),
}

pub(super) fn num_of(interp: &Interpreter, v: &Value) -> Option<Num> {
    match interp.trace(v) {
        Value::Int(i) => Some(Num::Int(i)),
        Value::Bool(b) => Some(Num::Int(i64::from(b))),
        Value::Float(x) => Some(Num::Float(x)),
        _ => None,
    }
}

/// `args[0]` and `args[1]` as numbers. A nil right operand stands for
/// `nil_as`, the identity of the operation. Mixing Int and Float yields
/// Floats.
pub(super) fn operands(
    interp: &Interpreter,
    args: &[Value],
    nil_as: i64,
    prop: &str,
) -> EvalResult<Operands> {
    check_arity(args, 2, prop)?;
    let left = num_of(interp, &args[0]).ok_or_else(|| cannot_treat(&args[0], "num"))?;
    let right = match num_of(interp, &args[1]) {
        Some(n) => n,
        None if interp.traces_to_nil(&args[1]) => match left {
            Num::Int(_) => Num::Int(nil_as),
            Num::Float(_) => Num::Float(nil_as as f64),
        },
        None => return Err(cannot_treat(&args[1], "num")),
    };
    Ok(match (left, right) {
        (Num::Int(a), Num::Int(b)) => Operands::Ints(a, b),
        (Num::Int(a), Num::Float(b)) => Operands::Floats(a as f64, b),
        (Num::Float(a), Num::Int(b)) => Operands::Floats(a, b as f64),
        (Num::Float(a), Num::Float(b)) => Operands::Floats(a, b),
    })
}

/// Like [`operands`] but both sides must be Ints.
pub(super) fn int_operands(
    interp: &Interpreter,
    args: &[Value],
    nil_as: i64,
    prop: &str,
) -> EvalResult<(i64, i64)> {
    check_arity(args, 2, prop)?;
    let a = interp
        .trace_int(&args[0])
        .ok_or_else(|| cannot_treat(&args[0], "int"))?;
    let other = arg(args, 1);
    let b = match interp.trace_int(&other) {
        Some(b) => b,
        None if interp.traces_to_nil(&other) => nil_as,
        None => return Err(cannot_treat(&other, "int")),
    };
    Ok((a, b))
}

#[allow(clippy::cast_possible_truncation)]
fn to_int_by(interp: &Interpreter, v: &Value, f: fn(f64) -> f64) -> EvalResult {
    match num_of(interp, v) {
        Some(Num::Int(i)) => Ok(Value::Int(i)),
        Some(Num::Float(x)) if x.is_finite() => Ok(Value::Int(f(x) as i64)),
        Some(Num::Float(x)) => Err(type_err(format!("{x} cannot be converted into int"))),
        None => Err(cannot_treat(v, "num")),
    }
}
