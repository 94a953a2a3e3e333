//! `Float`.

use super::int::truncate;
use super::num::{operands, Operands};
use super::{arg, check_arity, PropContainer};
use crate::errors::{cannot_treat, type_err, zero_division_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{format_float, Value};

fn float_arg(interp: &Interpreter, args: &[Value], prop: &str) -> EvalResult<f64> {
    check_arity(args, 1, prop)?;
    interp
        .trace_float(&args[0])
        .ok_or_else(|| cannot_treat(&args[0], "float"))
}

/// Both operands as floats; only the left side must already be one.
fn float_operands(
    interp: &Interpreter,
    args: &[Value],
    nil_as: i64,
    prop: &str,
) -> EvalResult<(f64, f64)> {
    float_arg(interp, args, prop)?;
    match operands(interp, args, nil_as, prop)? {
        Operands::Floats(a, b) => Ok((a, b)),
        Operands::Ints(a, b) => Ok((a as f64, b as f64)),
    }
}

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Float", "<=>", |interp, _, _, args| {
        let (a, b) = float_operands(interp, args, 0, "Float#<=>")?;
        Ok(Value::Int(a.total_cmp(&b) as i64))
    });
    c.builtin("Float", "==", |interp, _, _, args| {
        check_arity(args, 2, "Float#==")?;
        let (Some(a), Some(b)) = (interp.trace_float(&args[0]), interp.trace_float(&args[1]))
        else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(a == b))
    });
    c.builtin("Float", "+%", |interp, _, _, args| {
        Ok(Value::Float(float_arg(interp, args, "Float#+%")?))
    });
    c.builtin("Float", "-%", |interp, _, _, args| {
        Ok(Value::Float(-float_arg(interp, args, "Float#-%")?))
    });
    c.builtin("Float", "+", |interp, _, _, args| {
        let (a, b) = float_operands(interp, args, 0, "Float#+")?;
        Ok(Value::Float(a + b))
    });
    c.builtin("Float", "-", |interp, _, _, args| {
        let (a, b) = float_operands(interp, args, 0, "Float#-")?;
        Ok(Value::Float(a - b))
    });
    c.builtin("Float", "*", |interp, _, _, args| {
        let (a, b) = float_operands(interp, args, 1, "Float#*")?;
        Ok(Value::Float(a * b))
    });
    c.builtin("Float", "/", |interp, _, _, args| {
        let (a, b) = float_operands(interp, args, 1, "Float#/")?;
        if b == 0.0 {
            return Err(zero_division_err());
        }
        Ok(Value::Float(a / b))
    });
    c.builtin("Float", "**", |interp, _, _, args| {
        let (a, b) = float_operands(interp, args, 1, "Float#**")?;
        Ok(Value::Float(a.powf(b)))
    });
    c.builtin("Float", "B", |interp, _, _, args| {
        Ok(Value::Bool(float_arg(interp, args, "Float#B")? != 0.0))
    });
    c.builtin("Float", "F", |interp, _, _, args| {
        Ok(Value::Float(float_arg(interp, args, "Float#F")?))
    });
    c.builtin("Float", "I", |interp, _, _, args| {
        let x = float_arg(interp, args, "Float#I")?;
        if !x.is_finite() {
            return Err(type_err(format!("{} cannot be converted into int", format_float(x))));
        }
        Ok(Value::Int(truncate(x)))
    });
    c.builtin("Float", "new", |interp, _, _, args| {
        let x = arg(args, 1);
        if let Some(f) = interp.trace_float(&x) {
            return Ok(Value::Float(f));
        }
        match interp.trace_int(&x) {
            Some(i) => Ok(Value::Float(i as f64)),
            None => Err(cannot_treat(&x, "float")),
        }
    });
    c.builtin("Float", "S", |interp, _, _, args| {
        Ok(Value::str(format_float(float_arg(interp, args, "Float#S")?)))
    });
}
