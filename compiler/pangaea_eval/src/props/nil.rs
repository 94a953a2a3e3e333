//! `Nil`. Nil is the identity of `+`, so `nil + x` is `x`.

use super::{arg, check_arity, PropContainer};
use crate::errors::{cannot_treat, type_err};
use crate::value::Value;

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Nil", "==", |interp, _, _, args| {
        check_arity(args, 2, "Nil#==")?;
        Ok(Value::Bool(
            interp.traces_to_nil(&args[0]) && interp.traces_to_nil(&args[1]),
        ))
    });
    c.builtin("Nil", "+", |_, _, _, args| {
        check_arity(args, 2, "Nil#+")?;
        Ok(args[1].clone())
    });
    c.builtin("Nil", "B", |interp, _, _, args| {
        check_arity(args, 1, "Nil#B")?;
        if !interp.traces_to_nil(&args[0]) {
            return Err(type_err("\\1 must be nil"));
        }
        Ok(Value::Bool(false))
    });
    c.builtin("Nil", "new", |interp, _, _, args| {
        let x = arg(args, 1);
        if interp.traces_to_nil(&x) {
            Ok(Value::Nil)
        } else {
            Err(cannot_treat(&x, "nil"))
        }
    });
}
