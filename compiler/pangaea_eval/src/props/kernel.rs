//! `Kernel`: top-level functions. Its public props are also bound directly
//! in the global env, so they take their arguments without a receiver.

use super::{arg, check_arity, str_arg, PropContainer};
use crate::errors::{assertion_err, file_not_found_err, ErrKind, EvalResult};
use crate::interpreter::Interpreter;
use crate::protos::is_same_obj;
use crate::value::{ObjValue, Value};

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Kernel", "argv", |interp, _, _, _| {
        Ok(Value::arr(
            interp.argv().iter().map(|a| Value::str(a.as_str())).collect(),
        ))
    });
    c.builtin("Kernel", "assert", |interp, env, _, args| {
        check_arity(args, 1, "assert")?;
        if interp.is_truthy(env, &args[0])? {
            return Ok(Value::Nil);
        }
        Err(assertion_err(format!("{} is not truthy", args[0].inspect())))
    });
    c.builtin("Kernel", "assertEq", |interp, env, _, args| {
        check_arity(args, 2, "assertEq")?;
        if interp.values_equal(env, &args[0], &args[1])? {
            return Ok(Value::Nil);
        }
        Err(assertion_err(format!(
            "{} != {}",
            args[0].inspect(),
            args[1].inspect()
        )))
    });
    c.builtin("Kernel", "assertRaises", |interp, env, _, args| {
        check_arity(args, 3, "assertRaises")?;
        let expected_msg = str_arg(interp, args, 1)?;
        let err = match interp.call_func(env, &args[2], &[], &ObjValue::default()) {
            Ok(_) => return Err(assertion_err("error must be raised")),
            Err(e) => e,
        };
        check_raised(interp, &args[0], &expected_msg, err.kind, &err.message)
    });
    c.builtin("Kernel", "read", |interp, _, _, args| {
        check_arity(args, 1, "read")?;
        let path = str_arg(interp, args, 0)?;
        std::fs::read_to_string(&*path)
            .map(Value::from)
            .map_err(|e| {
                file_not_found_err(format!("{} cannot be opened: {e}", arg(args, 0).inspect()))
            })
    });
}

fn check_raised(
    interp: &Interpreter,
    expected_type: &Value,
    expected_msg: &str,
    kind: ErrKind,
    message: &str,
) -> EvalResult {
    let actual_type = interp.protos().err_kind(kind);
    let same_type = match expected_type {
        Value::Obj(o) => is_same_obj(actual_type, o),
        _ => false,
    };
    if !same_type {
        return Err(assertion_err(format!(
            "wrong type: {} != {}",
            actual_type.inspect(),
            expected_type.inspect()
        )));
    }
    if message != expected_msg {
        return Err(assertion_err(format!(
            "wrong msg: \"{message}\" != \"{expected_msg}\""
        )));
    }
    Ok(Value::Nil)
}
