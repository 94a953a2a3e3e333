//! `Err` and one child prototype per [`ErrKind`].
//!
//! `XxxErr.new(msg)` makes an error *value*; it only propagates once
//! raised.

use super::{check_arity, proto_identity, PropContainer};
use crate::environment::Env;
use crate::errors::{cannot_treat, ErrKind, EvalError, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Err", "==", |interp, _, _, args| {
        check_arity(args, 2, "Err#==")?;
        let err_proto = interp.protos().err_kind(ErrKind::Err);
        if let Some(eq) = proto_identity(&args[0], &args[1], err_proto) {
            return Ok(Value::Bool(eq));
        }
        let (Some(a), Some(b)) = (interp.trace_err(&args[0]), interp.trace_err(&args[1])) else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(a.kind == b.kind && a.message == b.message))
    });
    c.builtin("Err", "msg", |interp, _, _, args| {
        check_arity(args, 1, "Err#msg")?;
        let e = interp
            .trace_err(&args[0])
            .ok_or_else(|| cannot_treat(&args[0], "err"))?;
        Ok(Value::str(e.message.as_str()))
    });
    c.builtin("Err", "type", |interp, _, _, args| {
        check_arity(args, 1, "Err#type")?;
        if let Some(e) = interp.trace_err(&args[0]) {
            return Ok(interp.protos().err_kind(e.kind).clone());
        }
        if let Value::Obj(o) = &args[0] {
            if interp.protos().kind_of_proto(o).is_some() {
                return Ok(args[0].clone());
            }
        }
        Ok(interp.protos().err_kind(ErrKind::Err).clone())
    });
    c.builtin("Err", "S", |interp, _, _, args| {
        check_arity(args, 1, "Err#S")?;
        // the prototypes themselves print by name
        Ok(Value::str(
            interp
                .trace_err(&args[0])
                .map_or_else(|| args[0].inspect(), |e| e.to_string()),
        ))
    });
    c.builtin("Err", "repr", |_, _, _, args| {
        check_arity(args, 1, "Err#repr")?;
        Ok(Value::str(args[0].inspect()))
    });

    for kind in ErrKind::ALL {
        c.builtin(kind.as_str(), "new", move |interp, env, _, args| {
            let message = err_message(interp, env, args.get(1))?;
            Ok(Value::wrap_err(EvalError::new(kind, message)))
        });
    }
}

/// A Str as is, anything else through its `S` (or `inspect` when `S`
/// gives something other than a Str). No argument means `"nil"`.
fn err_message(interp: &Interpreter, env: &Env, src: Option<&Value>) -> EvalResult<String> {
    let Some(src) = src else {
        return Ok("nil".to_string());
    };
    if let Some(s) = interp.trace_str(src) {
        return Ok(s.to_string());
    }
    let s = interp.call_prop0(env, src, interp.names().s)?;
    Ok(interp
        .trace_str(&s)
        .map_or_else(|| src.inspect(), |s| s.to_string()))
}
