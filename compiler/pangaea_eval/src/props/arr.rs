//! `Arr`.

use super::{
    arg, arr_arg, check_arity, index_elems, iter_over, proto_identity, repeat_count,
    PropContainer,
};
use crate::environment::Env;
use crate::errors::{type_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Largest Arr that `*` builds.
const MAX_ARR_LEN: usize = 1 << 24;

fn treat_as_arr(v: &Value) -> crate::errors::EvalError {
    type_err(format!("`{}` cannot be treated as arr", v.inspect()))
}

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Arr", "==", |interp, env, _, args| {
        check_arity(args, 2, "Arr#==")?;
        if let Some(eq) = proto_identity(&args[0], &args[1], &interp.protos().arr) {
            return Ok(Value::Bool(eq));
        }
        let (Some(a), Some(b)) = (interp.trace_arr(&args[0]), interp.trace_arr(&args[1])) else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(elems_equal(interp, env, &a, &b)?))
    });
    c.builtin("Arr", "+", |interp, _, _, args| {
        check_arity(args, 2, "Arr#+")?;
        let a = interp
            .trace_arr(&args[0])
            .ok_or_else(|| treat_as_arr(&args[0]))?;
        let Some(b) = interp.trace_arr(&args[1]) else {
            if interp.traces_to_nil(&args[1]) {
                return Ok(Value::Arr(a));
            }
            return Err(treat_as_arr(&args[1]));
        };
        Ok(Value::arr(a.iter().chain(b.iter()).cloned().collect()))
    });
    c.builtin("Arr", "*", |interp, _, _, args| {
        check_arity(args, 2, "Arr#*")?;
        let a = interp
            .trace_arr(&args[0])
            .ok_or_else(|| treat_as_arr(&args[0]))?;
        let n = repeat_count(interp, args, a.len(), MAX_ARR_LEN)?;
        Ok(Value::arr(
            (0..n).flat_map(|_| a.iter().cloned()).collect(),
        ))
    });
    c.builtin("Arr", "_iter", |interp, _, _, args| {
        check_arity(args, 1, "Arr#_iter")?;
        Ok(iter_over(arr_arg(interp, args, 0)?.to_vec()))
    });
    c.builtin("Arr", "at", |interp, _, _, args| {
        check_arity(args, 1, "Arr#at")?;
        let elems = arr_arg(interp, args, 0)?;
        index_elems(interp, &args[0], &elems, &arg(args, 1))
    });
    c.builtin("Arr", "B", |interp, _, _, args| {
        check_arity(args, 1, "Arr#B")?;
        Ok(Value::Bool(!arr_arg(interp, args, 0)?.is_empty()))
    });
    c.builtin("Arr", "call", |_, _, _, args| {
        check_arity(args, 1, "Arr#call")?;
        Ok(Value::arr(args[1..].to_vec()))
    });
    c.builtin("Arr", "has?", |interp, env, _, args| {
        check_arity(args, 2, "Arr#has?")?;
        for elem in arr_arg(interp, args, 0)?.iter() {
            if interp.values_equal(env, elem, &args[1])? {
                return Ok(Value::Bool(true));
            }
        }
        Ok(Value::Bool(false))
    });
    c.builtin("Arr", "join", |interp, env, _, args| {
        check_arity(args, 1, "Arr#join")?;
        let elems = arr_arg(interp, args, 0)?;
        let sep = match arg(args, 1) {
            v if interp.traces_to_nil(&v) => "".into(),
            v => interp
                .trace_str(&v)
                .ok_or_else(|| type_err("\\2 must be str"))?,
        };
        let pieces = elems
            .iter()
            .map(|elem| display_elem(interp, env, elem))
            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::str(pieces.join(&sep)))
    });
    c.builtin("Arr", "len", |interp, _, _, args| {
        check_arity(args, 1, "Arr#len")?;
        let n = arr_arg(interp, args, 0)?.len();
        Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
    });
    c.builtin("Arr", "new", |interp, _, _, args| {
        let x = arg(args, 1);
        interp
            .trace_arr(&x)
            .map(Value::Arr)
            .ok_or_else(|| treat_as_arr(&x))
    });
}

/// Same length and pairwise `==`.
fn elems_equal(interp: &Interpreter, env: &Env, a: &[Value], b: &[Value]) -> EvalResult<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b) {
        if !interp.values_equal(env, x, y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn display_elem(interp: &Interpreter, env: &Env, elem: &Value) -> EvalResult<String> {
    let s = interp.call_prop0(env, elem, interp.names().s)?;
    interp.trace_str(&s).map(|s| s.to_string()).ok_or_else(|| {
        type_err(format!(
            "{}.S returned non-str value {}",
            elem.inspect(),
            s.inspect()
        ))
    })
}
