//! `Map`.

use std::rc::Rc;

use super::{arg, check_arity, iter_over, obj_at, proto_identity, PropContainer};
use crate::environment::Env;
use crate::errors::{cannot_treat, type_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{HashKey, MapValue, Value};

fn map_arg(interp: &Interpreter, args: &[Value]) -> EvalResult<Rc<MapValue>> {
    interp
        .trace_map(&args[0])
        .ok_or_else(|| type_err("\\1 must be map"))
}

/// Entries of a Map receiver mapped by `f`; other receivers have none.
fn entries(interp: &Interpreter, recv: &Value, f: impl Fn(&Value, &Value) -> Value) -> Value {
    let Some(map) = interp.trace_map(recv) else {
        return Value::arr(Vec::new());
    };
    Value::arr(map.iter().map(|(k, v)| f(k, v)).collect())
}

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Map", "==", |interp, env, _, args| {
        check_arity(args, 2, "Map#==")?;
        if let Some(eq) = proto_identity(&args[0], &args[1], &interp.protos().map) {
            return Ok(Value::Bool(eq));
        }
        let (Some(a), Some(b)) = (interp.trace_map(&args[0]), interp.trace_map(&args[1])) else {
            return Ok(Value::Bool(false));
        };
        Ok(Value::Bool(maps_equal(interp, env, &a, &b)?))
    });
    c.builtin("Map", "_iter", |interp, _, _, args| {
        check_arity(args, 1, "Map#_iter")?;
        let map = map_arg(interp, args)?;
        Ok(iter_over(
            map.iter()
                .map(|(k, v)| Value::arr(vec![k.clone(), v.clone()]))
                .collect(),
        ))
    });
    c.builtin("Map", "at", |interp, env, _, args| {
        check_arity(args, 1, "Map#at")?;
        let map = map_arg(interp, args)?;
        let Some(key) = interp
            .trace_arr(&arg(args, 1))
            .and_then(|indices| indices.first().cloned())
        else {
            return Ok(Value::Nil);
        };
        match lookup(interp, env, &map, &key)? {
            Some(v) => Ok(v),
            None => Ok(obj_at(interp, &args[0], &key)),
        }
    });
    c.builtin("Map", "B", |interp, _, _, args| {
        check_arity(args, 1, "Map#B")?;
        Ok(Value::Bool(!map_arg(interp, args)?.is_empty()))
    });
    c.builtin("Map", "items", |interp, _, _, args| {
        check_arity(args, 1, "Map#items")?;
        Ok(entries(interp, &args[0], |k, v| {
            Value::arr(vec![k.clone(), v.clone()])
        }))
    });
    c.builtin("Map", "keys", |interp, _, _, args| {
        check_arity(args, 1, "Map#keys")?;
        Ok(entries(interp, &args[0], |k, _| k.clone()))
    });
    c.builtin("Map", "values", |interp, _, _, args| {
        check_arity(args, 1, "Map#values")?;
        Ok(entries(interp, &args[0], |_, v| v.clone()))
    });
    c.builtin("Map", "len", |interp, _, _, args| {
        check_arity(args, 1, "Map#len")?;
        let n = map_arg(interp, args)?.len();
        Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
    });
    c.builtin("Map", "new", |interp, _, _, args| {
        let x = arg(args, 1);
        interp
            .trace_map(&x)
            .map(Value::Map)
            .ok_or_else(|| cannot_treat(&x, "map"))
    });
}

/// Value for `key`: hashed when possible, else the first `==` key.
fn lookup(
    interp: &Interpreter,
    env: &Env,
    map: &MapValue,
    key: &Value,
) -> EvalResult<Option<Value>> {
    if let Some(hash) = HashKey::of(key) {
        return Ok(map.get_hashable(&hash).cloned());
    }
    for (k, v) in map.non_hashable() {
        if interp.values_equal(env, k, key)? {
            return Ok(Some(v.clone()));
        }
    }
    Ok(None)
}

fn maps_equal(interp: &Interpreter, env: &Env, a: &MapValue, b: &MapValue) -> EvalResult<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (k, v) in a.iter() {
        let Some(other) = lookup(interp, env, b, k)? else {
            return Ok(false);
        };
        if !interp.values_equal(env, v, &other)? {
            return Ok(false);
        }
    }
    Ok(true)
}
