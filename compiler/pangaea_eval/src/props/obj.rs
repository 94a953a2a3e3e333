//! `Obj`: props shared by every ordinary value.

use pangaea_ir::Name;

use super::either::either_val;
use super::{arg, check_arity, flag, int_arg, iter_over, kwarg, str_arg, PropContainer};
use crate::environment::Env;
use crate::errors::{cannot_treat, name_err, type_err, value_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{format_float, ObjValue, Value};

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("Obj", "!", |interp, env, _, args| {
        check_arity(args, 1, "Obj#!")?;
        Ok(Value::Bool(!interp.is_truthy(env, &args[0])?))
    });
    c.builtin("Obj", "!=", |interp, env, _, args| {
        check_arity(args, 2, "Obj#!=")?;
        Ok(Value::Bool(!interp.values_equal(env, &args[0], &args[1])?))
    });
    register_comparison(c, "<", |ord| ord < 0);
    register_comparison(c, "<=", |ord| ord <= 0);
    register_comparison(c, ">", |ord| ord > 0);
    register_comparison(c, ">=", |ord| ord >= 0);

    c.builtin("Obj", "_iter", |_, _, _, args| {
        check_arity(args, 1, "Obj#_iter")?;
        let Value::Obj(o) = &args[0] else {
            return Err(type_err("Obj#_iter cannot be applied to \\1"));
        };
        let pairs = o
            .public_pairs()
            .map(|(k, v)| Value::arr(vec![Value::str(k.as_str()), v.clone()]))
            .collect();
        Ok(iter_over(pairs))
    });
    c.builtin("Obj", "B", |_, _, _, args| {
        check_arity(args, 1, "Obj#B")?;
        Ok(Value::Bool(match &args[0] {
            Value::Obj(o) => !o.is_empty(),
            _ => true,
        }))
    });
    c.builtin("Obj", "callProp", |interp, env, kwargs, args| {
        check_arity(args, 3, "Obj#callProp")?;
        let name = str_arg(interp, args, 2)?;
        interp.call_prop(env, &args[1], Name::intern(&name), &args[3..], kwargs)
    });
    c.builtin("Obj", "items", |_, _, kwargs, args| {
        check_arity(args, 1, "Obj#items")?;
        Ok(own_pairs(&args[0], kwargs, |k, v| {
            Value::arr(vec![Value::str(k.as_str()), v.clone()])
        }))
    });
    c.builtin("Obj", "keys", |_, _, kwargs, args| {
        check_arity(args, 1, "Obj#keys")?;
        Ok(own_pairs(&args[0], kwargs, |k, _| Value::str(k.as_str())))
    });
    c.builtin("Obj", "values", |_, _, kwargs, args| {
        check_arity(args, 1, "Obj#values")?;
        Ok(own_pairs(&args[0], kwargs, |_, v| v.clone()))
    });
    c.builtin("Obj", "new", |interp, _, _, args| match arg(args, 1) {
        Value::Obj(o) => Ok(interp.as_script_obj(&o)),
        v if interp.traces_to_nil(&v) => Ok(interp.new_obj([])),
        v => Ok(interp.new_obj([(interp.names().value, v)])),
    });
    c.builtin("Obj", "p", |interp, env, kwargs, args| {
        check_arity(args, 1, "Obj#p")?;
        print(interp, env, kwargs, &args[0])
    });
    c.builtin("Obj", "repr", |_, _, _, args| {
        check_arity(args, 1, "Obj#repr")?;
        Ok(Value::str(args[0].inspect()))
    });
    c.builtin("Obj", "S", |interp, _, kwargs, args| {
        check_arity(args, 1, "Obj#S")?;
        formatted_str(interp, &args[0], kwargs)
    });
    c.builtin("Obj", "traverse", |interp, _, kwargs, args| {
        check_arity(args, 1, "Obj#traverse")?;
        let key = match kwarg(kwargs, "key") {
            Some(k) => Some(interp.trace_str(k).ok_or_else(|| cannot_treat(k, "str"))?),
            None => None,
        };
        let mut leaves = Vec::new();
        traverse(&args[0], &mut Vec::new(), &mut leaves);
        let out = leaves
            .into_iter()
            .filter(|(path, _)| match &key {
                Some(k) => path_has_key(path, k),
                None => true,
            })
            .map(|(path, v)| Value::arr(vec![Value::arr(path), v]))
            .collect();
        Ok(Value::arr(out))
    });
    c.builtin("Obj", "try", |interp, _, _, args| {
        check_arity(args, 1, "Obj#try")?;
        Ok(either_val(interp, args[0].clone()))
    });
    c.builtin("Obj", "which", |interp, _, _, args| {
        check_arity(args, 2, "Obj#which")?;
        let name = str_arg(interp, args, 1)?;
        Ok(interp
            .find_owner(&args[0], Name::intern(&name))
            .unwrap_or(Value::Nil))
    });
}

/// `a op b` decided by the sign of `a <=> b`.
fn register_comparison(c: &mut PropContainer, op: &'static str, holds: fn(i64) -> bool) {
    c.builtin("Obj", op, move |interp, env, _, args| {
        check_arity(args, 2, op)?;
        let ord = interp.call_prop(
            env,
            &args[0],
            Name::intern("<=>"),
            &args[1..2],
            &ObjValue::default(),
        )?;
        let ord = interp
            .trace_int(&ord)
            .ok_or_else(|| value_err("<=> returned non-int value"))?;
        Ok(Value::Bool(holds(ord)))
    });
}

/// Leaves of nested Objs (public keys) and Arrs (Int indexes), each with
/// the keys leading to it. An empty collection is a leaf itself.
fn traverse(v: &Value, path: &mut Vec<Value>, leaves: &mut Vec<(Vec<Value>, Value)>) {
    let children: Vec<(Value, Value)> = match v {
        Value::Obj(o) => o
            .public_pairs()
            .map(|(k, v)| (Value::str(k.as_str()), v.clone()))
            .collect(),
        Value::Arr(elems) => (0_i64..)
            .zip(elems.iter())
            .map(|(i, e)| (Value::Int(i), e.clone()))
            .collect(),
        _ => Vec::new(),
    };
    for (key, child) in children {
        path.push(key);
        let before = leaves.len();
        traverse(&child, path, leaves);
        if leaves.len() == before {
            leaves.push((path.clone(), child));
        }
        path.pop();
    }
}

/// Whether a traversed path went through Str key `key`.
fn path_has_key(path: &[Value], key: &str) -> bool {
    path.iter().any(|k| matches!(k, Value::Str(s) if &**s == key))
}

/// Own pairs of an Obj receiver, public first; private ones only with
/// `private?: true`. Non-Obj receivers have none.
fn own_pairs(recv: &Value, kwargs: &ObjValue, f: impl Fn(Name, &Value) -> Value) -> Value {
    let Value::Obj(o) = recv else {
        return Value::arr(Vec::new());
    };
    let with_private = flag(kwargs, "private?");
    let out = o
        .public_pairs()
        .chain(
            o.private_keys()
                .iter()
                .filter(|_| with_private)
                .filter_map(|k| o.get(*k).map(|v| (*k, v))),
        )
        .map(|(k, v)| f(k, v))
        .collect();
    Value::arr(out)
}

/// `x.p`: write `x.S` and `end` (default newline) to `IO`.
fn print(interp: &Interpreter, env: &Env, kwargs: &ObjValue, recv: &Value) -> EvalResult {
    let io = match env.get(interp.names().io) {
        Some(Value::Io(io)) => io,
        Some(_) => return Err(type_err("name `IO` must be IO obj")),
        None => return Err(name_err("name `IO` is not defined.")),
    };
    let s = interp.call_prop0(env, recv, interp.names().s)?;
    let text = interp
        .trace_str(&s)
        .ok_or_else(|| type_err("\\1.S must be str"))?;
    let end = match kwarg(kwargs, "end") {
        Some(end) => interp
            .trace_str(end)
            .ok_or_else(|| type_err("end must be str"))?,
        None => "\n".into(),
    };
    io.write(&text);
    io.write(&end);
    Ok(Value::Nil)
}

/// Display form: Str as is, Float shortest, Int in `base:` (2 to 36),
/// anything else inspected.
pub(crate) fn formatted_str(interp: &Interpreter, v: &Value, kwargs: &ObjValue) -> EvalResult {
    match v {
        Value::Str(s) => Ok(Value::Str(s.clone())),
        Value::Float(x) => Ok(Value::str(format_float(*x))),
        Value::Int(i) => match kwarg(kwargs, "base") {
            Some(base) => {
                let base = int_arg(interp, std::slice::from_ref(base), 0)?;
                Ok(Value::str(int_in_base(*i, base)?))
            }
            None => Ok(Value::str(i.to_string())),
        },
        other => Ok(Value::str(other.inspect())),
    }
}

fn int_in_base(n: i64, base: i64) -> EvalResult<String> {
    let radix = u32::try_from(base)
        .ok()
        .filter(|b| (2..=36).contains(b))
        .ok_or_else(|| value_err(format!("base {base} must be within (2:37)")))?;
    if n == 0 {
        return Ok("0".to_string());
    }
    let mut digits = Vec::new();
    let mut rest = n.unsigned_abs();
    while rest > 0 {
        let d = u32::try_from(rest % u64::from(radix)).unwrap_or(0);
        digits.push(char::from_digit(d, radix).unwrap_or('?'));
        rest /= u64::from(radix);
    }
    if n < 0 {
        digits.push('-');
    }
    Ok(digits.into_iter().rev().collect())
}
