//! `BaseObj`: the root of every prototype chain.

use std::rc::Rc;

use super::{check_arity, index_obj, PropContainer};
use crate::environment::Env;
use crate::errors::{type_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::value::{ObjValue, Value};

pub(super) fn register(c: &mut PropContainer) {
    c.builtin("BaseObj", "==", |interp, env, _, args| {
        check_arity(args, 2, "BaseObj#==")?;
        match (&args[0], &args[1]) {
            (Value::Obj(a), Value::Obj(b)) => Ok(Value::Bool(objs_equal(interp, env, a, b)?)),
            _ => Ok(Value::Bool(false)),
        }
    });
    c.builtin("BaseObj", "at", |interp, _, _, args| {
        check_arity(args, 2, "BaseObj#at")?;
        Ok(index_obj(interp, &args[0], &args[1]))
    });
    c.builtin("BaseObj", "bear", |_, _, _, args| {
        check_arity(args, 1, "BaseObj#bear")?;
        bear(&args[0], args.get(1), "BaseObj#bear")
    });
    c.builtin("BaseObj", "proto", |interp, _, _, args| {
        check_arity(args, 1, "BaseObj#proto")?;
        Ok(args[0].proto(interp.protos()).unwrap_or(Value::Nil))
    });
}

/// A child of `proto` holding the pairs of the Obj literal `src` (or none).
pub(crate) fn bear(proto: &Value, src: Option<&Value>, prop: &str) -> EvalResult {
    let pairs = match src {
        None => Vec::new(),
        Some(Value::Obj(o)) => o.all_pairs().map(|(k, v)| (k, v.clone())).collect(),
        Some(_) => return Err(type_err(format!("{prop} requires obj literal src"))),
    };
    Ok(Value::obj(ObjValue::new(pairs, Some(proto.clone()))))
}

/// Pairwise `==` on own pairs, ignoring prototypes.
///
/// A pairless child made by `bear` stands for its prototype, so
/// `o.bear({}) == o`.
fn objs_equal(interp: &Interpreter, env: &Env, a: &Rc<ObjValue>, b: &Rc<ObjValue>) -> EvalResult<bool> {
    let a = skip_empty_children(interp, a);
    let b = skip_empty_children(interp, b);
    if Rc::ptr_eq(&a, &b) {
        return Ok(true);
    }
    if a.len() != b.len() {
        return Ok(false);
    }
    for (key, value) in a.all_pairs() {
        let Some(other) = b.get(key) else {
            return Ok(false);
        };
        if !interp.values_equal(env, value, other)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn skip_empty_children(interp: &Interpreter, obj: &Rc<ObjValue>) -> Rc<ObjValue> {
    let mut current = Rc::clone(obj);
    while current.is_empty() && !interp.protos().is_builtin(&current) {
        match current.proto() {
            Some(Value::Obj(parent)) if !interp.protos().is_builtin(parent) => {
                current = Rc::clone(parent);
            }
            _ => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bear_sets_proto_and_copies_src() {
        let proto = Value::Int(3);
        let src = Value::obj(ObjValue::new([(pangaea_ir::Name::intern("a"), Value::Int(1))], None));
        let child = bear(&proto, Some(&src), "BaseObj#bear").unwrap();
        let Value::Obj(o) = child else {
            panic!("bear must return an obj");
        };
        assert_eq!(o.proto(), Some(&Value::Int(3)));
        assert_eq!(o.get(pangaea_ir::Name::intern("a")), Some(&Value::Int(1)));
    }

    #[test]
    fn test_bear_rejects_non_obj_src() {
        let err = bear(&Value::Nil, Some(&Value::Int(1)), "BaseObj#bear").unwrap_err();
        assert_eq!(err.message, "BaseObj#bear requires obj literal src");
    }
}
