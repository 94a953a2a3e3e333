//! Native props.
//!
//! Every native prop is registered in a [`PropContainer`] under
//! `"Type_prop"`; [`crate::protos::Protos`] then copies each type's entries into
//! that type's prototype object. Props receive their receiver as `args[0]`.
//!
//! Receivers are "traced": a child made with `bear` behaves like the value
//! it was born from, so `5.bear({}) + 1` is `6`.

mod arr;
mod base_obj;
mod diamond;
mod either;
mod err;
mod float;
mod func;
mod index;
mod int;
mod kernel;
mod map;
mod nil;
mod num;
mod obj;
mod range;
mod string;

use std::cell::Cell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use pangaea_ir::Name;

use crate::environment::Env;
use crate::errors::{arity_err, cannot_treat, stop_iter_err, type_err, value_err, EvalResult};
use crate::interpreter::Interpreter;
use crate::protos::is_same_obj;
use crate::value::{BuiltInFunc, BuiltInIter, ObjValue, Value};

pub(crate) use index::{index_bits, index_elems, index_obj, index_str, obj_at};

/// Registry of native props keyed by `"Type_prop"`.
#[derive(Default)]
pub struct PropContainer {
    props: FxHashMap<String, Value>,
}

impl PropContainer {
    /// Every native prop of every built-in type.
    pub fn with_builtins() -> Self {
        let mut c = PropContainer::default();
        base_obj::register(&mut c);
        obj::register(&mut c);
        kernel::register(&mut c);
        num::register(&mut c);
        int::register(&mut c);
        float::register(&mut c);
        nil::register(&mut c);
        string::register(&mut c);
        arr::register(&mut c);
        range::register(&mut c);
        map::register(&mut c);
        func::register(&mut c);
        err::register(&mut c);
        either::register(&mut c);
        diamond::register(&mut c);
        tracing::debug!(props = c.props.len(), "registered native props");
        c
    }

    /// Register a native func as `ty#prop`.
    pub fn builtin(
        &mut self,
        ty: &str,
        prop: &str,
        f: impl Fn(&Interpreter, &Env, &ObjValue, &[Value]) -> EvalResult + 'static,
    ) {
        let func = BuiltInFunc::new(format!("{ty}#{prop}"), f);
        self.value(ty, prop, Value::BuiltIn(Rc::new(func)));
    }

    /// Register a plain value prop.
    pub fn value(&mut self, ty: &str, prop: &str, value: Value) {
        self.props.insert(format!("{ty}_{prop}"), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    /// `(prop, value)` pairs registered for `ty`.
    pub fn pairs_for(&self, ty: &str) -> Vec<(Name, Value)> {
        let prefix = format!("{ty}_");
        self.props
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .map(|prop| (Name::intern(prop), v.clone()))
            })
            .collect()
    }
}

/// `args` must hold at least `n` values, else `prop requires at least n args`.
pub(crate) fn check_arity(args: &[Value], n: usize, prop: &str) -> EvalResult<()> {
    if args.len() < n {
        return Err(arity_err(prop, n));
    }
    Ok(())
}

/// Positional arg `i`, nil when absent.
pub(crate) fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Nil)
}

/// Kwarg `name`, if given.
pub(crate) fn kwarg<'a>(kwargs: &'a ObjValue, name: &str) -> Option<&'a Value> {
    kwargs.get(Name::intern(name))
}

/// Whether kwarg `name` is exactly `true`.
pub(crate) fn flag(kwargs: &ObjValue, name: &str) -> bool {
    matches!(kwarg(kwargs, name), Some(Value::Bool(true)))
}

/// `args[i]` traced to an Int, else `x cannot be treated as int`.
pub(crate) fn int_arg(interp: &Interpreter, args: &[Value], i: usize) -> EvalResult<i64> {
    let v = arg(args, i);
    interp.trace_int(&v).ok_or_else(|| cannot_treat(&v, "int"))
}

/// The count in `x * n` for an `x` of `unit` items, when the product stays
/// within `limit` items.
pub(crate) fn repeat_count(
    interp: &Interpreter,
    args: &[Value],
    unit: usize,
    limit: usize,
) -> EvalResult<usize> {
    let n = int_arg(interp, args, 1)?;
    let n = usize::try_from(n)
        .map_err(|_| value_err(format!("{} is not positive", args[1].inspect())))?;
    match unit.checked_mul(n) {
        Some(len) if len <= limit => Ok(n),
        _ => Err(value_err(format!("{} is too large to repeat", args[1].inspect()))),
    }
}

/// `args[i]` traced to a Str, else `x cannot be treated as str`.
pub(crate) fn str_arg(interp: &Interpreter, args: &[Value], i: usize) -> EvalResult<Rc<str>> {
    let v = arg(args, i);
    interp.trace_str(&v).ok_or_else(|| cannot_treat(&v, "str"))
}

/// `args[i]` traced to an Arr, else a TypeErr naming its position.
pub(crate) fn arr_arg(interp: &Interpreter, args: &[Value], i: usize) -> EvalResult<Rc<[Value]>> {
    interp
        .trace_arr(&arg(args, i))
        .ok_or_else(|| type_err(format!("\\{} must be arr", i + 1)))
}

/// `==` when either side is the prototype `proto` itself: only the
/// prototype equals itself. `None` when neither side is.
pub(crate) fn proto_identity(a: &Value, b: &Value, proto: &Value) -> Option<bool> {
    let Value::Obj(p) = proto else {
        return None;
    };
    match (is_same_obj(a, p), is_same_obj(b, p)) {
        (false, false) => None,
        (a, b) => Some(a && b),
    }
}

/// A native iterator over a fixed list of elements.
pub(crate) fn iter_over(elems: Vec<Value>) -> Value {
    let cursor = Cell::new(0_usize);
    Value::BuiltInIter(Rc::new(BuiltInIter::new(move |_, _| {
        let i = cursor.get();
        let elem = elems.get(i).cloned().ok_or_else(stop_iter_err)?;
        cursor.set(i + 1);
        Ok(elem)
    })))
}
