//! Prototype-chain dispatch and value tracing.

use std::rc::Rc;

use pangaea_ir::Name;

use super::Interpreter;
use crate::environment::Env;
use crate::errors::{no_prop_err, type_err, value_err, EvalError, EvalResult};
use crate::value::{FuncValue, MapValue, ObjValue, RangeValue, Value};

impl Interpreter {
    /// First value stored under `name` along `recv`'s prototype chain.
    ///
    /// Only Obj nodes hold pairs; other values are stepped over.
    pub fn find_prop(&self, recv: &Value, name: Name) -> Option<Value> {
        let mut current = recv.clone();
        loop {
            if let Value::Obj(o) = &current {
                if let Some(v) = o.get(name) {
                    return Some(v.clone());
                }
            }
            current = current.proto(&self.protos)?;
        }
    }

    /// The Obj along `recv`'s chain that owns `name`.
    pub fn find_owner(&self, recv: &Value, name: Name) -> Option<Value> {
        let mut current = recv.clone();
        loop {
            if let Value::Obj(o) = &current {
                if o.get(name).is_some() {
                    return Some(current);
                }
            }
            current = current.proto(&self.protos)?;
        }
    }

    /// `recv.name(args, kwargs)`, falling back to `_missing`.
    pub fn call_prop(
        &self,
        env: &Env,
        recv: &Value,
        name: Name,
        args: &[Value],
        kwargs: &ObjValue,
    ) -> EvalResult {
        if let Some(prop) = self.find_prop(recv, name) {
            return self.invoke_prop(env, recv, prop, args, kwargs);
        }
        let Some(missing) = self.find_prop(recv, self.names.missing) else {
            return Err(no_prop_err(format!("property `{name}` is not defined.")));
        };
        let mut with_name = Vec::with_capacity(args.len() + 1);
        with_name.push(Value::str(name.as_str()));
        with_name.extend_from_slice(args);
        self.invoke_prop(env, recv, missing, &with_name, kwargs)
    }

    /// `recv.name` with no arguments.
    #[inline]
    pub fn call_prop0(&self, env: &Env, recv: &Value, name: Name) -> EvalResult {
        self.call_prop(env, recv, name, &[], &ObjValue::default())
    }

    /// Call a found prop with `recv` prepended; non-callables are the result.
    fn invoke_prop(
        &self,
        env: &Env,
        recv: &Value,
        prop: Value,
        args: &[Value],
        kwargs: &ObjValue,
    ) -> EvalResult {
        match &prop {
            Value::BuiltIn(b) => b.call(self, env, kwargs, &prepend(recv, args)),
            Value::Func(f) => self.call_pan_func(f, &prepend(recv, args), kwargs),
            _ => Ok(prop),
        }
    }

    /// Walk prototypes until a non-Obj value, or a built-in prototype that
    /// stands for its zero value. Plain objects trace to `BaseObj`.
    pub fn trace(&self, value: &Value) -> Value {
        let mut current = value.clone();
        loop {
            let next = match &current {
                Value::Obj(o) => {
                    if let Some(zero) = self.protos.zero_value(o) {
                        return zero;
                    }
                    match o.proto() {
                        Some(p) => p.clone(),
                        None => return current,
                    }
                }
                _ => return current,
            };
            current = next;
        }
    }

    pub fn trace_int(&self, value: &Value) -> Option<i64> {
        match self.trace(value) {
            Value::Int(i) => Some(i),
            Value::Bool(b) => Some(i64::from(b)),
            _ => None,
        }
    }

    pub fn trace_float(&self, value: &Value) -> Option<f64> {
        match self.trace(value) {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }

    pub fn trace_str(&self, value: &Value) -> Option<Rc<str>> {
        match self.trace(value) {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn trace_arr(&self, value: &Value) -> Option<Rc<[Value]>> {
        match self.trace(value) {
            Value::Arr(a) => Some(a),
            _ => None,
        }
    }

    pub fn trace_map(&self, value: &Value) -> Option<Rc<MapValue>> {
        match self.trace(value) {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn trace_range(&self, value: &Value) -> Option<Rc<RangeValue>> {
        match self.trace(value) {
            Value::Range(r) => Some(r),
            _ => None,
        }
    }

    pub fn trace_func(&self, value: &Value) -> Option<Rc<FuncValue>> {
        match self.trace(value) {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn trace_err(&self, value: &Value) -> Option<Rc<EvalError>> {
        match self.trace(value) {
            Value::Err(e) => Some(e),
            _ => None,
        }
    }

    pub fn traces_to_nil(&self, value: &Value) -> bool {
        matches!(self.trace(value), Value::Nil)
    }

    /// `value.B`, where only `true` (or a nonzero Int) counts.
    pub fn is_truthy(&self, env: &Env, value: &Value) -> EvalResult<bool> {
        match value {
            Value::Bool(b) => return Ok(*b),
            Value::Nil => return Ok(false),
            _ => {}
        }
        Ok(match self.call_prop0(env, value, self.names.b)? {
            Value::Bool(b) => b,
            Value::Int(i) => i != 0,
            _ => false,
        })
    }

    /// `value.S`, which must produce a Str.
    pub fn to_display(&self, env: &Env, value: &Value) -> EvalResult<String> {
        if let Value::Str(s) = value {
            return Ok(s.to_string());
        }
        let s = self.call_prop0(env, value, self.names.s)?;
        self.trace_str(&s)
            .map(|s| s.to_string())
            .ok_or_else(|| value_err(".S must return str"))
    }

    /// `a == b` through the `==` prop.
    pub fn values_equal(&self, env: &Env, a: &Value, b: &Value) -> EvalResult<bool> {
        let result = self.call_prop(env, a, self.names.eq, std::slice::from_ref(b), &ObjValue::default())?;
        Ok(matches!(result, Value::Bool(true)) || matches!(result, Value::Int(1)))
    }

    /// A plain Obj (prototype `Obj`).
    pub fn new_obj(&self, pairs: impl IntoIterator<Item = (Name, Value)>) -> Value {
        Value::obj(ObjValue::new(pairs, Some(self.protos.obj.clone())))
    }

    /// Same pairs re-parented under `Obj`, so scripts can use them normally.
    pub fn as_script_obj(&self, obj: &ObjValue) -> Value {
        Value::obj(obj.with_proto(Some(self.protos.obj.clone())))
    }

    /// The iterator of `value` (`value._iter`).
    pub fn iter_of(&self, env: &Env, value: &Value) -> EvalResult {
        if self.find_prop(value, self.names.iter).is_none() {
            return Err(type_err(format!(
                "`{}` must have prop `_iter`",
                value.inspect()
            )));
        }
        self.call_prop0(env, value, self.names.iter)
    }

    /// `iter.next`, or `None` once it raises StopIterErr.
    pub fn iter_next(&self, env: &Env, iter: &Value) -> EvalResult<Option<Value>> {
        match self.call_prop0(env, iter, self.names.next) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_stop_iter() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Drive `value`'s iterator to exhaustion.
    pub fn for_each(
        &self,
        env: &Env,
        value: &Value,
        mut f: impl FnMut(Value) -> EvalResult<()>,
    ) -> EvalResult<()> {
        let iter = self.iter_of(env, value)?;
        while let Some(elem) = self.iter_next(env, &iter)? {
            f(elem)?;
        }
        Ok(())
    }
}

fn prepend(recv: &Value, args: &[Value]) -> Vec<Value> {
    let mut all = Vec::with_capacity(args.len() + 1);
    all.push(recv.clone());
    all.extend_from_slice(args);
    all
}
