//! Func invocation and argument binding.

use std::cell::Cell;
use std::rc::Rc;

use smallvec::SmallVec;

use pangaea_ir::{Expr, ExprKind, FuncComponent, Name};

use super::interned_names::SymNames;
use super::{Interpreter, Outcome};
use crate::environment::Env;
use crate::errors::{stack_overflow_err, type_err, EvalResult};
use crate::value::{FuncKind, FuncValue, ObjValue, Value};

/// One running func body; leaves the call count when dropped.
pub(crate) struct CallDepth<'a>(&'a Cell<usize>);

impl Drop for CallDepth<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl Interpreter {
    /// Count one more running body, raising past `max_call_depth`.
    pub(crate) fn enter_call(&self) -> EvalResult<CallDepth<'_>> {
        let depth = self.call_depth.get();
        if depth >= self.max_call_depth {
            tracing::debug!(depth, "call depth limit reached");
            return Err(stack_overflow_err(self.max_call_depth));
        }
        self.call_depth.set(depth + 1);
        Ok(CallDepth(&self.call_depth))
    }

    /// Call any callable value: a func literal or a native func.
    pub fn call_func(
        &self,
        env: &Env,
        func: &Value,
        args: &[Value],
        kwargs: &ObjValue,
    ) -> EvalResult {
        match func {
            Value::Func(f) => self.call_pan_func(f, args, kwargs),
            Value::BuiltIn(b) => b.call(self, env, kwargs, args),
            other => Err(type_err(format!("`{}` is not callable.", other.inspect()))),
        }
    }

    /// Run a func literal's body in a new frame inside its captured env.
    pub(crate) fn call_pan_func(
        &self,
        func: &Rc<FuncValue>,
        args: &[Value],
        kwargs: &ObjValue,
    ) -> EvalResult {
        let _depth = self.enter_call()?;
        let env = Env::new_enclosed(&func.env());
        self.assign_args(&env, func, args, kwargs);
        let body = &func.component.body;
        let result = self
            .eval_stmts(body, &env)
            .map(Outcome::into_value)
            .map_err(|e| match body.first() {
                Some(stmt) => e.with_trace(&stmt.src),
                None => e,
            });
        env.release();
        result
    }

    /// Bind params, `\1..\n`, `\`, `\0`, kwargs, `\name` and `\_` in `env`.
    ///
    /// Missing params are nil; extra args are only reachable through `\0`
    /// and `\n`.
    pub(crate) fn assign_args(
        &self,
        env: &Env,
        func: &FuncValue,
        args: &[Value],
        kwargs: &ObjValue,
    ) {
        for (i, param) in func.params().iter().enumerate() {
            env.set(*param, args.get(i).cloned().unwrap_or(Value::Nil));
        }
        for (i, arg) in args.iter().enumerate() {
            env.set(SymNames::positional(i + 1), arg.clone());
        }
        env.set(self.names.args, Value::arr(args.to_vec()));
        env.set(
            self.names.arg,
            args.first().cloned().unwrap_or(Value::Nil),
        );

        for (name, default) in func.kwargs.all_pairs() {
            let value = kwargs.get(name).unwrap_or(default).clone();
            env.set(name, value);
        }
        for (name, value) in kwargs.all_pairs() {
            env.set(Name::intern(&format!("\\{name}")), value.clone());
        }
        env.set(self.names.kwargs, self.as_script_obj(kwargs));
    }

    /// Evaluate call-site arguments left to right, expanding `*arr` and `**obj`.
    ///
    /// Explicit keywords win over `**` unpacked ones; among unpacked objs
    /// the first one giving a key wins.
    pub(crate) fn eval_call_args(
        &self,
        args: &[Expr],
        kwargs: &[(Name, Expr)],
        env: &Env,
    ) -> EvalResult<(Vec<Value>, ObjValue)> {
        let mut positional = Vec::with_capacity(args.len());
        let mut unpacked: SmallVec<[(Name, Value); 4]> = SmallVec::new();

        for arg in args {
            match unpack_prefix(arg) {
                Some(("*", inner)) => {
                    let value = self.eval_expr(inner, env)?;
                    let elems = self.trace_arr(&value).ok_or_else(|| {
                        type_err(format!("cannot use `*` unpacking for `{}`", value.inspect()))
                    })?;
                    positional.extend(elems.iter().cloned());
                }
                Some(("**", inner)) => {
                    let value = self.eval_expr(inner, env)?;
                    let Value::Obj(obj) = &value else {
                        return Err(type_err(format!(
                            "cannot use `**` unpacking for `{}`",
                            value.inspect()
                        )));
                    };
                    unpacked.extend(obj.all_pairs().map(|(k, v)| (k, v.clone())));
                }
                _ => positional.push(self.eval_expr(arg, env)?),
            }
        }
        let mut named: SmallVec<[(Name, Value); 4]> = SmallVec::with_capacity(kwargs.len());
        for (name, expr) in kwargs {
            named.push((*name, self.eval_expr(expr, env)?));
        }

        // ObjValue::new keeps the first of duplicate keys
        let kwargs = ObjValue::new(
            named.into_iter().chain(unpacked),
            Some(self.protos.obj.clone()),
        );
        Ok((positional, kwargs))
    }

    /// Create a func or iter value closed over a new frame inside `env`.
    ///
    /// Kwarg defaults are evaluated now, in `env`.
    pub(crate) fn make_func(
        &self,
        component: &Rc<FuncComponent>,
        kind: FuncKind,
        env: &Env,
    ) -> EvalResult {
        let mut defaults = Vec::with_capacity(component.kwargs.len());
        for (name, expr) in &component.kwargs {
            defaults.push((*name, self.eval_expr(expr, env)?));
        }
        let kwargs = ObjValue::new(defaults, Some(self.protos.obj.clone()));
        let func = FuncValue::new(Rc::clone(component), kwargs, kind, Env::new_enclosed(env));
        Ok(Value::Func(Rc::new(func)))
    }

    /// Apply a func to a chain receiver, as literal and var chains do.
    ///
    /// The receiver is the sole argument, unless the func takes two or more
    /// params and the receiver is an Arr, which is then spread.
    pub(crate) fn call_with_receiver(&self, env: &Env, func: &Value, recv: &Value) -> EvalResult {
        if let Value::BuiltIn(b) = func {
            return b.call(self, env, &ObjValue::default(), std::slice::from_ref(recv));
        }
        let Some(f) = self.trace_func(func) else {
            return Err(type_err("literal call must be func"));
        };
        let args = match self.trace_arr(recv) {
            Some(elems) if f.params().len() > 1 => elems.to_vec(),
            _ => vec![recv.clone()],
        };
        self.call_pan_func(&f, &args, &ObjValue::default())
    }
}

/// `*x` / `**x` in argument or element position.
pub(crate) fn unpack_prefix(expr: &Expr) -> Option<(&'static str, &Expr)> {
    match &expr.kind {
        ExprKind::Prefix { op, right } => match op.as_str() {
            "*" => Some(("*", right)),
            "**" => Some(("**", right)),
            _ => None,
        },
        _ => None,
    }
}
