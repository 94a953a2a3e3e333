//! Iterator resumption.
//!
//! An iter literal `<{|a| ...}>` is a func whose env persists between
//! `next` calls. Each `next` runs the body in that env: the first `yield`
//! (or `return`) is the element, and a body that runs off the end stops the
//! iteration. `recur(args)` replaces the env with a fresh frame holding new
//! argument bindings, which is how an iter advances its state.

use std::rc::{Rc, Weak};

use super::{Interpreter, Outcome};
use crate::environment::Env;
use crate::errors::{stop_iter_err, type_err, EvalResult};
use crate::value::{BuiltInFunc, FuncKind, FuncValue, ObjValue, Value};

impl Interpreter {
    /// One step of any iterator value.
    pub(crate) fn iter_advance(&self, env: &Env, it: &Value) -> EvalResult {
        match it {
            Value::BuiltInIter(b) => b.advance(self, env),
            _ => match self.trace_func(it) {
                Some(f) if f.kind == FuncKind::Iter => self.resume_iter(&f),
                _ => Err(type_err(format!("`{}` is not callable.", it.inspect()))),
            },
        }
    }

    fn resume_iter(&self, iter: &Rc<FuncValue>) -> EvalResult {
        let _depth = self.enter_call()?;
        let env = iter.env();
        env.inject_recur(recur_for(iter));
        let body = &iter.component.body;
        let result = match self.eval_stmts(body, &env) {
            Ok(Outcome::Completed(_)) => Err(stop_iter_err()),
            Ok(Outcome::Returned(v) | Outcome::Yielded(v)) => Ok(v),
            Err(e) => Err(match body.first() {
                Some(stmt) => e.with_trace(&stmt.src),
                None => e,
            }),
        };
        // `recur` swapped in a new frame; the old one is done
        let replaced = !iter.env_ref().ptr_eq(&env);
        if replaced {
            env.release();
        }
        result
    }

    /// `Iter.new(it, args...)`: the same body restarted with new arguments.
    pub(crate) fn iter_new(&self, it: &Value, args: &[Value], kwargs: &ObjValue) -> EvalResult {
        let Some(f) = self.trace_func(it).filter(|f| f.kind == FuncKind::Iter) else {
            return Err(type_err("\\1 must be iter"));
        };
        let outer = f.env().outer().unwrap_or_default();
        let fresh = FuncValue::new(
            Rc::clone(&f.component),
            f.kwargs.clone(),
            FuncKind::Iter,
            Env::new_enclosed(&outer),
        );
        self.assign_args(&fresh.env(), &fresh, args, kwargs);
        Ok(Value::Func(Rc::new(fresh)))
    }

    /// `it._iter`: a func iter restarts from its current state in a copied
    /// env; a native iter is its own iterator.
    pub(crate) fn iter_copy(&self, it: &Value) -> EvalResult {
        if let Value::BuiltInIter(_) = it {
            return Ok(it.clone());
        }
        let Some(f) = self.trace_func(it).filter(|f| f.kind == FuncKind::Iter) else {
            return Err(type_err("\\1 must be iter"));
        };
        Ok(Value::Func(Rc::new(FuncValue::new(
            Rc::clone(&f.component),
            f.kwargs.clone(),
            FuncKind::Iter,
            f.env().copy(),
        ))))
    }
}

/// The `recur` bound inside a running iter body.
///
/// Holds the iter weakly: the iter's env holds `recur`, so a strong
/// reference would keep both alive forever.
fn recur_for(iter: &Rc<FuncValue>) -> Value {
    let weak: Weak<FuncValue> = Rc::downgrade(iter);
    let recur = BuiltInFunc::new("recur", move |interp, _env, kwargs, args| {
        let Some(iter) = weak.upgrade() else {
            return Ok(Value::Nil);
        };
        let outer = iter.env().outer().unwrap_or_default();
        let fresh = Env::new_enclosed(&outer);
        interp.assign_args(&fresh, &iter, args, kwargs);
        iter.replace_env(fresh);
        Ok(Value::Nil)
    });
    Value::BuiltIn(Rc::new(recur))
}
