use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use pangaea_ir::{FuncComponent, Name};

use super::{ObjValue, Value};
use crate::environment::Env;
use crate::errors::EvalResult;
use crate::interpreter::Interpreter;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FuncKind {
    Func,
    Iter,
}

/// A func or iter literal closed over the env it was created in.
pub struct FuncValue {
    pub component: Rc<FuncComponent>,
    /// Kwarg defaults, evaluated when the literal was.
    pub kwargs: ObjValue,
    pub kind: FuncKind,
    /// Iterators swap this on `recur`; plain funcs never touch it after creation.
    env: RefCell<Env>,
}

impl FuncValue {
    pub fn new(component: Rc<FuncComponent>, kwargs: ObjValue, kind: FuncKind, env: Env) -> Self {
        FuncValue {
            component,
            kwargs,
            kind,
            env: RefCell::new(env),
        }
    }

    /// Handle to the current env.
    pub fn env(&self) -> Env {
        self.env.borrow().clone()
    }

    /// Borrow of the current env that leaves its strong count untouched.
    pub(crate) fn env_ref(&self) -> std::cell::Ref<'_, Env> {
        self.env.borrow()
    }

    pub fn replace_env(&self, env: Env) {
        *self.env.borrow_mut() = env;
    }

    pub fn params(&self) -> &[Name] {
        &self.component.params
    }

    /// `{|a| body}` or `<{|a| body}>`.
    pub fn inspect(&self) -> String {
        match self.kind {
            FuncKind::Func => format!("{{{}}}", self.component),
            FuncKind::Iter => format!("<{{{}}}>", self.component),
        }
    }
}

impl fmt::Debug for FuncValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

/// Native prop body: `(interpreter, caller env, kwargs, args)`.
///
/// For a prop call `args[0]` is the receiver.
pub type NativeFn = Rc<dyn Fn(&Interpreter, &Env, &ObjValue, &[Value]) -> EvalResult>;

pub struct BuiltInFunc {
    /// `Type#prop`, or the bare name for injected funcs like `recur`.
    pub name: String,
    pub func: NativeFn,
}

impl BuiltInFunc {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Interpreter, &Env, &ObjValue, &[Value]) -> EvalResult + 'static,
    ) -> Self {
        BuiltInFunc {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    #[inline]
    pub fn call(
        &self,
        interp: &Interpreter,
        env: &Env,
        kwargs: &ObjValue,
        args: &[Value],
    ) -> EvalResult {
        (self.func)(interp, env, kwargs, args)
    }
}

impl fmt::Debug for BuiltInFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltInFunc({})", self.name)
    }
}

/// Native iterator. Its state lives in whatever the closure captured.
pub struct BuiltInIter {
    next: Box<dyn Fn(&Interpreter, &Env) -> EvalResult>,
}

impl BuiltInIter {
    pub fn new(next: impl Fn(&Interpreter, &Env) -> EvalResult + 'static) -> Self {
        BuiltInIter {
            next: Box::new(next),
        }
    }

    /// Next element, or a StopIterErr once exhausted.
    #[inline]
    pub fn advance(&self, interp: &Interpreter, env: &Env) -> EvalResult {
        (self.next)(interp, env)
    }
}

impl fmt::Debug for BuiltInIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BuiltInIter")
    }
}
