//! Runtime values.
//!
//! Every value is immutable once built; collections are behind `Rc` so
//! copies are cheap and structural sharing is free. The only mutable state
//! lives in environments (and therefore in a func's captured env).
//!
//! `true` and `false` are their own variant but behave as the Ints `1` and
//! `0`: their prototype is that Int, so arithmetic and `==` see them as
//! numbers while `S`/`repr` print `true`/`false`.

mod func;
mod map;
mod obj;

pub use func::{BuiltInFunc, BuiltInIter, FuncKind, FuncValue, NativeFn};
pub use map::{HashKey, MapValue};
pub use obj::{is_public_key, ObjValue};

use std::fmt;
use std::rc::Rc;

use crate::errors::EvalError;
use crate::io::IoHandles;
use crate::protos::Protos;

/// `(start:stop:step)`; any part may be nil.
#[derive(Clone, Debug)]
pub struct RangeValue {
    pub start: Value,
    pub stop: Value,
    pub step: Value,
}

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Arr(Rc<[Value]>),
    Obj(Rc<ObjValue>),
    Map(Rc<MapValue>),
    Range(Rc<RangeValue>),
    Func(Rc<FuncValue>),
    BuiltIn(Rc<BuiltInFunc>),
    BuiltInIter(Rc<BuiltInIter>),
    /// An error held as a value; it propagates only when raised.
    Err(Rc<EvalError>),
    Io(IoHandles),
}

impl Value {
    #[inline]
    pub fn str(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    #[inline]
    pub fn arr(elems: Vec<Value>) -> Value {
        Value::Arr(elems.into())
    }

    #[inline]
    pub fn obj(obj: ObjValue) -> Value {
        Value::Obj(Rc::new(obj))
    }

    #[inline]
    pub fn map(map: MapValue) -> Value {
        Value::Map(Rc::new(map))
    }

    pub fn range(start: Value, stop: Value, step: Value) -> Value {
        Value::Range(Rc::new(RangeValue { start, stop, step }))
    }

    pub fn wrap_err(err: EvalError) -> Value {
        Value::Err(Rc::new(err))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Next node in the prototype chain. Only the base object has none.
    pub fn proto(&self, protos: &Protos) -> Option<Value> {
        let proto = match self {
            Value::Nil => &protos.nil,
            Value::Bool(b) => return Some(Value::Int(i64::from(*b))),
            Value::Int(_) => &protos.int,
            Value::Float(_) => &protos.float,
            Value::Str(_) => &protos.str,
            Value::Arr(_) => &protos.arr,
            Value::Obj(o) => return o.proto().cloned(),
            Value::Map(_) => &protos.map,
            Value::Range(_) => &protos.range,
            Value::Func(f) => match f.kind {
                FuncKind::Func => &protos.func,
                FuncKind::Iter => &protos.iter,
            },
            Value::BuiltIn(_) => &protos.func,
            Value::BuiltInIter(_) => &protos.iter,
            Value::Err(e) => protos.err_kind(e.kind),
            Value::Io(_) => &protos.io,
        };
        Some(proto.clone())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::Arr(_) => "Arr",
            Value::Obj(_) => "Obj",
            Value::Map(_) => "Map",
            Value::Range(_) => "Range",
            Value::Func(f) => match f.kind {
                FuncKind::Func => "Func",
                FuncKind::Iter => "Iter",
            },
            Value::BuiltIn(_) => "BuiltIn",
            Value::BuiltInIter(_) => "BuiltInIter",
            Value::Err(_) => "Err",
            Value::Io(_) => "IO",
        }
    }

    /// Source-like form used by `repr`, `S` of non-scalars and error messages.
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        self.write_inspect(&mut out);
        out
    }

    fn write_inspect(&self, out: &mut String) {
        match self {
            Value::Nil => out.push_str("nil"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(i) => out.push_str(&i.to_string()),
            Value::Float(x) => out.push_str(&format_float(*x)),
            Value::Str(s) => out.push_str(&quote_str(s)),
            Value::Arr(elems) => {
                out.push('[');
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    e.write_inspect(out);
                }
                out.push(']');
            }
            Value::Obj(o) => out.push_str(&o.inspect()),
            Value::Map(m) => out.push_str(&m.inspect()),
            Value::Range(r) => {
                out.push('(');
                r.start.write_inspect(out);
                out.push(':');
                r.stop.write_inspect(out);
                out.push(':');
                r.step.write_inspect(out);
                out.push(')');
            }
            Value::Func(f) => out.push_str(&f.inspect()),
            Value::BuiltIn(_) => out.push_str("{|| [builtin]}"),
            Value::BuiltInIter(_) => out.push_str("<{|| [builtin]}>"),
            Value::Err(e) => out.push_str(&e.to_string()),
            Value::Io(_) => out.push_str("IO"),
        }
    }

    /// Display form: strings unquoted, everything else as [`Value::inspect`].
    pub fn display(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.inspect(),
        }
    }
}

/// Shortest form that reads back as a Float (`1.0`, `0.25`, `1e100`).
pub fn format_float(x: f64) -> String {
    format!("{x:?}")
}

/// Double-quoted literal that the lexer reads back to the same text.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '#' if chars.peek() == Some(&'{') => out.push_str("\\#"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self.inspect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}

/// Host-side structural equality, used by tests and map construction.
///
/// Scripts compare through the `==` prop instead, which also follows
/// prototypes.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(b), Value::Int(i)) | (Value::Int(i), Value::Bool(b)) => {
                i64::from(*b) == *i
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Arr(a), Value::Arr(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => Rc::ptr_eq(a, b) || a.same_pairs(b),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b) || a.inspect() == b.inspect(),
            (Value::Range(a), Value::Range(b)) => {
                a.start == b.start && a.stop == b.stop && a.step == b.step
            }
            (Value::Func(a), Value::Func(b)) => Rc::ptr_eq(a, b) || a.inspect() == b.inspect(),
            (Value::BuiltIn(a), Value::BuiltIn(b)) => Rc::ptr_eq(a, b),
            (Value::BuiltInIter(a), Value::BuiltInIter(b)) => Rc::ptr_eq(a, b),
            (Value::Err(a), Value::Err(b)) => a.kind == b.kind && a.message == b.message,
            (Value::Io(_), Value::Io(_)) => true,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}
