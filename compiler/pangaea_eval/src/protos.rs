//! The built-in prototype graph.
//!
//! ```text
//! BaseObj
//! └── Obj
//!     ├── Num ── Int, Float
//!     ├── Nil, Str, Arr, Range, Map, Func, Iter, IO, Diamond, Kernel
//!     ├── Either ── EitherVal, EitherErr
//!     └── Err ── AssertionErr, NameErr, NoPropErr, ... (one per ErrKind)
//! ```
//!
//! Each node is an Obj holding the native props registered for its type in
//! the [`PropContainer`], plus `_name`. The graph is built once per
//! interpreter and never mutated afterwards.

use std::rc::Rc;

use pangaea_ir::Name;

use crate::errors::ErrKind;
use crate::props::PropContainer;
use crate::value::{MapValue, ObjValue, Value};

pub struct Protos {
    pub base_obj: Value,
    pub obj: Value,
    pub num: Value,
    pub int: Value,
    pub float: Value,
    pub nil: Value,
    pub str: Value,
    pub arr: Value,
    pub range: Value,
    pub map: Value,
    pub func: Value,
    pub iter: Value,
    pub io: Value,
    pub diamond: Value,
    pub kernel: Value,
    pub either: Value,
    pub either_val: Value,
    pub either_err: Value,
    /// Indexed by [`ErrKind::index`]; `Err` itself is at index 0.
    err_kinds: Vec<Value>,
}

fn node(container: &PropContainer, ty: &str, proto: Option<&Value>) -> Value {
    let mut pairs = container.pairs_for(ty);
    pairs.push((Name::intern("_name"), Value::str(ty)));
    Value::obj(ObjValue::new(pairs, proto.cloned()))
}

impl Protos {
    pub(crate) fn new(container: &PropContainer) -> Self {
        let base_obj = node(container, "BaseObj", None);
        let obj = node(container, "Obj", Some(&base_obj));
        let num = node(container, "Num", Some(&obj));
        let err = node(container, "Err", Some(&obj));
        let either = node(container, "Either", Some(&obj));
        let err_kinds = ErrKind::ALL
            .iter()
            .map(|kind| match kind {
                ErrKind::Err => err.clone(),
                other => node(container, other.as_str(), Some(&err)),
            })
            .collect();

        Protos {
            int: node(container, "Int", Some(&num)),
            float: node(container, "Float", Some(&num)),
            nil: node(container, "Nil", Some(&obj)),
            str: node(container, "Str", Some(&obj)),
            arr: node(container, "Arr", Some(&obj)),
            range: node(container, "Range", Some(&obj)),
            map: node(container, "Map", Some(&obj)),
            func: node(container, "Func", Some(&obj)),
            iter: node(container, "Iter", Some(&obj)),
            io: node(container, "IO", Some(&obj)),
            diamond: node(container, "Diamond", Some(&obj)),
            kernel: node(container, "Kernel", Some(&obj)),
            either_val: node(container, "EitherVal", Some(&either)),
            either_err: node(container, "EitherErr", Some(&either)),
            either,
            err_kinds,
            num,
            obj,
            base_obj,
        }
    }

    pub fn err_kind(&self, kind: ErrKind) -> &Value {
        &self.err_kinds[kind.index()]
    }

    /// The kind whose prototype is exactly `obj`.
    pub fn kind_of_proto(&self, obj: &Rc<ObjValue>) -> Option<ErrKind> {
        ErrKind::ALL
            .into_iter()
            .find(|kind| is_same_obj(self.err_kind(*kind), obj))
    }

    /// Whether `obj` is a node of the built-in graph.
    pub fn is_builtin(&self, obj: &Rc<ObjValue>) -> bool {
        [
            &self.base_obj,
            &self.obj,
            &self.num,
            &self.int,
            &self.float,
            &self.nil,
            &self.str,
            &self.arr,
            &self.range,
            &self.map,
            &self.func,
            &self.iter,
            &self.io,
            &self.diamond,
            &self.kernel,
            &self.either,
            &self.either_val,
            &self.either_err,
        ]
        .into_iter()
        .chain(&self.err_kinds)
        .any(|v| is_same_obj(v, obj))
    }

    /// Prototypes of value types act as that type's zero value when traced
    /// (`Int` behaves as `0`, `Str` as `""`).
    pub fn zero_value(&self, obj: &Rc<ObjValue>) -> Option<Value> {
        if is_same_obj(&self.int, obj) {
            Some(Value::Int(0))
        } else if is_same_obj(&self.float, obj) {
            Some(Value::Float(0.0))
        } else if is_same_obj(&self.str, obj) {
            Some(Value::str(""))
        } else if is_same_obj(&self.arr, obj) {
            Some(Value::arr(Vec::new()))
        } else if is_same_obj(&self.nil, obj) {
            Some(Value::Nil)
        } else if is_same_obj(&self.map, obj) {
            Some(Value::map(MapValue::new()))
        } else if is_same_obj(&self.range, obj) {
            Some(Value::range(Value::Nil, Value::Nil, Value::Nil))
        } else {
            None
        }
    }

    /// Global bindings for every prototype, by its `_name`.
    pub fn globals(&self) -> Vec<(Name, Value)> {
        let mut globals: Vec<(Name, Value)> = [
            ("BaseObj", &self.base_obj),
            ("Obj", &self.obj),
            ("Num", &self.num),
            ("Int", &self.int),
            ("Float", &self.float),
            ("Nil", &self.nil),
            ("Str", &self.str),
            ("Arr", &self.arr),
            ("Range", &self.range),
            ("Map", &self.map),
            ("Func", &self.func),
            ("Iter", &self.iter),
            ("Diamond", &self.diamond),
            ("Kernel", &self.kernel),
            ("Either", &self.either),
            ("EitherVal", &self.either_val),
            ("EitherErr", &self.either_err),
        ]
        .into_iter()
        .map(|(name, v)| (Name::intern(name), v.clone()))
        .collect();
        globals.extend(
            ErrKind::ALL
                .into_iter()
                .map(|kind| (Name::intern(kind.as_str()), self.err_kind(kind).clone())),
        );
        globals
    }
}

/// Whether `value` is the Obj behind `obj`.
pub fn is_same_obj(value: &Value, obj: &Rc<ObjValue>) -> bool {
    matches!(value, Value::Obj(o) if Rc::ptr_eq(o, obj))
}
