//! Lexical environments.
//!
//! A frame maps [`Name`]s to values and links to its outer frame. Frames are
//! shared handles: a func literal captures the frame it was created in, and an
//! iterator keeps its own frame alive between `next` calls.
//!
//! Frames and funcs can reference each other (a func stored in the frame that
//! it captured), which forms an `Rc` cycle. A finished call frame is handed
//! to [`Env::release`], which breaks such cycles once nothing outside them
//! holds on (see [`release`]).

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use pangaea_ir::Name;

use crate::io::IoHandles;
use crate::Value;

/// A single-threaded shared frame.
///
/// All frame allocations go through [`LocalScope::new`]; the `Rc` is not
/// exposed, so nobody builds frames by hand.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Identity of the shared allocation.
    #[inline]
    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Bindings of one frame.
#[derive(Clone, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    outer: Option<Env>,
}

/// Handle to a frame.
#[derive(Clone)]
pub struct Env(LocalScope<Scope>);

impl Env {
    /// A root frame.
    pub fn new() -> Self {
        Env(LocalScope::new(Scope::default()))
    }

    /// A fresh frame whose lookups fall back to `outer`.
    pub fn new_enclosed(outer: &Env) -> Self {
        Env(LocalScope::new(Scope {
            bindings: FxHashMap::default(),
            outer: Some(outer.clone()),
        }))
    }

    /// Look up `name` here, then in the outer frames.
    pub fn get(&self, name: Name) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let scope = current.0.borrow();
                if let Some(v) = scope.bindings.get(&name) {
                    return Some(v.clone());
                }
                scope.outer.clone()?
            };
            current = next;
        }
    }

    /// Bind `name` in this frame only.
    pub fn set(&self, name: Name, value: Value) {
        self.0.borrow_mut().bindings.insert(name, value);
    }

    pub fn outer(&self) -> Option<Env> {
        self.0.borrow().outer.clone()
    }

    /// A new frame with a copy of this frame's bindings and the same outer.
    #[must_use]
    pub fn copy(&self) -> Env {
        Env(LocalScope::new(self.0.borrow().clone()))
    }

    /// Own bindings, sorted by name.
    pub fn items(&self) -> Vec<(Name, Value)> {
        let mut items: Vec<(Name, Value)> = self
            .0
            .borrow()
            .bindings
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        items.sort_by_key(|(k, _)| k.as_str());
        items
    }

    /// Bind the script-visible `IO` object.
    pub fn inject_io(&self, io: IoHandles) {
        self.set(Name::intern("IO"), Value::Io(io));
    }

    /// Bind `recur` for an iterator body.
    pub fn inject_recur(&self, recur: Value) {
        self.set(Name::intern("recur"), recur);
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Env) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Give up this handle to a frame whose evaluation has finished.
    ///
    /// A frame nobody else holds is dropped right away. Otherwise the frame
    /// may sit in a cycle with the funcs it defined; when no outside handle
    /// reaches that cycle, the bindings of its frames are cleared so the
    /// values can be freed.
    pub fn release(self) {
        if self.0.strong_count() > 1 {
            release::break_cycles(self);
        }
    }

    fn clear_bindings(&self) {
        let bindings = std::mem::take(&mut self.0.borrow_mut().bindings);
        drop(bindings);
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}

/// Prints binding names only; values may point back at this frame.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&str> = scope.bindings.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("has_outer", &scope.outer.is_some())
            .finish()
    }
}

mod release;
