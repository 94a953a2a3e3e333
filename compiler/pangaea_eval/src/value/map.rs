use std::rc::Rc;

use rustc_hash::FxHashMap;

use super::Value;

/// Key of a hashable map entry. `true`/`false` hash as `1`/`0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HashKey {
    Nil,
    Int(i64),
    Str(Rc<str>),
}

impl HashKey {
    pub fn of(value: &Value) -> Option<HashKey> {
        match value {
            Value::Nil => Some(HashKey::Nil),
            Value::Bool(b) => Some(HashKey::Int(i64::from(*b))),
            Value::Int(i) => Some(HashKey::Int(*i)),
            Value::Str(s) => Some(HashKey::Str(Rc::clone(s))),
            _ => None,
        }
    }
}

/// Map with arbitrary keys.
///
/// Hashable keys go through `index`; the rest are kept in insertion order
/// and matched by the key's `==` prop, which the interpreter does since it
/// may call script code.
#[derive(Clone, Debug, Default)]
pub struct MapValue {
    index: FxHashMap<HashKey, usize>,
    entries: Vec<(Value, Value)>,
    non_hashable: Vec<(Value, Value)>,
}

impl MapValue {
    pub fn new() -> Self {
        MapValue::default()
    }

    /// Insert a hashable entry unless the key exists. Returns whether it was inserted.
    pub fn insert_hashable(&mut self, key: HashKey, k: Value, v: Value) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((k, v));
        true
    }

    /// Append a non-hashable entry. The caller has checked that no `==` key exists.
    pub fn push_non_hashable(&mut self, k: Value, v: Value) {
        self.non_hashable.push((k, v));
    }

    pub fn get_hashable(&self, key: &HashKey) -> Option<&Value> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn non_hashable(&self) -> &[(Value, Value)] {
        &self.non_hashable
    }

    /// Hashable entries in insertion order, then non-hashable ones.
    pub fn iter(&self) -> impl Iterator<Item = &(Value, Value)> + '_ {
        self.entries.iter().chain(&self.non_hashable)
    }

    pub fn len(&self) -> usize {
        self.entries.len() + self.non_hashable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `%{1: 2, "a": 3}`: hashable entries ordered by key, then the rest.
    pub fn inspect(&self) -> String {
        let mut hashable: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.inspect(), v.inspect()))
            .collect();
        hashable.sort();
        let parts: Vec<String> = hashable
            .into_iter()
            .chain(
                self.non_hashable
                    .iter()
                    .map(|(k, v)| (k.inspect(), v.inspect())),
            )
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        format!("%{{{}}}", parts.join(", "))
    }
}
