use rustc_hash::FxHashMap;

use pangaea_ir::Name;

use super::{quote_str, Value};

/// Whether `key` is a public prop name (`^[A-Za-z][A-Za-z0-9_]*[!?]?$`).
pub fn is_public_key(key: &str) -> bool {
    let body = key.strip_suffix(['!', '?']).unwrap_or(key);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Immutable symbol-keyed object.
///
/// `keys` and `private_keys` together index every pair, each sorted by the
/// key string so iteration and inspection are deterministic.
#[derive(Clone, Debug, Default)]
pub struct ObjValue {
    pairs: FxHashMap<Name, Value>,
    keys: Vec<Name>,
    private_keys: Vec<Name>,
    proto: Option<Value>,
}

impl ObjValue {
    /// Build from pairs; when a key repeats, the first value wins.
    pub fn new(pairs: impl IntoIterator<Item = (Name, Value)>, proto: Option<Value>) -> Self {
        let mut map = FxHashMap::default();
        let mut keys = Vec::new();
        let mut private_keys = Vec::new();
        for (k, v) in pairs {
            if map.contains_key(&k) {
                continue;
            }
            map.insert(k, v);
            if is_public_key(k.as_str()) {
                keys.push(k);
            } else {
                private_keys.push(k);
            }
        }
        keys.sort_by_key(|k| k.as_str());
        private_keys.sort_by_key(|k| k.as_str());
        ObjValue {
            pairs: map,
            keys,
            private_keys,
            proto,
        }
    }

    #[inline]
    pub fn get(&self, key: Name) -> Option<&Value> {
        self.pairs.get(&key)
    }

    #[inline]
    pub fn proto(&self) -> Option<&Value> {
        self.proto.as_ref()
    }

    pub fn keys(&self) -> &[Name] {
        &self.keys
    }

    pub fn private_keys(&self) -> &[Name] {
        &self.private_keys
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Public pairs in key order.
    pub fn public_pairs(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.keys.iter().filter_map(|k| self.pairs.get(k).map(|v| (*k, v)))
    }

    /// Public pairs followed by private ones.
    pub fn all_pairs(&self) -> impl Iterator<Item = (Name, &Value)> + '_ {
        self.keys
            .iter()
            .chain(&self.private_keys)
            .filter_map(|k| self.pairs.get(k).map(|v| (*k, v)))
    }

    /// Same pairs with a different prototype.
    #[must_use]
    pub fn with_proto(&self, proto: Option<Value>) -> Self {
        ObjValue {
            proto,
            ..self.clone()
        }
    }

    /// Name given by an own `_name` Str pair; prototypes print as their name.
    pub fn own_name(&self) -> Option<&str> {
        match self.pairs.get(&Name::intern("_name")) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn same_pairs(&self, other: &ObjValue) -> bool {
        self.pairs.len() == other.pairs.len()
            && self
                .pairs
                .iter()
                .all(|(k, v)| other.pairs.get(k).is_some_and(|o| o == v))
    }

    /// `{"a": 1, "b": 2}`, all keys ordered by their quoted form.
    pub fn inspect(&self) -> String {
        if let Some(name) = self.own_name() {
            return name.to_string();
        }
        let mut entries: Vec<(String, String)> = self
            .pairs
            .iter()
            .map(|(k, v)| (quote_str(k.as_str()), v.inspect()))
            .collect();
        entries.sort();
        let body: Vec<String> = entries
            .into_iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        format!("{{{}}}", body.join(", "))
    }
}
