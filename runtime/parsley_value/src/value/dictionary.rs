//! Ordered dictionaries with lazily evaluated entries.

use std::fmt;
use std::sync::Arc;

use parsley_ir::ExprRef;
use rustc_hash::FxHashMap;

use super::{Nested, Value};
use crate::Environment;

/// A dictionary or record entry.
///
/// Literal dictionaries store their entry expressions unevaluated along with
/// the scope they were written in, and evaluate them on every read. Entries
/// produced at runtime (casts, `set`, table rows) are stored ready.
#[derive(Clone)]
pub enum Thunk {
    /// Already a value.
    Ready(Value),
    /// Evaluated against `env` each time it is read.
    Deferred { expr: ExprRef, env: Environment },
}

impl Thunk {
    /// The value, if no evaluation is needed to get it.
    pub fn ready(&self) -> Option<&Value> {
        match self {
            Thunk::Ready(value) => Some(value),
            Thunk::Deferred { .. } => None,
        }
    }
}

impl PartialEq for Thunk {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Thunk::Ready(a), Thunk::Ready(b)) => a == b,
            (
                Thunk::Deferred { expr: a, env: ea },
                Thunk::Deferred { expr: b, env: eb },
            ) => Arc::ptr_eq(a, b) && Environment::ptr_eq(ea, eb),
            _ => false,
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thunk::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Thunk::Deferred { expr, .. } => write!(f, "Deferred({expr})"),
        }
    }
}

impl fmt::Display for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thunk::Ready(value) => write!(f, "{}", Nested(value)),
            Thunk::Deferred { expr, .. } => write!(f, "{expr}"),
        }
    }
}

/// String-keyed mapping that remembers insertion order.
///
/// `order` holds every key of `entries` exactly once and nothing else;
/// every mutator below keeps the two in step.
#[derive(Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: FxHashMap<String, Thunk>,
    order: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary of ready values, in iteration order.
    pub fn from_values<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in pairs {
            dict.insert_value(key, value);
        }
        dict
    }

    /// Insert or replace an entry. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, thunk: Thunk) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.entries.insert(key, thunk);
    }

    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.insert(key, Thunk::Ready(value));
    }

    /// Insert a new key at `index` in the key order (clamped to the end).
    ///
    /// If the key already exists it is moved there.
    pub fn insert_at(&mut self, index: usize, key: impl Into<String>, thunk: Thunk) {
        let key = key.into();
        if self.entries.contains_key(&key) {
            self.order.retain(|k| *k != key);
        }
        let index = index.min(self.order.len());
        self.order.insert(index, key.clone());
        self.entries.insert(key, thunk);
    }

    pub fn get(&self, key: &str) -> Option<&Thunk> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Position of `key` in the key order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.order.iter().position(|k| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Thunk> {
        let removed = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Rename `old` to `new` in place. Returns `false` if `old` is absent.
    ///
    /// An existing entry under `new` is replaced.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(thunk) = self.entries.remove(old) else {
            return false;
        };
        if old != new && self.entries.remove(new).is_some() {
            self.order.retain(|k| k != new);
        }
        for key in &mut self.order {
            if key == old {
                new.clone_into(key);
            }
        }
        self.entries.insert(new.to_string(), thunk);
        true
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Thunk)> {
        self.order
            .iter()
            .filter_map(|k| self.entries.get(k).map(|t| (k.as_str(), t)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `self ++ other`: right-hand values win, left-hand positions are kept,
    /// keys only in `other` follow in `other`'s order.
    #[must_use]
    pub fn merged(&self, other: &Dictionary) -> Dictionary {
        let mut merged = self.clone();
        for (key, thunk) in other.iter() {
            merged.insert(key, thunk.clone());
        }
        merged
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, thunk)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {thunk}")?;
        }
        f.write_str("}")
    }
}
