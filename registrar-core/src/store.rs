//! Generic keyed store for one entity kind.
//!
//! Thin wrapper over a `HashMap`. Callers own key freshness: `insert`
//! overwrites silently. Snapshot order from [`EntityStore::all`] is unspecified.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct EntityStore<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for EntityStore<K, V> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

impl<K: Eq + Hash, V> EntityStore<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Returns `true` iff an entry existed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Replace the value under `key`. Returns `false` (and stores nothing)
    /// when the key is absent.
    pub fn update(&mut self, key: &K, value: V) -> bool {
        match self.entries.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }
}

impl<K: Eq + Hash, V: Clone> EntityStore<K, V> {
    /// Cloned snapshot of every value.
    pub fn all(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }
}
