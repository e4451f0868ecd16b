//! Insertion-ordered multi-valued map.
//!
//! # Responsibility
//! - Map each key to one or more values while keeping key insertion order.
//! - Offer single-value accessors that return the first value.
//!
//! # Invariants
//! - A stored key always holds at least one value.
//! - `set` on an existing key keeps its position in the key order.
//! - Missing keys read as `None` (or an empty slice), never as a panic.

/// Ordered map from key to one-or-more values.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMap<V> {
    entries: Vec<(String, Vec<V>)>,
}

impl<V> Default for MultiMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> MultiMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| name == key)
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.get_all(key).first()
    }

    /// Returns the first value stored under `key`, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.position(key)?;
        self.entries[index].1.first_mut()
    }

    /// Returns every value stored under `key`, in insertion order.
    pub fn get_all(&self, key: &str) -> &[V] {
        match self.position(key) {
            Some(index) => self.entries[index].1.as_slice(),
            None => &[],
        }
    }

    /// Replaces all values of `key` with `value`.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1 = vec![value],
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Appends `value` to the values of `key`.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Removes `key`, returning its values (empty when it was absent).
    pub fn remove(&mut self, key: &str) -> Vec<V> {
        match self.position(key) {
            Some(index) => self.entries.remove(index).1,
            None => Vec::new(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// `(key, first value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries
            .iter()
            .filter_map(|(key, values)| values.first().map(|value| (key.as_str(), value)))
    }

    /// `(key, all values)` pairs in insertion order.
    pub fn iter_all(&self) -> impl Iterator<Item = (&str, &[V])> + '_ {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for MultiMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for MultiMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}
