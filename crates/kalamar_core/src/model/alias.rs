//! Alias tables and the aliased property view.
//!
//! # Responsibility
//! - Translate alias names to canonical property keys.
//! - Wrap a property map so reads and writes can use either name.
//!
//! # Invariants
//! - The underlying map only ever stores canonical keys.
//! - `keys()` reports canonical keys; aliases are not enumerable.

use crate::model::multimap::MultiMap;
use crate::model::value::PropertyValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from alias name to canonical key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, key: impl Into<String>) {
        self.aliases.insert(alias.into(), key.into());
    }

    /// Returns the canonical key for `key`, or `key` itself when it is not an alias.
    pub fn resolve<'a>(&'a self, key: &'a str) -> &'a str {
        self.aliases.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn is_alias(&self, key: &str) -> bool {
        self.aliases.contains_key(key)
    }

    /// `(alias, canonical key)` pairs, sorted by alias.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.aliases
            .iter()
            .map(|(alias, key)| (alias.as_str(), key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl<A: Into<String>, K: Into<String>> FromIterator<(A, K)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (A, K)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (alias, key) in iter {
            table.insert(alias, key);
        }
        table
    }
}

/// Property map addressed through an alias table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasedMultiMap {
    inner: MultiMap<PropertyValue>,
    aliases: AliasTable,
}

impl AliasedMultiMap {
    pub fn new(inner: MultiMap<PropertyValue>, aliases: AliasTable) -> Self {
        Self { inner, aliases }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.inner.get(self.aliases.resolve(key))
    }

    pub fn get_all(&self, key: &str) -> &[PropertyValue] {
        self.inner.get_all(self.aliases.resolve(key))
    }

    /// Replaces all values stored under the canonical name of `key`.
    pub fn set(&mut self, key: &str, value: PropertyValue) {
        let canonical = self.aliases.resolve(key).to_string();
        self.inner.set(canonical, value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(self.aliases.resolve(key))
    }

    /// Canonical keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.keys()
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// The canonical, alias-free map.
    pub fn raw(&self) -> &MultiMap<PropertyValue> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::{AliasTable, AliasedMultiMap};
    use crate::model::multimap::MultiMap;
    use crate::model::value::PropertyValue;

    fn aliased() -> AliasedMultiMap {
        let inner: MultiMap<PropertyValue> = [("artist_name", PropertyValue::from("muse"))]
            .into_iter()
            .collect();
        let aliases: AliasTable = [("artist", "artist_name")].into_iter().collect();
        AliasedMultiMap::new(inner, aliases)
    }

    #[test]
    fn reads_through_alias_and_canonical_name() {
        let map = aliased();
        assert_eq!(map.get("artist"), Some(&PropertyValue::from("muse")));
        assert_eq!(map.get("artist_name"), Some(&PropertyValue::from("muse")));
        assert!(map.contains_key("artist"));
    }

    #[test]
    fn writes_through_alias_land_on_canonical_key() {
        let mut map = aliased();
        map.set("artist", PropertyValue::from("radiohead"));

        assert_eq!(
            map.raw().get("artist_name"),
            Some(&PropertyValue::from("radiohead"))
        );
        assert!(!map.raw().contains_key("artist"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["artist_name"]);
    }

    #[test]
    fn resolve_returns_key_when_not_aliased() {
        let table: AliasTable = [("a", "b")].into_iter().collect();
        assert_eq!(table.resolve("a"), "b");
        assert_eq!(table.resolve("c"), "c");
        assert!(table.is_alias("a"));
        assert!(!table.is_alias("b"));
    }
}
