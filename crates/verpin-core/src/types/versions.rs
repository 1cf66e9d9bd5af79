//! Version table type.
//!
//! A `VersionTable` maps package names to pinned version strings. Names are
//! case-sensitive and versions are opaque; nothing here parses them.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

use super::DevelopDirective;

/// Mapping of package name to pinned version
///
/// Backed by a sorted map so iteration, logging and serialization are
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTable {
    pins: BTreeMap<String, String>,
}

impl VersionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `name` to `version`, returning the previous pin if any
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) -> Option<String> {
        self.pins.insert(name.into(), version.into())
    }

    /// Look up the pin for a package
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pins.get(name).map(String::as_str)
    }

    /// Drop the pin for a package, returning it if present
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.pins.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pins.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Iterate pins in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pins.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every pin of `other` into this table; `other` wins on conflicts
    pub fn overlay(&mut self, other: &VersionTable) {
        for (name, version) in other.iter() {
            self.insert(name, version);
        }
    }

    /// Apply a develop directive: unpin when it carries no version,
    /// force-pin otherwise
    pub fn apply_directive(&mut self, directive: &DevelopDirective) {
        match &directive.version {
            None => {
                self.remove(&directive.name);
            }
            Some(version) => {
                self.insert(directive.name.clone(), version.clone());
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for VersionTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = VersionTable::new();
        table.extend(iter);
        table
    }
}

impl<K, V> Extend<(K, V)> for VersionTable
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, version) in iter {
            self.insert(name, version);
        }
    }
}

impl IntoIterator for VersionTable {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.pins.into_iter()
    }
}

impl From<BTreeMap<String, String>> for VersionTable {
    fn from(pins: BTreeMap<String, String>) -> Self {
        Self { pins }
    }
}
