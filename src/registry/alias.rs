//! Alias table built from the global config file.
//!
//! An alias replaces a whole value, never a substring, and is applied once:
//! an alias whose value is itself an alias key is not followed.

use dashmap::DashMap;
use serde_json::{Map, Value};

use super::bundle::AttrRecord;

/// Concurrent alias-key → literal value table.
#[derive(Debug, Default)]
pub struct AliasTable {
    entries: DashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an `aliases` object. Later values win for the same key.
    ///
    /// Only non-blank scalar values are taken. Returns the number of keys merged.
    pub fn merge(&self, aliases: &Map<String, Value>) -> usize {
        let record = AttrRecord::from_json(aliases);
        for (key, value) in record.iter() {
            self.entries.insert(key.to_string(), value.to_string());
        }
        record.len()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Substitute `value` if it is an alias key, otherwise return it unchanged.
    pub fn resolve(&self, value: &str) -> String {
        self.entries
            .get(value)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| value.to_string())
    }

    /// Substitute every value of a record.
    pub fn apply(&self, record: &AttrRecord) -> AttrRecord {
        record.map_values(|value| self.resolve(value))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
