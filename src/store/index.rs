//! Secondary field indexes
//!
//! Each indexed field maps its key value to the set of record keys holding
//! it. Sets are ordered, so lookups return keys in key order.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::{KeyValue, RecordKey};

/// A single field index using BTreeMap for deterministic ordering.
#[derive(Debug, Default)]
pub struct FieldIndex {
    tree: BTreeMap<KeyValue, BTreeSet<RecordKey>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: KeyValue, key: RecordKey) {
        self.tree.entry(value).or_default().insert(key);
    }

    /// Remove a record key for a value.
    ///
    /// If the value has no more keys, removes the value entirely.
    pub fn remove(&mut self, value: &KeyValue, key: &RecordKey) {
        if let Some(keys) = self.tree.get_mut(value) {
            keys.remove(key);
            if keys.is_empty() {
                self.tree.remove(value);
            }
        }
    }

    /// Record keys holding exactly `value`, in key order
    pub fn lookup_eq(&self, value: &KeyValue) -> Vec<RecordKey> {
        self.tree
            .get(value)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the number of distinct values
    pub fn value_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns the total number of indexed records
    pub fn key_count(&self) -> usize {
        self.tree.values().map(BTreeSet::len).sum()
    }
}
