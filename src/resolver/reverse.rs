//! Reverse reference index
//!
//! Maps each referenced record to the records referencing it, so a delete
//! walks only the dependent subtree.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::record::RecordRef;
use crate::schema::ReferenceKind;

/// A record referencing another, and how
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dependent {
    pub record: RecordRef,
    pub via: ReferenceKind,
}

#[derive(Debug, Default)]
pub struct ReverseIndex {
    by_target: HashMap<RecordRef, BTreeSet<Dependent>>,
}

impl ReverseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: RecordRef, dependent: Dependent) {
        self.by_target.entry(target).or_default().insert(dependent);
    }

    /// Drops one edge; drops the target entry once it has no dependents
    pub fn remove(&mut self, target: &RecordRef, dependent: &Dependent) {
        if let Some(set) = self.by_target.get_mut(target) {
            set.remove(dependent);
            if set.is_empty() {
                self.by_target.remove(target);
            }
        }
    }

    /// Dependents of a record, ordered by kind then key
    pub fn dependents(&self, target: &RecordRef) -> Vec<Dependent> {
        self.by_target
            .get(target)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn has_dependents(&self, target: &RecordRef) -> bool {
        self.by_target.contains_key(target)
    }

    /// Number of referenced records
    pub fn len(&self) -> usize {
        self.by_target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_target.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKey;

    fn site(id: i64) -> RecordRef {
        RecordRef::new("Site_description", RecordKey::profile("KE", id))
    }

    fn horizon(id: i64, hori: i64) -> Dependent {
        Dependent {
            record: RecordRef::new("Morphology_I", RecordKey::horizon("KE", id, hori)),
            via: ReferenceKind::Owner,
        }
    }

    #[test]
    fn test_dependents_ordered() {
        let mut index = ReverseIndex::new();
        index.add(site(1), horizon(1, 2));
        index.add(site(1), horizon(1, 1));

        let deps = index.dependents(&site(1));
        assert_eq!(deps, vec![horizon(1, 1), horizon(1, 2)]);
        assert!(index.dependents(&site(2)).is_empty());
    }

    #[test]
    fn test_remove_last_edge_drops_target() {
        let mut index = ReverseIndex::new();
        index.add(site(1), horizon(1, 1));
        index.remove(&site(1), &horizon(1, 1));
        assert!(!index.has_dependents(&site(1)));
        assert!(index.is_empty());
    }
}
