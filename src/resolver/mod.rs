//! Reference resolution
//!
//! Turns declared references into target keys, tracks who references whom,
//! and plans deletes over the dependent subtree.
//!
//! # Design Principles
//!
//! - A reference is checked only when all its local fields are present
//! - References form a DAG (targets are registered before dependents)
//! - Vocabulary references never cascade

mod interval;
mod reverse;

pub use interval::{find_overlap, overlaps};
pub use reverse::{Dependent, ReverseIndex};

use std::collections::{HashSet, VecDeque};

use crate::record::{KeyValue, Record, RecordKey, RecordRef};
use crate::schema::{KindSchema, RefColumn, Reference, SchemaRegistry};

/// A declared reference resolved to the target record's address
#[derive(Debug, Clone)]
pub struct ResolvedReference<'s> {
    pub reference: &'s Reference,
    pub target: RecordRef,
}

/// Builds target keys for the references of a record
pub struct ReferenceResolver<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Target addresses of every reference whose local fields are present.
    ///
    /// Field values are typed to the target key, so an int code addresses a
    /// float vocabulary key.
    pub fn targets<'s>(&self, schema: &'s KindSchema, record: &Record) -> Vec<ResolvedReference<'s>> {
        schema
            .references
            .iter()
            .filter_map(|reference| {
                let key = self.target_key(reference, record)?;
                Some(ResolvedReference {
                    reference,
                    target: RecordRef::new(reference.target.clone(), key),
                })
            })
            .collect()
    }

    fn target_key(&self, reference: &Reference, record: &Record) -> Option<RecordKey> {
        let target = self.registry.get(&reference.target)?;
        reference
            .columns
            .iter()
            .zip(target.key_fields())
            .map(|(column, key_field)| match column {
                RefColumn::Const(text) => Some(KeyValue::Text(text.clone())),
                RefColumn::Field(name) => KeyValue::for_field(record.get(name)?, &key_field.field_type),
            })
            .collect::<Option<Vec<_>>>()
            .map(RecordKey::new)
    }
}

/// Records a delete would remove, and the dependents that forbid it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletePlan {
    /// Root first, then dependents breadth-first
    pub removals: Vec<RecordRef>,
    /// Dependents reached through a vocabulary reference
    pub blocking: Vec<RecordRef>,
}

impl DeletePlan {
    /// Whether anything besides the root would be removed
    pub fn has_dependents(&self) -> bool {
        self.removals.len() > 1 || !self.blocking.is_empty()
    }
}

/// Walks the dependent subtree of `root`.
pub fn plan_delete(reverse: &ReverseIndex, root: &RecordRef) -> DeletePlan {
    let mut plan = DeletePlan::default();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();

    seen.insert(root.clone());
    queue.push_back(root.clone());

    while let Some(current) = queue.pop_front() {
        for dependent in reverse.dependents(&current) {
            if !dependent.via.cascades() {
                if !plan.blocking.contains(&dependent.record) {
                    plan.blocking.push(dependent.record);
                }
                continue;
            }
            if seen.insert(dependent.record.clone()) {
                queue.push_back(dependent.record);
            }
        }
        plan.removals.push(current);
    }

    plan
}
