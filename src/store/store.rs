//! The record store
//!
//! # Locking
//!
//! - Purge gate: held shared by inserts and reads, exclusive by deletes, so
//!   no one observes a half-deleted chain
//! - One `RwLock` per kind: inserts hold their own kind's write lock and
//!   take short read locks on reference targets. References form a DAG, so
//!   lock acquisition cannot cycle
//! - Reverse index behind a `Mutex`, touched only after checks pass
//!
//! Readers take the gate with `read_recursive` so joins can nest reads while
//! a delete is queued.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::observability::{Event, MetricsRegistry, MetricsSnapshot};
use crate::record::{KeyValue, Record, RecordKey, RecordRef, Value};
use crate::resolver::{find_overlap, plan_delete, Dependent, ReferenceResolver, ReverseIndex};
use crate::schema::{KindSchema, Reference, ReferenceKind, SchemaRegistry};

use super::errors::{StoreError, StoreResult, ValidationDetails};
use super::filter::Filter;
use super::scan::{Scan, ScanOrder};
use super::table::{Row, Table};
use super::validator::{normalize_key, RecordValidator};

/// Behaviour switches of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Check vocabulary references on insert
    pub enforce_vocabulary: bool,
    /// Order used by `scan`
    pub default_scan_order: ScanOrder,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            enforce_vocabulary: true,
            default_scan_order: ScanOrder::Insertion,
        }
    }
}

/// What to do with dependents on delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Fail with SOIL_REFERENCED while dependents exist
    Reject,
    /// Remove dependents transitively
    Cascade,
}

/// In-memory, referentially consistent store of soil records.
pub struct RecordStore {
    registry: Arc<SchemaRegistry>,
    options: StoreOptions,
    tables: HashMap<String, RwLock<Table>>,
    reverse: Mutex<ReverseIndex>,
    gate: RwLock<()>,
    metrics: MetricsRegistry,
}

impl RecordStore {
    /// Creates an empty store with default options
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self::with_options(registry, StoreOptions::default())
    }

    pub fn with_options(registry: Arc<SchemaRegistry>, options: StoreOptions) -> Self {
        let tables = registry
            .kinds()
            .map(|kind| (kind.name.clone(), RwLock::new(Table::new(Arc::new(kind.clone())))))
            .collect();

        info!(
            event = Event::StoreReady.as_str(),
            kinds = registry.len(),
            enforce_vocabulary = options.enforce_vocabulary,
            "store ready"
        );

        Self {
            registry,
            options,
            tables,
            reverse: Mutex::new(ReverseIndex::new()),
            gate: RwLock::new(()),
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Kind names in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.registry.kinds().map(|k| k.name.as_str())
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn schema(&self, kind: &str) -> StoreResult<&KindSchema> {
        self.registry
            .get(kind)
            .ok_or_else(|| StoreError::unknown_kind(kind))
    }

    fn table(&self, kind: &str) -> StoreResult<&RwLock<Table>> {
        self.tables
            .get(kind)
            .ok_or_else(|| StoreError::unknown_kind(kind))
    }

    /// Holds the purge gate shared for a multi-read join.
    ///
    /// Reads inside the section re-enter the gate, and no delete can run
    /// until the guard drops.
    pub(crate) fn read_section(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read_recursive()
    }

    /// Runs `f` under the purge gate and the kind's read lock
    pub(crate) fn with_table<R>(&self, kind: &str, f: impl FnOnce(&Table) -> R) -> StoreResult<R> {
        let lock = self.table(kind)?;
        let _gate = self.gate.read_recursive();
        let table = lock.read();
        Ok(f(&table))
    }

    fn is_enforced(&self, reference: &Reference) -> bool {
        reference.kind != ReferenceKind::Vocabulary || self.options.enforce_vocabulary
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validates and stores a record, returning its key.
    ///
    /// Checks run in order: field types, key uniqueness, references, interval
    /// disjointness. Nothing is stored unless all pass.
    pub fn insert(&self, kind: impl AsRef<str>, record: Record) -> StoreResult<RecordKey> {
        let kind = kind.as_ref();
        let result = self.insert_checked(kind, record);
        match &result {
            Ok(key) => {
                self.metrics.record_insert();
                debug!(event = Event::RecordInserted.as_str(), kind, key = %key);
            }
            Err(err) => {
                self.metrics.record_rejection(err.code());
                debug!(
                    event = Event::RecordRejected.as_str(),
                    kind,
                    code = err.code().code(),
                    error = %err
                );
            }
        }
        result
    }

    fn insert_checked(&self, kind: &str, record: Record) -> StoreResult<RecordKey> {
        let schema = self.schema(kind)?;
        let lock = self.table(kind)?;
        let key = RecordValidator::new(&self.registry).validate(schema, &record)?;

        let _gate = self.gate.read_recursive();
        let mut table = lock.write();

        if table.contains(&key) {
            return Err(StoreError::duplicate_key(kind, key));
        }

        let mut edges = Vec::new();
        for resolved in ReferenceResolver::new(&self.registry).targets(schema, &record) {
            let exists = self.table(&resolved.target.kind)?.read().contains(&resolved.target.key);
            if exists {
                let dependent = Dependent {
                    record: RecordRef::new(kind, key.clone()),
                    via: resolved.reference.kind,
                };
                edges.push((resolved.target, dependent));
            } else if self.is_enforced(resolved.reference) {
                return Err(StoreError::dangling_reference(kind, key, resolved.target));
            }
        }

        if let Some(spec) = &schema.interval {
            if let (Some(top), Some(bot)) = (record.number(&spec.top), record.number(&spec.bot)) {
                let scope = key.prefix(spec.scope.len());
                let stored = table.prefix(&scope).map(|(k, row)| (k, row.record.as_ref()));
                if let Some(existing) = find_overlap(spec, top, bot, stored) {
                    return Err(StoreError::overlapping_interval(kind, key, existing));
                }
            }
        }

        table.insert(key.clone(), Arc::new(record));
        let mut reverse = self.reverse.lock();
        for (target, dependent) in edges {
            reverse.add(target, dependent);
        }
        Ok(key)
    }

    /// Removes a record.
    ///
    /// Under `Reject` fails with SOIL_REFERENCED while any dependent exists.
    /// Under `Cascade` removes the dependent subtree and returns every removed
    /// record, root first. Vocabulary dependents block both modes. Either all
    /// listed records are removed or none.
    pub fn delete(&self, kind: impl AsRef<str>, key: &RecordKey, mode: DeleteMode) -> StoreResult<Vec<RecordRef>> {
        let kind = kind.as_ref();
        let result = self.delete_checked(kind, key, mode);
        match &result {
            Ok(removed) => {
                self.metrics.record_delete(removed.len() as u64);
                info!(
                    event = Event::DeleteComplete.as_str(),
                    kind,
                    key = %key,
                    removed = removed.len(),
                    "delete complete"
                );
            }
            Err(err) => {
                self.metrics.record_delete_rejected();
                debug!(
                    event = Event::DeleteRejected.as_str(),
                    kind,
                    key = %key,
                    code = err.code().code(),
                    error = %err
                );
            }
        }
        result
    }

    fn delete_checked(&self, kind: &str, key: &RecordKey, mode: DeleteMode) -> StoreResult<Vec<RecordRef>> {
        let schema = self.schema(kind)?;
        let lock = self.table(kind)?;
        let key = normalize_key(schema, key.clone());

        let _gate = self.gate.write();

        if !lock.read().contains(&key) {
            return Err(StoreError::not_found(kind, key));
        }

        let root = RecordRef::new(kind, key.clone());
        let plan = plan_delete(&self.reverse.lock(), &root);

        if !plan.blocking.is_empty() {
            return Err(StoreError::referenced(kind, key, plan.blocking));
        }
        if mode == DeleteMode::Reject && plan.has_dependents() {
            return Err(StoreError::referenced(kind, key, plan.removals[1..].to_vec()));
        }

        let mut journal: Vec<(RecordRef, Row)> = Vec::with_capacity(plan.removals.len());
        for target in &plan.removals {
            let removed = match self.tables.get(&target.kind) {
                Some(lock) => lock.write().remove(&target.key),
                None => None,
            };
            match removed {
                Some(row) => journal.push((target.clone(), row)),
                None => {
                    self.rollback(journal);
                    return Err(StoreError::internal(format!(
                        "{} listed as dependent but not stored",
                        target
                    )));
                }
            }
        }

        let resolver = ReferenceResolver::new(&self.registry);
        let mut reverse = self.reverse.lock();
        for (removed, row) in &journal {
            if let Some(schema) = self.registry.get(&removed.kind) {
                for resolved in resolver.targets(schema, &row.record) {
                    let edge = Dependent {
                        record: removed.clone(),
                        via: resolved.reference.kind,
                    };
                    reverse.remove(&resolved.target, &edge);
                }
            }
        }

        Ok(plan.removals)
    }

    fn rollback(&self, journal: Vec<(RecordRef, Row)>) {
        let count = journal.len();
        for (target, row) in journal.into_iter().rev() {
            if let Some(lock) = self.tables.get(&target.kind) {
                lock.write().restore(target.key, row);
            }
        }
        warn!(
            event = Event::DeleteRolledBack.as_str(),
            restored = count,
            "partial delete rolled back"
        );
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Fetches a record by key
    pub fn get(&self, kind: impl AsRef<str>, key: &RecordKey) -> StoreResult<Arc<Record>> {
        let kind = kind.as_ref();
        let key = normalize_key(self.schema(kind)?, key.clone());
        self.with_table(kind, |table| table.get(&key).cloned())?
            .ok_or_else(|| StoreError::not_found(kind, key))
    }

    pub fn contains(&self, kind: impl AsRef<str>, key: &RecordKey) -> StoreResult<bool> {
        let kind = kind.as_ref();
        let key = normalize_key(self.schema(kind)?, key.clone());
        self.with_table(kind, |table| table.contains(&key))
    }

    /// Lazy scan in the store's default order
    pub fn scan(&self, kind: impl AsRef<str>, filter: Filter) -> StoreResult<Scan<'_>> {
        self.scan_ordered(kind, filter, self.options.default_scan_order)
    }

    pub fn scan_ordered(&self, kind: impl AsRef<str>, filter: Filter, order: ScanOrder) -> StoreResult<Scan<'_>> {
        let kind = kind.as_ref();
        self.table(kind)?;
        Ok(Scan::new(self, kind.to_string(), filter, order))
    }

    /// Records whose key extends `prefix`, in key order
    pub fn prefix(&self, kind: impl AsRef<str>, prefix: &RecordKey) -> StoreResult<Vec<(RecordKey, Arc<Record>)>> {
        let kind = kind.as_ref();
        let prefix = normalize_key(self.schema(kind)?, prefix.clone());
        self.with_table(kind, |table| {
            table
                .prefix(&prefix)
                .map(|(key, row)| (key.clone(), Arc::clone(&row.record)))
                .collect()
        })
    }

    /// Secondary-index lookup on an indexed field, in key order
    pub fn lookup(
        &self,
        kind: impl AsRef<str>,
        field: &str,
        value: impl Into<Value>,
    ) -> StoreResult<Vec<(RecordKey, Arc<Record>)>> {
        let kind = kind.as_ref();
        let value = value.into();
        let schema = self.schema(kind)?;

        let def = schema
            .indexed_fields()
            .find(|f| f.name == field)
            .ok_or_else(|| {
                StoreError::type_mismatch(kind, ValidationDetails::new(field, "indexed field", "not indexed"))
            })?;
        let probe = KeyValue::for_field(&value, &def.field_type).ok_or_else(|| {
            StoreError::type_mismatch(
                kind,
                ValidationDetails::new(field, def.field_type.type_name(), value.type_name()),
            )
        })?;

        self.with_table(kind, |table| {
            table
                .lookup(field, &probe)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|key| table.get(&key).map(|r| (key, Arc::clone(r))))
                .collect()
        })
    }

    /// Records referencing the given record
    pub fn dependents(&self, kind: impl AsRef<str>, key: &RecordKey) -> StoreResult<Vec<Dependent>> {
        let kind = kind.as_ref();
        let key = normalize_key(self.schema(kind)?, key.clone());
        let _gate = self.gate.read_recursive();
        Ok(self.reverse.lock().dependents(&RecordRef::new(kind, key)))
    }

    /// Number of records of a kind
    pub fn len(&self, kind: impl AsRef<str>) -> StoreResult<usize> {
        self.with_table(kind.as_ref(), Table::len)
    }

    /// Number of records across all kinds
    pub fn total_len(&self) -> usize {
        let _gate = self.gate.read_recursive();
        self.tables.values().map(|t| t.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("kinds", &self.tables.len())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, RecordKind};
    use crate::store::StoreErrorCode;

    fn profile_store() -> RecordStore {
        let store = RecordStore::new(Arc::new(catalog::registry().unwrap()));
        let country = Record::new().with("iso", "KE").with("country", "Kenya");
        store.insert(RecordKind::Country, country).unwrap();
        store
            .insert(RecordKind::SiteDescription, Record::new().with("iso", "KE").with("id", 1))
            .unwrap();
        let horizon = Record::new()
            .with("iso", "KE")
            .with("id", 1)
            .with("hori", 1)
            .with("top", 0)
            .with("bot", 20);
        store.insert(RecordKind::MorphologyI, horizon).unwrap();
        store
    }

    #[test]
    fn test_failed_cascade_restores_journal() {
        let store = profile_store();
        let site = RecordKey::profile("KE", 1);
        let horizon = RecordKey::horizon("KE", 1, 1);

        // Edge to a row that was never stored
        store.reverse.lock().add(
            RecordRef::new(RecordKind::MorphologyI.name(), horizon.clone()),
            Dependent {
                record: RecordRef::new(
                    RecordKind::ChemicalProperties.name(),
                    horizon.clone().push(0).push(10),
                ),
                via: ReferenceKind::Owner,
            },
        );

        let err = store
            .delete(RecordKind::SiteDescription, &site, DeleteMode::Cascade)
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::SoilInternal);

        assert!(store.contains(RecordKind::SiteDescription, &site).unwrap());
        assert!(store.contains(RecordKind::MorphologyI, &horizon).unwrap());
        assert_eq!(store.total_len(), 3);
        assert_eq!(
            store.dependents(RecordKind::SiteDescription, &site).unwrap().len(),
            1
        );

        let scanned: Vec<_> = store
            .scan(RecordKind::MorphologyI, Filter::all())
            .unwrap()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(scanned, vec![horizon]);
    }

    #[test]
    fn test_delete_waits_for_read_section() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;
        use std::time::Duration;

        let store = profile_store();
        let deleted = AtomicBool::new(false);

        thread::scope(|s| {
            let section = store.read_section();
            let handle = s.spawn(|| {
                store
                    .delete(RecordKind::SiteDescription, &RecordKey::profile("KE", 1), DeleteMode::Cascade)
                    .unwrap();
                deleted.store(true, Ordering::SeqCst);
            });

            thread::sleep(Duration::from_millis(50));
            assert!(!deleted.load(Ordering::SeqCst));
            assert_eq!(store.len(RecordKind::MorphologyI).unwrap(), 1);

            drop(section);
            handle.join().unwrap();
        });

        assert!(deleted.load(Ordering::SeqCst));
        assert_eq!(store.len(RecordKind::MorphologyI).unwrap(), 0);
    }

    #[test]
    fn test_read_section_nests_reads() {
        let store = profile_store();
        let _section = store.read_section();
        assert_eq!(store.len(RecordKind::MorphologyI).unwrap(), 1);
        assert!(store.get(RecordKind::SiteDescription, &RecordKey::profile("KE", 1)).is_ok());
    }
}
