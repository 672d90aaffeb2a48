//! Store metrics
//!
//! - Counters only, except the live record gauge
//! - Reset only on process start
//! - Thread-safe but lock-free

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::store::StoreErrorCode;

/// Operational counters of one store.
///
/// Uses Relaxed ordering; values are exact once writers are quiescent.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    inserts: AtomicU64,
    duplicate_keys: AtomicU64,
    type_mismatches: AtomicU64,
    dangling_references: AtomicU64,
    overlapping_intervals: AtomicU64,
    other_rejections: AtomicU64,
    deletes: AtomicU64,
    deletes_rejected: AtomicU64,
    cascaded_records: AtomicU64,
    live_records: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful insert
    pub fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.live_records.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected insert under its error code
    pub fn record_rejection(&self, code: StoreErrorCode) {
        let counter = match code {
            StoreErrorCode::SoilDuplicateKey => &self.duplicate_keys,
            StoreErrorCode::SoilTypeMismatch => &self.type_mismatches,
            StoreErrorCode::SoilDanglingReference => &self.dangling_references,
            StoreErrorCode::SoilOverlappingInterval => &self.overlapping_intervals,
            _ => &self.other_rejections,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed delete that removed `removed` records in total
    pub fn record_delete(&self, removed: u64) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
        self.cascaded_records
            .fetch_add(removed.saturating_sub(1), Ordering::Relaxed);
        self.live_records.fetch_sub(removed, Ordering::Relaxed);
    }

    pub fn record_delete_rejected(&self) {
        self.deletes_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn live_records(&self) -> u64 {
        self.live_records.load(Ordering::Relaxed)
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            duplicate_keys: self.duplicate_keys.load(Ordering::Relaxed),
            type_mismatches: self.type_mismatches.load(Ordering::Relaxed),
            dangling_references: self.dangling_references.load(Ordering::Relaxed),
            overlapping_intervals: self.overlapping_intervals.load(Ordering::Relaxed),
            other_rejections: self.other_rejections.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            deletes_rejected: self.deletes_rejected.load(Ordering::Relaxed),
            cascaded_records: self.cascaded_records.load(Ordering::Relaxed),
            live_records: self.live_records.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub duplicate_keys: u64,
    pub type_mismatches: u64,
    pub dangling_references: u64,
    pub overlapping_intervals: u64,
    pub other_rejections: u64,
    pub deletes: u64,
    pub deletes_rejected: u64,
    /// Dependents removed by cascade, roots excluded
    pub cascaded_records: u64,
    pub live_records: u64,
}

impl MetricsSnapshot {
    /// Total rejected inserts across all codes
    pub fn rejections(&self) -> u64 {
        self.duplicate_keys
            + self.type_mismatches
            + self.dangling_references
            + self.overlapping_intervals
            + self.other_rejections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_zero_values() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.inserts, 0);
        assert_eq!(snapshot.rejections(), 0);
        assert_eq!(snapshot.live_records, 0);
    }

    #[test]
    fn test_rejections_by_code() {
        let registry = MetricsRegistry::new();
        registry.record_rejection(StoreErrorCode::SoilDuplicateKey);
        registry.record_rejection(StoreErrorCode::SoilOverlappingInterval);
        registry.record_rejection(StoreErrorCode::SoilUnknownKind);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.duplicate_keys, 1);
        assert_eq!(snapshot.overlapping_intervals, 1);
        assert_eq!(snapshot.other_rejections, 1);
        assert_eq!(snapshot.rejections(), 3);
    }

    #[test]
    fn test_cascade_accounting() {
        let registry = MetricsRegistry::new();
        for _ in 0..4 {
            registry.record_insert();
        }
        registry.record_delete(3);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.deletes, 1);
        assert_eq!(snapshot.cascaded_records, 2);
        assert_eq!(snapshot.live_records, 1);
    }

    #[test]
    fn test_thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(MetricsRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let reg = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    reg.record_insert();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.snapshot().inserts, 1000);
        assert_eq!(registry.live_records(), 1000);
    }
}
