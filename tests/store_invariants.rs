//! Store Invariant Tests
//!
//! - A stored record reads back unchanged under its key
//! - Keys are unique per kind
//! - Records are type-checked against their kind before anything is stored
//! - Depth intervals within one horizon are pairwise disjoint
//! - Scans are restartable and follow insertion or key order

mod common;

use soildb::store::{Filter, ScanOrder};
use soildb::{Record, RecordKey, RecordKind, StoreErrorCode, StoreOptions};

use common::*;

// =============================================================================
// Round trip and uniqueness
// =============================================================================

#[test]
fn test_insert_then_get_round_trips() {
    let store = store();
    let key = store.insert(RecordKind::Country, country("KE")).unwrap();

    assert_eq!(key, RecordKey::text("KE"));
    assert_eq!(*store.get(RecordKind::Country, &key).unwrap(), country("KE"));
}

#[test]
fn test_duplicate_key_rejected() {
    let store = store();
    store.insert(RecordKind::Country, country("KE")).unwrap();

    let err = store
        .insert(RecordKind::Country, Record::new().with("iso", "KE").with("country", "Other"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilDuplicateKey);
    assert_eq!(store.len(RecordKind::Country).unwrap(), 1);
    assert_eq!(store.get(RecordKind::Country, &RecordKey::text("KE")).unwrap().text("country"), Some("Kenya"));
}

#[test]
fn test_signed_zero_key_is_duplicate() {
    let store = store();
    let colour = |value: f64| {
        Record::new()
            .with("hue", "10YR")
            .with("value", value)
            .with("chroma", 0.0)
    };
    store.insert(RecordKind::SoilColour, colour(0.0)).unwrap();

    let err = store.insert(RecordKind::SoilColour, colour(-0.0)).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilDuplicateKey);
    assert_eq!(store.len(RecordKind::SoilColour).unwrap(), 1);
    assert!(store
        .contains(RecordKind::SoilColour, &RecordKey::text("10YR").push(-0.0).push(0.0))
        .unwrap());
}

#[test]
fn test_unknown_kind() {
    let store = store();
    let err = store.insert("Horizon_X", Record::new()).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilUnknownKind);
    assert!(store.is_empty());
}

// =============================================================================
// Type checks
// =============================================================================

#[test]
fn test_wrong_type_names_the_field() {
    let store = store();
    store.insert(RecordKind::Country, country("KE")).unwrap();

    let err = store
        .insert(RecordKind::SiteDescription, site("KE", 1).with("depth", "deep"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
    assert_eq!(err.details().unwrap().field, "depth");
    assert_eq!(store.len(RecordKind::SiteDescription).unwrap(), 0);
}

#[test]
fn test_missing_key_field_rejected() {
    let store = store();
    let err = store
        .insert(RecordKind::Country, Record::new().with("country", "Kenya"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
    assert_eq!(err.details().unwrap().field, "iso");
}

#[test]
fn test_undeclared_field_rejected() {
    let store = store();
    let err = store
        .insert(RecordKind::Country, country("KE").with("capital", "Nairobi"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
    assert_eq!(err.details().unwrap().field, "capital");
}

#[test]
fn test_out_of_range_ph_rejected() {
    let store = seeded_store();
    let err = store
        .insert(
            RecordKind::ChemicalProperties,
            chemical("KE", 1, 2, 20, 30, "S-3").with("phh2o", 15.0),
        )
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
    assert_eq!(err.details().unwrap().field, "phh2o");
}

#[test]
fn test_spectrum_off_grid_rejected() {
    let store = store();
    store
        .insert(RecordKind::IcrafSampleCodes, sample_code(BATCH_LABID, SAMPLENO, "KE 1"))
        .unwrap();

    let short = Record::new()
        .with("batch_labid", BATCH_LABID)
        .with("reflectance", soildb::spectral::Spectrum::asd(vec![0.25; 10]));
    let err = store.insert(RecordKind::AsdSpectra, short).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
}

// =============================================================================
// Depth intervals
// =============================================================================

#[test]
fn test_overlapping_interval_rejected() {
    let store = seeded_store();
    store
        .insert(RecordKind::PhysicalProperties, chemical_like("KE", 1, 2, 20, 30))
        .unwrap();

    let err = store
        .insert(RecordKind::PhysicalProperties, chemical_like("KE", 1, 2, 25, 40))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilOverlappingInterval);
    assert_eq!(err.related()[0].kind, "Physical_properties");
}

#[test]
fn test_adjacent_intervals_accepted() {
    let store = seeded_store();

    // Stored 0-10 and 10-20 on horizon 1; 15-25 overlaps, 20-30 abuts
    let err = store
        .insert(RecordKind::ChemicalProperties, chemical("KE", 1, 1, 15, 25, "S-9"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilOverlappingInterval);

    store
        .insert(RecordKind::ChemicalProperties, chemical("KE", 1, 1, 20, 30, "S-9"))
        .unwrap();
    assert_eq!(store.len(RecordKind::ChemicalProperties).unwrap(), 3);
}

#[test]
fn test_intervals_scoped_to_horizon() {
    let store = seeded_store();
    store
        .insert(RecordKind::ChemicalProperties, chemical("KE", 1, 2, 0, 10, "S-5"))
        .unwrap();
}

#[test]
fn test_inverted_interval_rejected() {
    let store = seeded_store();
    let err = store
        .insert(RecordKind::ChemicalProperties, chemical("KE", 1, 2, 40, 30, "S-6"))
        .unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
}

fn chemical_like(iso: &str, id: i64, hori: i64, btop: i64, bbot: i64) -> Record {
    Record::new()
        .with("iso", iso)
        .with("id", id)
        .with("hori", hori)
        .with("btop", btop)
        .with("bbot", bbot)
        .with("clay", 35.0)
}

// =============================================================================
// Scans
// =============================================================================

#[test]
fn test_scan_insertion_order_and_restart() {
    let store = seeded_store();
    let mut scan = store.scan(RecordKind::MorphologyI, Filter::all()).unwrap();
    assert_eq!(scan.order(), ScanOrder::Insertion);

    let first: Vec<_> = scan.by_ref().map(|(_, r)| r.int("hori").unwrap()).collect();
    assert_eq!(first, vec![2, 1]);
    assert!(scan.next().is_none());

    scan.restart();
    let again: Vec<_> = scan.map(|(_, r)| r.int("hori").unwrap()).collect();
    assert_eq!(again, first);
}

#[test]
fn test_scan_key_order() {
    let store = store_with(StoreOptions {
        default_scan_order: ScanOrder::Key,
        ..StoreOptions::default()
    });
    seed(&store);

    let keys: Vec<_> = store
        .scan(RecordKind::MorphologyI, Filter::all())
        .unwrap()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(keys, vec![RecordKey::horizon("KE", 1, 1), RecordKey::horizon("KE", 1, 2)]);
}

#[test]
fn test_scan_filter() {
    let store = seeded_store();
    let deep: Vec<_> = store
        .scan(RecordKind::ChemicalProperties, Filter::all().gte("btop", 10))
        .unwrap()
        .map(|(_, r)| r.text("sampleno").unwrap().to_string())
        .collect();
    assert_eq!(deep, vec!["S-2".to_string()]);

    let none = store
        .scan(RecordKind::ChemicalProperties, Filter::all().eq("sampleno", "S-404"))
        .unwrap();
    assert_eq!(none.count(), 0);
}

#[test]
fn test_scan_sees_later_inserts() {
    let store = seeded_store();
    let mut scan = store.scan(RecordKind::MorphologyI, Filter::all()).unwrap();
    assert!(scan.next().is_some());

    store.insert(RecordKind::MorphologyI, horizon("KE", 1, 3, 50, 80)).unwrap();
    assert_eq!(scan.count(), 2);
}

#[test]
fn test_lookup_by_sample_number() {
    let store = seeded_store();
    let rows = store.lookup(RecordKind::ChemicalProperties, "sampleno", SAMPLENO).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1.int("btop"), Some(0));

    let err = store.lookup(RecordKind::ChemicalProperties, "phh2o", 6.2).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilTypeMismatch);
}

#[test]
fn test_metrics_follow_outcomes() {
    let store = seeded_store();
    let before = store.metrics();
    let _ = store.insert(RecordKind::Country, country("KE"));

    let after = store.metrics();
    assert_eq!(after.duplicate_keys, before.duplicate_keys + 1);
    assert_eq!(after.live_records, store.total_len() as u64);
}
