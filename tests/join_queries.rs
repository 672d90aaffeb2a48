//! Join Query Tests
//!
//! - Joins fail with SOIL_NOT_FOUND only when their root is missing
//! - Child rows come back in key order regardless of insertion order
//! - Spectra are reached through the sample code correlation

mod common;

use soildb::{MeasurementKind, Record, RecordKey, RecordKind, SoilQuery, StoreErrorCode};

use common::*;

// =============================================================================
// Profile joins
// =============================================================================

#[test]
fn test_horizons_ordered_by_number() {
    let store = seeded_store();
    let horizons = SoilQuery::new(&store).horizons_of("KE", 1).unwrap();

    let numbers: Vec<_> = horizons.iter().map(|h| h.int("hori").unwrap()).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn test_missing_profile_is_not_found() {
    let store = seeded_store();
    let err = SoilQuery::new(&store).horizons_of("KE", 99).unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilNotFound);
}

#[test]
fn test_profile_without_horizons_is_empty() {
    let store = seeded_store();
    store.insert(RecordKind::SiteDescription, site("KE", 2)).unwrap();

    let query = SoilQuery::new(&store);
    assert!(query.horizons_of("KE", 2).unwrap().is_empty());
    assert!(query.trace_elements_of("KE", 2).unwrap().is_empty());
    assert!(query.stations_near("KE", 2).unwrap().is_empty());
}

#[test]
fn test_measurements_ordered_by_depth() {
    let store = seeded_store();
    let query = SoilQuery::new(&store);

    let rows = query
        .measurements_of("KE", 1, 1, MeasurementKind::Chemical)
        .unwrap();
    let tops: Vec<_> = rows.iter().map(|r| r.int("btop").unwrap()).collect();
    assert_eq!(tops, vec![0, 10]);

    assert!(query
        .measurements_of("KE", 1, 2, MeasurementKind::Chemical)
        .unwrap()
        .is_empty());
    assert_eq!(
        query
            .measurements_of("KE", 1, 9, MeasurementKind::Physical)
            .unwrap_err()
            .code(),
        StoreErrorCode::SoilNotFound
    );
}

#[test]
fn test_trace_elements_ordered_by_depth() {
    let store = seeded_store();
    for (top, bott) in [(30, 60), (0, 30)] {
        let row = Record::new()
            .with("iso", "KE")
            .with("id", 1)
            .with("top", top)
            .with("bott", bott)
            .with("zn", 42);
        store.insert(RecordKind::TraceElements, row).unwrap();
    }

    let rows = SoilQuery::new(&store).trace_elements_of("KE", 1).unwrap();
    let tops: Vec<_> = rows.iter().map(|r| r.int("top").unwrap()).collect();
    assert_eq!(tops, vec![0, 30]);
}

#[test]
fn test_stations_by_distance() {
    let store = seeded_store();
    let stations = SoilQuery::new(&store).stations_near("KE", 1).unwrap();

    let ids: Vec<_> = stations.iter().map(|s| s.station.int("id").unwrap()).collect();
    assert_eq!(ids, vec![101, 100, 102]);
    assert_eq!(stations[0].dist, Some(5));
    assert_eq!(stations[0].station.text("statname"), Some("Kabete"));
    assert_eq!(stations[2].dist, None);
}

#[test]
fn test_profile_graph() {
    let store = seeded_store();
    let graph = SoilQuery::new(&store).profile_graph("KE", 1).unwrap();

    assert_eq!(graph.site.int("id"), Some(1));
    assert!(graph.classification.is_none());
    assert!(graph.diagnostics.is_empty());
    assert_eq!(graph.horizons.len(), 2);
    assert_eq!(graph.horizons[0].measurements(MeasurementKind::Chemical).len(), 2);
    assert!(graph.horizons[1].measurements(MeasurementKind::Chemical).is_empty());
    assert_eq!(graph.stations.len(), 3);
    // Site, 2 horizons, 2 chemical rows, 3 stations
    assert_eq!(graph.record_count(), 8);
}

// =============================================================================
// Samples and spectra
// =============================================================================

#[test]
fn test_spectrum_for_sample() {
    let store = seeded_store();
    let scan = SoilQuery::new(&store).spectrum_for(SAMPLENO).unwrap();

    assert_eq!(scan.batch_labid, BATCH_LABID);
    assert_eq!(scan.sampleno, SAMPLENO);
    assert_eq!(scan.wavelength_range(), 350..=2500);
    assert_eq!(scan.reflectance().len(), 216);
}

#[test]
fn test_spectrum_for_unscanned_sample() {
    let store = seeded_store();
    store
        .insert(RecordKind::IcrafSampleCodes, sample_code("FS15R_FS4069", "S-2", "KE 1"))
        .unwrap();

    let query = SoilQuery::new(&store);
    assert_eq!(query.spectrum_for("S-2").unwrap_err().code(), StoreErrorCode::SoilNotFound);
    assert_eq!(query.spectrum_for("S-404").unwrap_err().code(), StoreErrorCode::SoilNotFound);
}

#[test]
fn test_spectral_library_places_scans() {
    let store = seeded_store();

    // Plot code naming no stored profile is left out
    store
        .insert(RecordKind::IcrafSampleCodes, sample_code("FS15R_FS5000", "S-50", "KE 50"))
        .unwrap();
    store.insert(RecordKind::AsdSpectra, scan("FS15R_FS5000")).unwrap();

    let library = SoilQuery::new(&store).spectral_library().unwrap();
    assert_eq!(library.len(), 1);

    let entry = &library[0];
    assert_eq!(entry.name, BATCH_LABID);
    assert!((entry.latitude + 0.5).abs() < 1e-9);
    assert!((entry.longitude - 37.0).abs() < 1e-9);
    assert_eq!(entry.spectrum.len(), 216);
}

#[test]
fn test_sample_view() {
    let store = seeded_store();
    let mineral_code = Record::new().with("attribute", "mineral").with("value", "quartz");
    store.insert(RecordKind::Key, mineral_code).unwrap();
    let mineral = Record::new()
        .with("sampleno", SAMPLENO)
        .with("mineral", "quartz")
        .with("value", 40);
    store.insert(RecordKind::SandMineralogyMinerals, mineral).unwrap();

    let view = SoilQuery::new(&store).sample_view(SAMPLENO).unwrap();
    assert_eq!(view.measurements.len(), 1);
    assert_eq!(view.measurements[0].0, RecordKind::ChemicalProperties);
    assert_eq!(view.sample_codes.len(), 1);
    assert_eq!(view.minerals.len(), 1);
    assert!(view.spectrum.is_some());

    let err = SoilQuery::new(&store).sample_view("S-404").unwrap_err();
    assert_eq!(err.code(), StoreErrorCode::SoilNotFound);
}

#[test]
fn test_joins_see_cascade() {
    let store = seeded_store();
    store
        .delete(
            RecordKind::MorphologyI,
            &RecordKey::horizon("KE", 1, 1),
            soildb::DeleteMode::Cascade,
        )
        .unwrap();

    let query = SoilQuery::new(&store);
    assert_eq!(query.horizons_of("KE", 1).unwrap().len(), 1);
    assert!(query.sample_view(SAMPLENO).unwrap().measurements.is_empty());
}
