//! Shared fixtures for integration tests
//!
//! `seeded_store` holds one Kenyan profile (KE/1) with two horizons, depth
//! measurements on horizon 1, a sample code with its scan, and three linked
//! climate stations.

#![allow(dead_code)]

use std::sync::Arc;

use soildb::catalog;
use soildb::spectral::{Spectrum, ASD_BANDS};
use soildb::{Record, RecordKind, RecordStore, StoreOptions};

pub const BATCH_LABID: &str = "FS15R_FS4068";
pub const SAMPLENO: &str = "S-1";

pub fn store() -> RecordStore {
    store_with(StoreOptions::default())
}

pub fn store_with(options: StoreOptions) -> RecordStore {
    RecordStore::with_options(Arc::new(catalog::registry().unwrap()), options)
}

// =============================================================================
// Record builders
// =============================================================================

pub fn country(iso: &str) -> Record {
    Record::new().with("iso", iso).with("country", "Kenya")
}

/// Site at 0°30'0" S, 37°0'0" E
pub fn site(iso: &str, id: i64) -> Record {
    Record::new()
        .with("iso", iso)
        .with("id", id)
        .with("latns", "S")
        .with("latd", 0)
        .with("latm", 30)
        .with("lats", 0)
        .with("lonew", "E")
        .with("lond", 37)
        .with("lonm", 0)
        .with("lons", 0)
}

pub fn horizon(iso: &str, id: i64, hori: i64, top: i64, bot: i64) -> Record {
    Record::new()
        .with("iso", iso)
        .with("id", id)
        .with("hori", hori)
        .with("top", top)
        .with("bot", bot)
}

pub fn chemical(iso: &str, id: i64, hori: i64, btop: i64, bbot: i64, sampleno: &str) -> Record {
    Record::new()
        .with("iso", iso)
        .with("id", id)
        .with("hori", hori)
        .with("btop", btop)
        .with("bbot", bbot)
        .with("sampleno", sampleno)
        .with("phh2o", 6.2)
}

pub fn station(iso: &str, id: i64, name: &str) -> Record {
    Record::new()
        .with("iso", iso)
        .with("id", id)
        .with("statname", name)
}

pub fn station_link(profile: i64, station: i64, dist: Option<i64>) -> Record {
    let mut link = Record::new()
        .with("iso_p", "KE")
        .with("id_p", profile)
        .with("iso_s", "KE")
        .with("id_s", station)
        .with("dir", "N");
    if let Some(dist) = dist {
        link.set("dist", dist);
    }
    link
}

pub fn sample_code(batch_labid: &str, sampleno: &str, plotcode: &str) -> Record {
    Record::new()
        .with("batch_labid", batch_labid)
        .with("sampleno", sampleno)
        .with("plotcode", plotcode)
        .with("country_name", "Kenya")
}

pub fn scan(batch_labid: &str) -> Record {
    Record::new()
        .with("batch_labid", batch_labid)
        .with("reflectance", Spectrum::asd(vec![0.25; ASD_BANDS]))
}

// =============================================================================
// Seeded store
// =============================================================================

pub fn seeded_store() -> RecordStore {
    let store = store();
    seed(&store);
    store
}

pub fn seed(store: &RecordStore) {
    store.insert(RecordKind::Country, country("KE")).unwrap();
    store.insert(RecordKind::SiteDescription, site("KE", 1)).unwrap();

    // Inserted out of order on purpose
    store.insert(RecordKind::MorphologyI, horizon("KE", 1, 2, 20, 50)).unwrap();
    store.insert(RecordKind::MorphologyI, horizon("KE", 1, 1, 0, 20)).unwrap();

    store.insert(RecordKind::ChemicalProperties, chemical("KE", 1, 1, 10, 20, "S-2")).unwrap();
    store.insert(RecordKind::ChemicalProperties, chemical("KE", 1, 1, 0, 10, SAMPLENO)).unwrap();

    for (id, name) in [(100, "Nairobi"), (101, "Kabete"), (102, "Thika")] {
        store.insert(RecordKind::ClimateStation, station("KE", id, name)).unwrap();
    }
    store.insert(RecordKind::ProfileClimateStationLink, station_link(1, 100, Some(30))).unwrap();
    store.insert(RecordKind::ProfileClimateStationLink, station_link(1, 101, Some(5))).unwrap();
    store.insert(RecordKind::ProfileClimateStationLink, station_link(1, 102, None)).unwrap();

    store.insert(RecordKind::IcrafSampleCodes, sample_code(BATCH_LABID, SAMPLENO, "KE 1")).unwrap();
    store.insert(RecordKind::AsdSpectra, scan(BATCH_LABID)).unwrap();
}
