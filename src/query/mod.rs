//! Join/Query layer
//!
//! Read-only compositions of records along declared relationships. Joins
//! fail only with SOIL_NOT_FOUND when their root is missing; an existing
//! root with no related rows yields empty collections.
//!
//! Each join runs inside one read section of the store, so a delete lands
//! entirely before or entirely after it.

mod graph;

pub use graph::{HorizonGraph, ProfileGraph, SampleView};

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{MeasurementKind, RecordKind};
use crate::observability::Event;
use crate::record::{Record, RecordKey};
use crate::spectral::{decimal_degrees, parse_plotcode, LibraryEntry, Spectrum};
use crate::store::{Filter, RecordStore, ScanOrder, StoreError, StoreResult};

/// A reflectance scan correlated to a lab sample
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralScan {
    pub batch_labid: String,
    pub sampleno: String,
    pub spectrum: Spectrum,
}

impl SpectralScan {
    /// Covered wavelengths, in nanometers
    pub fn wavelength_range(&self) -> std::ops::RangeInclusive<u32> {
        self.spectrum.range()
    }

    /// Reflectance values in wavelength order
    pub fn reflectance(&self) -> &[f64] {
        self.spectrum.values()
    }
}

/// A climate station linked to a profile
#[derive(Debug, Clone)]
pub struct StationLink {
    pub key: RecordKey,
    pub station: Arc<Record>,
    /// Distance from the profile, in kilometers
    pub dist: Option<i64>,
    /// Compass direction from the profile
    pub dir: Option<String>,
}

/// Named joins over a store
#[derive(Debug, Clone, Copy)]
pub struct SoilQuery<'s> {
    store: &'s RecordStore,
}

impl<'s> SoilQuery<'s> {
    pub fn new(store: &'s RecordStore) -> Self {
        Self { store }
    }

    fn require(&self, kind: RecordKind, key: &RecordKey) -> StoreResult<Arc<Record>> {
        self.store.get(kind, key).map_err(|err| {
            debug!(event = Event::JoinRootMissing.as_str(), kind = kind.name(), key = %key);
            err
        })
    }

    fn records(&self, kind: RecordKind, prefix: &RecordKey) -> StoreResult<Vec<Arc<Record>>> {
        Ok(self
            .store
            .prefix(kind, prefix)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// Horizons of a profile ordered by `hori`
    pub fn horizons_of(&self, iso: &str, id: i64) -> StoreResult<Vec<Arc<Record>>> {
        let _section = self.store.read_section();
        let profile = RecordKey::profile(iso, id);
        self.require(RecordKind::SiteDescription, &profile)?;
        self.records(RecordKind::MorphologyI, &profile)
    }

    /// Measurements of one kind for a horizon ordered by top depth
    pub fn measurements_of(
        &self,
        iso: &str,
        id: i64,
        hori: i64,
        kind: MeasurementKind,
    ) -> StoreResult<Vec<Arc<Record>>> {
        let _section = self.store.read_section();
        let horizon = RecordKey::horizon(iso, id, hori);
        self.require(RecordKind::MorphologyI, &horizon)?;
        self.records(kind.record_kind(), &horizon)
    }

    /// Trace element intervals of a profile ordered by top depth
    pub fn trace_elements_of(&self, iso: &str, id: i64) -> StoreResult<Vec<Arc<Record>>> {
        let _section = self.store.read_section();
        let profile = RecordKey::profile(iso, id);
        self.require(RecordKind::SiteDescription, &profile)?;
        self.records(RecordKind::TraceElements, &profile)
    }

    /// The scan of a sample, through its sample code rows.
    ///
    /// When several batch/lab ids carry the sample number, the first in
    /// batch/lab id order with a stored scan wins.
    pub fn spectrum_for(&self, sampleno: &str) -> StoreResult<SpectralScan> {
        self.find_spectrum(sampleno)?.ok_or_else(|| {
            debug!(event = Event::JoinRootMissing.as_str(), kind = RecordKind::AsdSpectra.name(), sampleno);
            StoreError::not_found_by(RecordKind::AsdSpectra.name(), "sampleno", sampleno)
        })
    }

    fn find_spectrum(&self, sampleno: &str) -> StoreResult<Option<SpectralScan>> {
        let _section = self.store.read_section();
        for (code_key, _) in self.store.lookup(RecordKind::IcrafSampleCodes, "sampleno", sampleno)? {
            let scan = match self.store.get(RecordKind::AsdSpectra, &code_key) {
                Ok(scan) => scan,
                Err(_) => continue,
            };
            if let Some(spectrum) = scan.get("reflectance").and_then(|v| v.as_spectrum()) {
                return Ok(Some(SpectralScan {
                    batch_labid: code_key.to_string(),
                    sampleno: sampleno.to_string(),
                    spectrum: spectrum.clone(),
                }));
            }
        }
        Ok(None)
    }

    /// Linked climate stations by ascending distance; unknown distances last
    pub fn stations_near(&self, iso: &str, id: i64) -> StoreResult<Vec<StationLink>> {
        let _section = self.store.read_section();
        let profile = RecordKey::profile(iso, id);
        self.require(RecordKind::SiteDescription, &profile)?;

        let mut links = Vec::new();
        for (_, link) in self.store.prefix(RecordKind::ProfileClimateStationLink, &profile)? {
            let (Some(iso_s), Some(id_s)) = (link.text("iso_s"), link.int("id_s")) else {
                continue;
            };
            let key = RecordKey::profile(iso_s, id_s);
            if let Ok(station) = self.store.get(RecordKind::ClimateStation, &key) {
                links.push(StationLink {
                    key,
                    station,
                    dist: link.int("dist"),
                    dir: link.text("dir").map(str::to_string),
                });
            }
        }

        links.sort_by(|a, b| {
            let da = a.dist.unwrap_or(i64::MAX);
            let db = b.dist.unwrap_or(i64::MAX);
            da.cmp(&db).then_with(|| a.key.cmp(&b.key))
        });
        Ok(links)
    }

    /// Scans placed at their profile's coordinates.
    ///
    /// Inner join: scans whose sample code lacks a plot code, or whose plot
    /// code names no stored profile, are left out.
    pub fn spectral_library(&self) -> StoreResult<Vec<LibraryEntry>> {
        let _section = self.store.read_section();
        let mut entries = Vec::new();
        let scans = self
            .store
            .scan_ordered(RecordKind::AsdSpectra, Filter::all(), ScanOrder::Key)?;

        for (key, scan) in scans {
            let Some(spectrum) = scan.get("reflectance").and_then(|v| v.as_spectrum()) else {
                continue;
            };
            let Ok(code) = self.store.get(RecordKind::IcrafSampleCodes, &key) else {
                continue;
            };
            let Some((iso, id)) = code.text("plotcode").and_then(parse_plotcode) else {
                continue;
            };
            let Ok(site) = self.store.get(RecordKind::SiteDescription, &RecordKey::profile(&iso, id)) else {
                continue;
            };

            let (latitude, longitude) = decimal_degrees(&site);
            entries.push(LibraryEntry {
                name: key.to_string(),
                latitude,
                longitude,
                spectrum: spectrum.clone(),
            });
        }
        Ok(entries)
    }
}
