//! Whole-profile and whole-sample views

use std::sync::Arc;

use crate::catalog::{MeasurementKind, RecordKind};
use crate::record::{Record, RecordKey};
use crate::store::{StoreError, StoreResult};

use super::{SoilQuery, SpectralScan, StationLink};

/// One horizon with its second morphology row and measurements
#[derive(Debug, Clone)]
pub struct HorizonGraph {
    pub horizon: Arc<Record>,
    pub morphology_ii: Option<Arc<Record>>,
    /// Measurement kinds with at least one row, in `MeasurementKind::ALL` order
    pub measurements: Vec<(MeasurementKind, Vec<Arc<Record>>)>,
}

impl HorizonGraph {
    pub fn measurements(&self, kind: MeasurementKind) -> &[Arc<Record>] {
        self.measurements
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, rows)| rows.as_slice())
            .unwrap_or(&[])
    }
}

/// Full record graph of one profile
#[derive(Debug, Clone)]
pub struct ProfileGraph {
    pub site: Arc<Record>,
    pub classification: Option<Arc<Record>>,
    /// Diagnostic kinds with at least one code
    pub diagnostics: Vec<(RecordKind, Vec<Arc<Record>>)>,
    pub horizons: Vec<HorizonGraph>,
    pub trace_elements: Vec<Arc<Record>>,
    pub stations: Vec<StationLink>,
}

impl ProfileGraph {
    /// Total records in the graph, stations included
    pub fn record_count(&self) -> usize {
        let horizons: usize = self
            .horizons
            .iter()
            .map(|h| {
                1 + usize::from(h.morphology_ii.is_some())
                    + h.measurements.iter().map(|(_, rows)| rows.len()).sum::<usize>()
            })
            .sum();
        1 + usize::from(self.classification.is_some())
            + self.diagnostics.iter().map(|(_, rows)| rows.len()).sum::<usize>()
            + horizons
            + self.trace_elements.len()
            + self.stations.len()
    }
}

/// Everything recorded for one lab sample
#[derive(Debug, Clone)]
pub struct SampleView {
    pub sampleno: String,
    /// Depth-interval rows carrying the sample number, by kind
    pub measurements: Vec<(RecordKind, Arc<Record>)>,
    pub sample_codes: Vec<Arc<Record>>,
    pub minerals: Vec<Arc<Record>>,
    pub spectrum: Option<SpectralScan>,
}

impl SoilQuery<'_> {
    /// The full record graph of a profile
    pub fn profile_graph(&self, iso: &str, id: i64) -> StoreResult<ProfileGraph> {
        let _section = self.store.read_section();
        let profile = RecordKey::profile(iso, id);
        let site = self.require(RecordKind::SiteDescription, &profile)?;

        let classification = self.store.get(RecordKind::Classification, &profile).ok();

        let mut diagnostics = Vec::new();
        for kind in RecordKind::DIAGNOSTICS {
            let rows = self.records(*kind, &profile)?;
            if !rows.is_empty() {
                diagnostics.push((*kind, rows));
            }
        }

        let mut horizons = Vec::new();
        for horizon in self.records(RecordKind::MorphologyI, &profile)? {
            let Some(hori) = horizon.int("hori") else {
                continue;
            };
            let key = RecordKey::horizon(iso, id, hori);
            let morphology_ii = self.store.get(RecordKind::MorphologyII, &key).ok();

            let mut measurements = Vec::new();
            for kind in MeasurementKind::ALL {
                let rows = self.records(kind.record_kind(), &key)?;
                if !rows.is_empty() {
                    measurements.push((kind, rows));
                }
            }

            horizons.push(HorizonGraph {
                horizon,
                morphology_ii,
                measurements,
            });
        }

        Ok(ProfileGraph {
            site,
            classification,
            diagnostics,
            horizons,
            trace_elements: self.records(RecordKind::TraceElements, &profile)?,
            stations: self.stations_near(iso, id)?,
        })
    }

    /// Every record of a lab sample.
    ///
    /// Fails with SOIL_NOT_FOUND when nothing carries the sample number.
    pub fn sample_view(&self, sampleno: &str) -> StoreResult<SampleView> {
        let _section = self.store.read_section();
        let mut measurements = Vec::new();
        let depth_kinds = MeasurementKind::ALL
            .into_iter()
            .map(|kind| kind.record_kind())
            .chain(std::iter::once(RecordKind::TraceElements));
        for kind in depth_kinds {
            for (_, record) in self.store.lookup(kind, "sampleno", sampleno)? {
                measurements.push((kind, record));
            }
        }

        let sample_codes: Vec<Arc<Record>> = self
            .store
            .lookup(RecordKind::IcrafSampleCodes, "sampleno", sampleno)?
            .into_iter()
            .map(|(_, record)| record)
            .collect();
        let minerals = self.records(RecordKind::SandMineralogyMinerals, &RecordKey::text(sampleno))?;
        let spectrum = self.find_spectrum(sampleno)?;

        if measurements.is_empty() && sample_codes.is_empty() && minerals.is_empty() {
            return Err(StoreError::not_found_by("sample", "sampleno", sampleno));
        }

        Ok(SampleView {
            sampleno: sampleno.to_string(),
            measurements,
            sample_codes,
            minerals,
            spectrum,
        })
    }
}
