//! Built-in ICRAF-ISRIC catalog
//!
//! Declares every table of the reference database as a record kind. Kinds
//! are registered so that every reference target precedes its dependents.

mod builder;
mod kinds;

use std::fmt;
use std::str::FromStr;

use crate::schema::{KindSchema, SchemaError, SchemaRegistry, SchemaResult};

macro_rules! record_kinds {
    ($($variant:ident => $name:literal,)+) => {
        /// Tag of a built-in record kind
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RecordKind {
            $($variant,)+
        }

        impl RecordKind {
            /// Every built-in kind in registration order
            pub const ALL: &'static [RecordKind] = &[$(RecordKind::$variant,)+];

            /// Table name as registered
            pub fn name(&self) -> &'static str {
                match self {
                    $(RecordKind::$variant => $name,)+
                }
            }
        }

        impl FromStr for RecordKind {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(RecordKind::$variant),)+
                    other => Err(SchemaError::unknown_kind(other)),
                }
            }
        }
    };
}

record_kinds! {
    Region => "Region",
    Country => "Country",
    SoilColour => "Soil_colour",
    ClassificationKey => "Classification_key",
    Key => "Key",
    SiteDescription => "Site_description",
    Classification => "Classification",
    Fao74DiagnosticHorizons => "FAO74_diagnostic_horizons",
    Fao74DiagnosticProperties => "FAO74_diagnostic_properties",
    Fao88DiagnosticHorizons => "FAO88_diagnostic_horizons",
    Fao88DiagnosticProperties => "FAO88_diagnostic_properties",
    WrbDiagnosticHorizons => "WRB_diagnostic_horizons",
    WrbDiagnosticProperties => "WRB_diagnostic_properties",
    WrbDiagnosticMaterials => "WRB_diagnostic_materials",
    StDiagnosticHorizons => "ST_diagnostic_horizons",
    StDiagnosticProperties => "ST_diagnostic_properties",
    MorphologyI => "Morphology_I",
    MorphologyII => "Morphology_II",
    ChemicalProperties => "Chemical_properties",
    PhysicalProperties => "Physical_properties",
    ClayMineralogy => "Clay_mineralogy",
    ElementalCompositionSoil => "Elemental_composition_soil",
    ElementalCompositionClay => "Elemental_composition_clay",
    SolubleSalts => "Soluble_salts",
    SandMineralogyGeneral => "Sand_mineralogy_general",
    TraceElements => "Trace_elements",
    ClimateStation => "Climate_Station",
    ClimateStationBig => "Climate_Station_Big",
    ClimateData => "Climate_Data",
    ClimateDataBig => "Climate_Data_Big",
    ProfileClimateStationLink => "Profile_climate_station_link",
    IcrafSampleCodes => "ICRAF_sample_codes",
    AsdSpectra => "ASD_Spectra",
    SandMineralogyMinerals => "Sand_mineralogy_minerals",
}

impl RecordKind {
    /// Diagnostic annotation kinds, one code per row
    pub const DIAGNOSTICS: &'static [RecordKind] = &[
        RecordKind::Fao74DiagnosticHorizons,
        RecordKind::Fao74DiagnosticProperties,
        RecordKind::Fao88DiagnosticHorizons,
        RecordKind::Fao88DiagnosticProperties,
        RecordKind::WrbDiagnosticHorizons,
        RecordKind::WrbDiagnosticProperties,
        RecordKind::WrbDiagnosticMaterials,
        RecordKind::StDiagnosticHorizons,
        RecordKind::StDiagnosticProperties,
    ];
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AsRef<str> for RecordKind {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

/// Horizon-scoped depth-interval measurement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    Chemical,
    Physical,
    ClayMineralogy,
    ElementalSoil,
    ElementalClay,
    SolubleSalts,
    SandMineralogy,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 7] = [
        MeasurementKind::Chemical,
        MeasurementKind::Physical,
        MeasurementKind::ClayMineralogy,
        MeasurementKind::ElementalSoil,
        MeasurementKind::ElementalClay,
        MeasurementKind::SolubleSalts,
        MeasurementKind::SandMineralogy,
    ];

    pub fn record_kind(&self) -> RecordKind {
        match self {
            MeasurementKind::Chemical => RecordKind::ChemicalProperties,
            MeasurementKind::Physical => RecordKind::PhysicalProperties,
            MeasurementKind::ClayMineralogy => RecordKind::ClayMineralogy,
            MeasurementKind::ElementalSoil => RecordKind::ElementalCompositionSoil,
            MeasurementKind::ElementalClay => RecordKind::ElementalCompositionClay,
            MeasurementKind::SolubleSalts => RecordKind::SolubleSalts,
            MeasurementKind::SandMineralogy => RecordKind::SandMineralogyGeneral,
        }
    }

    pub fn name(&self) -> &'static str {
        self.record_kind().name()
    }
}

/// Catalog declarations in registration order
pub fn kinds() -> SchemaResult<Vec<KindSchema>> {
    kinds::declarations()
}

/// Registers the catalog into an existing registry
pub fn register_all(registry: &mut SchemaRegistry) -> SchemaResult<()> {
    for kind in kinds()? {
        registry.register(kind)?;
    }
    Ok(())
}

/// A registry holding exactly the built-in catalog
pub fn registry() -> SchemaResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}
