//! ICRAF-ISRIC soil database table declarations
//!
//! Untyped numeric columns of the source tables are declared as floats,
//! `long` columns as ints, and edit dates as dates.

use crate::schema::{KindRole, KindSchema, SchemaResult, ValueRange};
use crate::spectral::{ASD_END_NM, ASD_START_NM, ASD_STEP_NM};

use super::builder::KindBuilder;
use super::RecordKind;

const HUE_PATTERN: &str = r"^(N|\d+(\.\d+)?(R|YR|Y|GY|G|BG|B|PB|P|RP))$";
const HORIZON: [&str; 3] = ["iso", "id", "hori"];
const PROFILE: [&str; 2] = ["iso", "id"];

fn depth() -> ValueRange {
    ValueRange::new(0.0, 10_000.0)
}

fn minutes() -> ValueRange {
    ValueRange::new(0.0, 59.0)
}

// =============================================================================
// Vocabularies
// =============================================================================

fn region() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::Region, KindRole::Vocabulary)
        .describe("World regions")
        .key_text("region")
        .text(&["name"])
        .build()
}

fn country() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::Country, KindRole::Vocabulary)
        .describe("Country codes")
        .key_text("iso")
        .pattern(&["iso"], super::builder::ISO_PATTERN)
        .text(&["country", "region"])
        .codes(RecordKind::Region, &["region"])
        .build()
}

fn soil_colour() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::SoilColour, KindRole::Vocabulary)
        .describe("Munsell soil colour chart")
        .key_text("hue")
        .key_float("value")
        .key_float("chroma")
        .pattern(&["hue"], HUE_PATTERN)
        .range(&["value"], ValueRange::new(0.0, 10.0))
        .range(&["chroma"], ValueRange::new(0.0, 20.0))
        .text(&["colourcode", "name"])
        .build()
}

fn classification_key() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::ClassificationKey, KindRole::Vocabulary)
        .describe("Classification code values per attribute")
        .key_text("attribute")
        .key_text("value")
        .text(&["description"])
        .int(&["order"])
        .build()
}

fn key() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::Key, KindRole::Vocabulary)
        .describe("Descriptive code values per attribute")
        .key_text("attribute")
        .key_text("value")
        .text(&["description"])
        .float(&["fao77", "fao90"])
        .text(&["key_id"])
        .float(&["order"])
        .build()
}

// =============================================================================
// Profiles and annotations
// =============================================================================

fn site_description() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::SiteDescription, KindRole::Profile)
        .describe("Profile site description")
        .profile_key()
        .float(&["smonth"])
        .int(&["syear"])
        .text(&["auth", "loc", "latns"])
        .int(&["latd", "latm", "lats"])
        .text(&["lonew"])
        .int(&["lond", "lonm", "lons", "alt"])
        .text(&["clim", "par", "par2", "mode", "mode2", "text", "text2"])
        .int(&["depth"])
        .text(&["weat", "weat2", "rest1", "rest2", "parrem", "lndreg", "lndtop", "phys"])
        .float(&["slp"])
        .text(&["pos", "slf", "asp", "knd", "ptrn"])
        .int(&["var"])
        .text(&["rock", "ston"])
        .float(&["stsi"])
        .text(&["stsh", "cra", "sea", "salt", "alkali"])
        .int(&["sode"])
        .text(&["wake"])
        .int(&["wade", "waup", "walo", "staup", "stalo"])
        .text(&["stape", "run", "flfr", "flna", "drain", "draini"])
        .int(&["moidu", "moidl", "moimu", "moiml", "moiwu", "moiwl"])
        .text(&[
            "ert", "ert2", "erd", "erd2", "aggr", "mass", "lut", "crop", "irr", "rot", "imp",
            "vet", "ves", "ved",
        ])
        .float(&["adpc", "admm"])
        .text(&["comname", "descr", "remarks"])
        .date(&["editdate"])
        .text(&["verified"])
        .pattern(&["latns"], "^[NS]$")
        .pattern(&["lonew"], "^[EW]$")
        .range(&["latd"], ValueRange::new(0.0, 90.0))
        .range(&["lond"], ValueRange::new(0.0, 180.0))
        .range(&["latm", "lats", "lonm", "lons"], minutes())
        .range(&["depth"], depth())
        .codes(RecordKind::Country, &["iso"])
        .build()
}

fn classification() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::Classification, KindRole::Annotation)
        .describe("Profile classification in WRB, FAO and Soil Taxonomy")
        .profile_key()
        .text(&[
            "wrb_rg", "wrb_q1", "wrb_q2", "wrb_q3", "wrb_q4", "fao_88", "fsub_88", "pha_88",
        ])
        .float(&["faostat_88"])
        .text(&["fao_74", "pha_74"])
        .float(&["faostat"])
        .text(&[
            "usgg_99", "ussg_99", "ustx_92", "usmin_92", "str_92", "oth_92", "smr_92", "usgg_75",
            "ussg_75", "ustx", "usmin", "str", "oth", "smr", "local", "remarks",
        ])
        .date(&["editdate"])
        .text(&["ver"])
        .owner(RecordKind::SiteDescription, &PROFILE)
        .attribute_code(RecordKind::ClassificationKey, "wrb_rg")
        .attribute_code(RecordKind::ClassificationKey, "fao_88")
        .attribute_code(RecordKind::ClassificationKey, "fao_74")
        .build()
}

/// One-to-many diagnostic code rows; the code is part of the key
fn diagnostic(kind: RecordKind, code: &str, description: &str) -> SchemaResult<KindSchema> {
    KindBuilder::new(kind, KindRole::Annotation)
        .describe(description)
        .profile_key()
        .key_text(code)
        .date(&["editdate"])
        .owner(RecordKind::SiteDescription, &PROFILE)
        .attribute_code(RecordKind::Key, code)
        .build()
}

// =============================================================================
// Horizons
// =============================================================================

fn morphology_i() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::MorphologyI, KindRole::Horizon)
        .describe("Horizon morphology: depth, colour, structure, consistence, pores, roots")
        .horizon_key()
        .text(&["symbol"])
        .int(&["top", "bot"])
        .text(&["wid", "tpg", "hued"])
        .float(&["vald", "chromd"])
        .text(&["hue"])
        .float(&["value", "chroma"])
        .text(&[
            "grade", "size", "form", "fore", "grade2", "size2", "form2", "fieldtx", "txmod",
            "orgk", "orgd", "cond", "conm", "conws", "conwp", "cono", "porq", "porq1", "porq2",
            "porq21", "pors", "pors1", "pors2", "pors21", "porc", "porc2", "pord", "pord2",
            "porf", "porf2", "poro", "poro2", "port", "roq", "roq2", "ros", "ros2", "rol",
            "rol2", "effa", "effc", "effl",
        ])
        .float(&["phval"])
        .text(&["remarks"])
        .date(&["editdate"])
        .text(&["ver"])
        .range(&["top", "bot"], depth())
        .range(&["phval"], ValueRange::ph())
        .owner(RecordKind::SiteDescription, &PROFILE)
        .codes(RecordKind::SoilColour, &["hue", "value", "chroma"])
        .codes(RecordKind::SoilColour, &["hued", "vald", "chromd"])
        .build()
}

fn morphology_ii() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::MorphologyII, KindRole::Horizon)
        .describe("Horizon morphology: mottles, cutans, inclusions, rock fragments, biology")
        .horizon_key()
        .text(&[
            "motta", "motta2", "motts", "motts2", "mottc", "mottc2", "mottb", "mottb2", "motthue",
        ])
        .float(&["mottval", "mottch"])
        .text(&["motthu2"])
        .float(&["mottva2", "mottch2"])
        .text(&[
            "cutc", "cutt", "cutk", "cutl", "incq", "incq2", "inct", "inct2", "incsi", "incsi2",
            "inch", "inch2", "incsh", "incsh2", "incc", "incc2", "rockq", "rockq2", "rocks",
            "rocks2", "rockw", "rockw2", "rockc", "rockc2", "pank", "panc", "pany", "pans",
            "bioa", "biok", "biok2",
        ])
        .date(&["editdate"])
        .text(&["ver"])
        .owner(RecordKind::MorphologyI, &HORIZON)
        .codes(RecordKind::SoilColour, &["motthue", "mottval", "mottch"])
        .build()
}

// =============================================================================
// Depth-interval measurements
// =============================================================================

/// Horizon-scoped interval kind with `sampleno` indexed
fn measurement(kind: RecordKind, top: &str, bot: &str) -> KindBuilder {
    KindBuilder::new(kind, KindRole::DepthInterval)
        .horizon_key()
        .key_int(top)
        .key_int(bot)
        .text(&["sampleno"])
        .indexed(&["sampleno"])
        .range(&[top, bot], depth())
        .owner(RecordKind::MorphologyI, &HORIZON)
        .interval(&HORIZON, top, bot)
}

fn chemical_properties() -> SchemaResult<KindSchema> {
    measurement(RecordKind::ChemicalProperties, "btop", "bbot")
        .describe("Soil chemistry per sampled depth interval")
        .float(&["phh2o", "phkcl", "phcacl2", "caco3", "caso4", "orgc", "orgn"])
        .int(&["c_n"])
        .float(&["ca", "mg", "na", "k", "sum", "exacid", "exal", "cecsoil"])
        .int(&["cecclay"])
        .float(&["cecorg", "ecec"])
        .int(&["bs"])
        .float(&["als"])
        .int(&["esp"])
        .float(&["ec"])
        .text(&["chemrem"])
        .date(&["editdate"])
        .text(&["verified"])
        .range(&["phh2o", "phkcl", "phcacl2"], ValueRange::ph())
        .range(&["caco3", "caso4", "bs", "esp", "als"], ValueRange::percent())
        .build()
}

fn physical_properties() -> SchemaResult<KindSchema> {
    measurement(RecordKind::PhysicalProperties, "btop", "bbot")
        .describe("Particle size, bulk density and water retention per depth interval")
        .float(&[
            "gravel", "s1", "s2", "s3", "s4", "s5", "tsa", "si1", "si2", "tsi", "clay", "dispcl",
            "bulk", "pf0", "pf1", "pf15", "pf2", "pf23", "pf27", "pf34", "pf42", "cole", "ssa",
        ])
        .text(&["physrem"])
        .date(&["editdate"])
        .text(&["verified", "codetype", "type"])
        .range(
            &[
                "gravel", "s1", "s2", "s3", "s4", "s5", "tsa", "si1", "si2", "tsi", "clay",
                "dispcl",
            ],
            ValueRange::percent(),
        )
        .range(&["bulk"], ValueRange::new(0.0, 3.0))
        .build()
}

fn clay_mineralogy() -> SchemaResult<KindSchema> {
    measurement(RecordKind::ClayMineralogy, "top", "bot")
        .describe("Clay fraction mineralogy and oxalate/dithionite extracts")
        .text(&[
            "kaol", "mill", "verm", "chlor", "smec", "hall", "mix", "quar", "feld", "gibb", "goet",
            "hem", "minx", "miny", "minz",
        ])
        .float(&["fe", "al", "ammfe", "ammal", "ammsi", "fep", "alp", "cp"])
        .int(&["pret"])
        .float(&["phnaf", "odoe", "mi"])
        .text(&["cminrem"])
        .date(&["editdate"])
        .text(&["verified", "codetype", "type"])
        .range(&["phnaf"], ValueRange::ph())
        .range(&["pret"], ValueRange::percent())
        .build()
}

const OXIDES: [&str; 11] = [
    "sio2", "al2o3", "fe2o3", "cao", "mgo", "k2o", "na2o", "tio2", "mno2", "p2o5", "ign",
];

fn elemental_composition_soil() -> SchemaResult<KindSchema> {
    measurement(RecordKind::ElementalCompositionSoil, "top", "bot")
        .describe("Total elemental composition of the fine earth")
        .float(&OXIDES)
        .float(&["total", "ratiosial", "ratiosife", "ratiosir", "ratioalfe"])
        .text(&["soelrem"])
        .date(&["editdate"])
        .text(&["verified", "codetype"])
        .range(&OXIDES, ValueRange::percent())
        .build()
}

fn elemental_composition_clay() -> SchemaResult<KindSchema> {
    measurement(RecordKind::ElementalCompositionClay, "top", "bot")
        .describe("Total elemental composition of the clay fraction")
        .float(&OXIDES)
        .float(&["total", "ratiosial", "ratiosife", "ratiosir", "ratioalfe"])
        .text(&["soelrem"])
        .date(&["editdate"])
        .text(&["verified"])
        .range(&OXIDES, ValueRange::percent())
        .build()
}

fn soluble_salts() -> SchemaResult<KindSchema> {
    measurement(RecordKind::SolubleSalts, "top", "bot")
        .describe("Saturation extract cations and anions")
        .float(&[
            "cas", "mgs", "nas", "ks", "sumcat", "co3", "hco3", "cl", "so4", "no3", "sumani",
            "ec5", "ece", "phs", "sar",
        ])
        .text(&["saltrem"])
        .date(&["editdate"])
        .text(&["verified", "type"])
        .range(&["phs"], ValueRange::ph())
        .build()
}

fn sand_mineralogy_general() -> SchemaResult<KindSchema> {
    measurement(RecordKind::SandMineralogyGeneral, "top", "bot")
        .describe("Sand fraction light/heavy mineral summary")
        .float(&["heavy", "light"])
        .int(&["quartz", "k_feldspar", "plagioclas", "rest", "opaque"])
        .text(&["sminrem"])
        .date(&["editdate"])
        .text(&["verified"])
        .range(
            &["heavy", "light", "quartz", "k_feldspar", "plagioclas", "rest", "opaque"],
            ValueRange::percent(),
        )
        .build()
}

fn trace_elements() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::TraceElements, KindRole::DepthInterval)
        .describe("Trace element contents per profile depth interval")
        .profile_key()
        .key_int("top")
        .key_int("bott")
        .text(&["sampleno"])
        .indexed(&["sampleno"])
        .float(&["as"])
        .int(&["ba"])
        .float(&["cd"])
        .int(&["co", "cr", "cu", "mn"])
        .float(&["mo"])
        .int(&["ni", "pb", "sr", "v", "zn"])
        .text(&["te_rem"])
        .date(&["date"])
        .text(&["ver"])
        .range(&["top", "bott"], depth())
        .owner(RecordKind::SiteDescription, &PROFILE)
        .interval(&PROFILE, "top", "bott")
        .build()
}

// =============================================================================
// Climate
// =============================================================================

fn climate_station(kind: RecordKind, name_field: &str) -> SchemaResult<KindSchema> {
    KindBuilder::new(kind, KindRole::Station)
        .describe("Climate station location")
        .profile_key()
        .float(&["wmocode"])
        .text(&[name_field, "lonew"])
        .int(&["lond", "lonm"])
        .text(&["latns"])
        .int(&["latd", "latm", "alt"])
        .date(&["editdate"])
        .pattern(&["latns"], "^[NS]$")
        .pattern(&["lonew"], "^[EW]$")
        .range(&["latd"], ValueRange::new(0.0, 90.0))
        .range(&["lond"], ValueRange::new(0.0, 180.0))
        .range(&["latm", "lonm"], minutes())
        .codes(RecordKind::Country, &["iso"])
        .build()
}

const MONTHS: [&str; 13] = [
    "annual", "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn climate_data(kind: RecordKind, station: RecordKind) -> SchemaResult<KindSchema> {
    KindBuilder::new(kind, KindRole::Climate)
        .describe("Monthly climate series per station and variable")
        .profile_key()
        .key_text("type")
        .int(&["nrecord"])
        .float(&MONTHS)
        .date(&["editdate"])
        .owner(station, &PROFILE)
        .build()
}

fn profile_climate_station_link() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::ProfileClimateStationLink, KindRole::Link)
        .describe("Nearby climate stations of a profile")
        .key_iso_id("iso_p", "id_p")
        .key_iso_id("iso_s", "id_s")
        .int(&["dist"])
        .text(&["dir", "ref"])
        .date(&["editdate"])
        .range(&["dist"], ValueRange::new(0.0, f64::MAX))
        .link(RecordKind::SiteDescription, &["iso_p", "id_p"])
        .link(RecordKind::ClimateStation, &["iso_s", "id_s"])
        .build()
}

// =============================================================================
// Samples and spectra
// =============================================================================

fn icraf_sample_codes() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::IcrafSampleCodes, KindRole::Sample)
        .describe("Correlates spectral batch/lab ids with sample numbers and plots")
        .key_text("batch_labid")
        .text(&["sampleno", "country_name", "plotcode"])
        .float(&["hori", "btop", "bbot", "dsed"])
        .indexed(&["sampleno", "plotcode"])
        .build()
}

fn asd_spectra() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::AsdSpectra, KindRole::Scan)
        .describe("ASD full-range reflectance scan, 350-2500 nm at 10 nm")
        .key_text("batch_labid")
        .required_spectrum("reflectance", ASD_START_NM, ASD_END_NM, ASD_STEP_NM)
        .range(&["reflectance"], ValueRange::new(0.0, 1.0))
        .owner(RecordKind::IcrafSampleCodes, &["batch_labid"])
        .build()
}

fn sand_mineralogy_minerals() -> SchemaResult<KindSchema> {
    KindBuilder::new(RecordKind::SandMineralogyMinerals, KindRole::Sample)
        .describe("Sand fraction mineral counts per lab sample")
        .key_text("sampleno")
        .key_text("mineral")
        .int(&["value"])
        .range(&["value"], ValueRange::percent())
        .attribute_code(RecordKind::Key, "mineral")
        .build()
}

/// Every catalog kind, reference targets before their dependents.
pub(crate) fn declarations() -> SchemaResult<Vec<KindSchema>> {
    Ok(vec![
        region()?,
        country()?,
        soil_colour()?,
        classification_key()?,
        key()?,
        site_description()?,
        classification()?,
        diagnostic(RecordKind::Fao74DiagnosticHorizons, "dhor_74", "FAO 1974 diagnostic horizons")?,
        diagnostic(RecordKind::Fao74DiagnosticProperties, "dpro_74", "FAO 1974 diagnostic properties")?,
        diagnostic(RecordKind::Fao88DiagnosticHorizons, "fhor_88", "FAO 1988 diagnostic horizons")?,
        diagnostic(RecordKind::Fao88DiagnosticProperties, "fpro_88", "FAO 1988 diagnostic properties")?,
        diagnostic(RecordKind::WrbDiagnosticHorizons, "wrb_h", "WRB diagnostic horizons")?,
        diagnostic(RecordKind::WrbDiagnosticProperties, "wrb_p", "WRB diagnostic properties")?,
        diagnostic(RecordKind::WrbDiagnosticMaterials, "wrb_m", "WRB diagnostic materials")?,
        diagnostic(RecordKind::StDiagnosticHorizons, "uhor_92", "Soil Taxonomy diagnostic horizons")?,
        diagnostic(RecordKind::StDiagnosticProperties, "upro_92", "Soil Taxonomy diagnostic properties")?,
        morphology_i()?,
        morphology_ii()?,
        chemical_properties()?,
        physical_properties()?,
        clay_mineralogy()?,
        elemental_composition_soil()?,
        elemental_composition_clay()?,
        soluble_salts()?,
        sand_mineralogy_general()?,
        trace_elements()?,
        climate_station(RecordKind::ClimateStation, "statname")?,
        climate_station(RecordKind::ClimateStationBig, "station")?,
        climate_data(RecordKind::ClimateData, RecordKind::ClimateStation)?,
        climate_data(RecordKind::ClimateDataBig, RecordKind::ClimateStationBig)?,
        profile_climate_station_link()?,
        icraf_sample_codes()?,
        asd_spectra()?,
        sand_mineralogy_minerals()?,
    ])
}
