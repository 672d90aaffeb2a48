//! Observable events for soildb
//!
//! Events are explicit and typed. Their string form is the `event` field of
//! every structured log line.

use std::fmt;

/// Observable events in soildb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Startup
    /// Configuration loaded
    ConfigLoaded,
    /// Built-in catalog registered
    CatalogRegistered,
    /// Extra schema files loaded
    SchemasLoaded,
    /// Store constructed and ready
    StoreReady,

    // Writes
    /// Record stored
    RecordInserted,
    /// Record rejected by validation or integrity checks
    RecordRejected,
    /// Delete removed a root and its dependents
    DeleteComplete,
    /// Delete refused because of dependents
    DeleteRejected,
    /// Partial delete undone (FATAL if it fails)
    DeleteRolledBack,

    // Ingestion
    /// Batch ingestion started
    IngestBegin,
    /// Batch ingestion finished
    IngestComplete,
    /// Batch ingestion stopped at the first error
    IngestHalted,

    // Joins
    /// Join could not find its root
    JoinRootMissing,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogRegistered => "CATALOG_REGISTERED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::StoreReady => "STORE_READY",

            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordRejected => "RECORD_REJECTED",
            Event::DeleteComplete => "DELETE_COMPLETE",
            Event::DeleteRejected => "DELETE_REJECTED",
            Event::DeleteRolledBack => "DELETE_ROLLED_BACK",

            Event::IngestBegin => "INGEST_BEGIN",
            Event::IngestComplete => "INGEST_COMPLETE",
            Event::IngestHalted => "INGEST_HALTED",

            Event::JoinRootMissing => "JOIN_ROOT_MISSING",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
