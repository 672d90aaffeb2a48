//! soildb - an in-memory, referentially consistent store for soil profile
//! records
//!
//! Record kinds are declared in a [`schema::SchemaRegistry`]; the built-in
//! [`catalog`] declares the soil profile kinds. A [`store::RecordStore`]
//! validates every insert against its kind, checks references and depth
//! intervals, and refuses or cascades deletes that would orphan records.
//! [`query::SoilQuery`] composes records along declared references.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod observability;
pub mod query;
pub mod record;
pub mod resolver;
pub mod schema;
pub mod spectral;
pub mod store;

pub use catalog::{MeasurementKind, RecordKind};
pub use config::{ConfigError, LogConfig, StoreConfig};
pub use query::SoilQuery;
pub use record::{KeyValue, Record, RecordKey, RecordRef, Value};
pub use schema::{KindSchema, SchemaError, SchemaRegistry};
pub use store::{DeleteMode, RecordStore, StoreError, StoreErrorCode, StoreOptions, StoreResult};
