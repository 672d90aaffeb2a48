//! Schema Registry subsystem for soildb
//!
//! Every record kind is declared up front: fields, key, references and, for
//! measurement kinds, the depth interval. The store validates every insert
//! against these declarations.
//!
//! # Design Principles
//!
//! - Declared once at startup, read-only afterwards
//! - Reference targets must be registered before their dependents
//! - Redeclaration must match exactly

mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::SchemaLoader;
pub use registry::SchemaRegistry;
pub use types::{
    FieldDef, FieldType, IntervalSpec, KindRole, KindSchema, RefColumn, Reference, ReferenceKind,
    ValueRange,
};
