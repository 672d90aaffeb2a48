//! Record Store subsystem for soildb
//!
//! Holds the records of every registered kind, keyed by their declared key
//! tuple, and keeps them referentially consistent on insert and delete.
//!
//! # Design Principles
//!
//! - Records are immutable once stored
//! - Every write is all-or-nothing
//! - Ranges are validated, never clamped
//! - No I/O and no suspension inside the store

mod errors;
mod filter;
mod index;
mod scan;
mod store;
mod table;
mod validator;

pub use errors::{StoreError, StoreErrorCode, StoreResult, ValidationDetails};
pub use filter::{Filter, FilterOp, Predicate};
pub use index::FieldIndex;
pub use scan::{Scan, ScanOrder};
pub use store::{DeleteMode, RecordStore, StoreOptions};
pub use validator::{key_of, RecordValidator};
