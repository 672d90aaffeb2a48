//! Record store error types
//!
//! Error codes:
//! - SOIL_UNKNOWN_KIND (REJECT)
//! - SOIL_DUPLICATE_KEY (REJECT)
//! - SOIL_TYPE_MISMATCH (REJECT)
//! - SOIL_DANGLING_REFERENCE (REJECT)
//! - SOIL_OVERLAPPING_INTERVAL (REJECT)
//! - SOIL_REFERENCED (REJECT)
//! - SOIL_NOT_FOUND (REJECT)
//! - SOIL_INTERNAL (FATAL)
//!
//! A rejected operation leaves the store unchanged.

use std::fmt;

use crate::record::{RecordKey, RecordRef};
use crate::schema::{SchemaError, SchemaErrorCode, Severity};

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// Kind name not registered
    SoilUnknownKind,
    /// Key tuple already present in the kind
    SoilDuplicateKey,
    /// Field missing, undeclared, mistyped or out of range
    SoilTypeMismatch,
    /// Referenced key does not exist in the target kind
    SoilDanglingReference,
    /// Depth interval intersects a stored interval of the same scope
    SoilOverlappingInterval,
    /// Record still has dependents
    SoilReferenced,
    /// No record (or join root) under the given key
    SoilNotFound,
    /// Store invariant broken
    SoilInternal,
}

impl StoreErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::SoilUnknownKind => "SOIL_UNKNOWN_KIND",
            StoreErrorCode::SoilDuplicateKey => "SOIL_DUPLICATE_KEY",
            StoreErrorCode::SoilTypeMismatch => "SOIL_TYPE_MISMATCH",
            StoreErrorCode::SoilDanglingReference => "SOIL_DANGLING_REFERENCE",
            StoreErrorCode::SoilOverlappingInterval => "SOIL_OVERLAPPING_INTERVAL",
            StoreErrorCode::SoilReferenced => "SOIL_REFERENCED",
            StoreErrorCode::SoilNotFound => "SOIL_NOT_FOUND",
            StoreErrorCode::SoilInternal => "SOIL_INTERNAL",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::SoilInternal => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which field failed validation and how
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationDetails {
    /// Field name
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(field: impl Into<String>, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': expected {}, got {}", self.field, self.expected, self.actual)
    }
}

/// Store error type with full context
#[derive(Debug, Clone)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    kind: Option<String>,
    key: Option<RecordKey>,
    details: Option<ValidationDetails>,
    /// Other records involved: the missing target, the overlapped row, or
    /// the dependents blocking a delete
    related: Vec<RecordRef>,
}

impl StoreError {
    fn base(code: StoreErrorCode, message: String, kind: Option<String>) -> Self {
        Self {
            code,
            message,
            kind,
            key: None,
            details: None,
            related: Vec::new(),
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::base(
            StoreErrorCode::SoilUnknownKind,
            format!("Kind '{}' is not registered", kind),
            Some(kind),
        )
    }

    /// Create a duplicate key error
    pub fn duplicate_key(kind: impl Into<String>, key: RecordKey) -> Self {
        let kind = kind.into();
        Self {
            key: Some(key.clone()),
            ..Self::base(
                StoreErrorCode::SoilDuplicateKey,
                format!("{}[{}] already exists", kind, key),
                Some(kind),
            )
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(kind: impl Into<String>, details: ValidationDetails) -> Self {
        let kind = kind.into();
        Self {
            details: Some(details.clone()),
            ..Self::base(
                StoreErrorCode::SoilTypeMismatch,
                format!("{} record rejected: {}", kind, details),
                Some(kind),
            )
        }
    }

    /// Create a dangling reference error
    pub fn dangling_reference(kind: impl Into<String>, key: RecordKey, target: RecordRef) -> Self {
        let kind = kind.into();
        Self {
            key: Some(key.clone()),
            related: vec![target.clone()],
            ..Self::base(
                StoreErrorCode::SoilDanglingReference,
                format!("{}[{}] references missing {}", kind, key, target),
                Some(kind),
            )
        }
    }

    /// Create an overlapping interval error
    pub fn overlapping_interval(kind: impl Into<String>, key: RecordKey, existing: RecordKey) -> Self {
        let kind = kind.into();
        Self {
            key: Some(key.clone()),
            related: vec![RecordRef::new(kind.clone(), existing.clone())],
            ..Self::base(
                StoreErrorCode::SoilOverlappingInterval,
                format!("{}[{}] overlaps stored interval [{}]", kind, key, existing),
                Some(kind),
            )
        }
    }

    /// Create a referenced error listing blocking dependents
    pub fn referenced(kind: impl Into<String>, key: RecordKey, dependents: Vec<RecordRef>) -> Self {
        let kind = kind.into();
        let first = dependents
            .first()
            .map(|d| d.to_string())
            .unwrap_or_default();
        Self {
            key: Some(key.clone()),
            ..Self::base(
                StoreErrorCode::SoilReferenced,
                format!(
                    "{}[{}] is referenced by {} record(s), first {}",
                    kind,
                    key,
                    dependents.len(),
                    first
                ),
                Some(kind),
            )
        }
        .with_related(dependents)
    }

    /// Create a not found error for a record key
    pub fn not_found(kind: impl Into<String>, key: RecordKey) -> Self {
        let kind = kind.into();
        Self {
            key: Some(key.clone()),
            ..Self::base(
                StoreErrorCode::SoilNotFound,
                format!("{}[{}] not found", kind, key),
                Some(kind),
            )
        }
    }

    /// Create a not found error for a join root addressed by a non-key value
    pub fn not_found_by(kind: impl Into<String>, field: &str, value: impl fmt::Display) -> Self {
        let kind = kind.into();
        Self::base(
            StoreErrorCode::SoilNotFound,
            format!("no {} record with {} = {}", kind, field, value),
            Some(kind),
        )
    }

    /// Create an internal invariant error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::base(StoreErrorCode::SoilInternal, message.into(), None)
    }

    fn with_related(mut self, related: Vec<RecordRef>) -> Self {
        self.related = related;
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the kind name if applicable
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Returns the offending key if applicable
    pub fn key(&self) -> Option<&RecordKey> {
        self.key.as_ref()
    }

    /// Returns validation details if applicable
    pub fn details(&self) -> Option<&ValidationDetails> {
        self.details.as_ref()
    }

    /// Returns the other records involved
    pub fn related(&self) -> &[RecordRef] {
        &self.related
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<SchemaError> for StoreError {
    fn from(err: SchemaError) -> Self {
        match err.code() {
            SchemaErrorCode::SoilUnknownKind => {
                StoreError::unknown_kind(err.kind().unwrap_or_default())
            }
            _ => StoreError::internal(err.to_string()),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(StoreErrorCode::SoilDuplicateKey.code(), "SOIL_DUPLICATE_KEY");
        assert_eq!(StoreErrorCode::SoilTypeMismatch.code(), "SOIL_TYPE_MISMATCH");
        assert_eq!(StoreErrorCode::SoilDanglingReference.code(), "SOIL_DANGLING_REFERENCE");
        assert_eq!(StoreErrorCode::SoilOverlappingInterval.code(), "SOIL_OVERLAPPING_INTERVAL");
        assert_eq!(StoreErrorCode::SoilReferenced.code(), "SOIL_REFERENCED");
        assert_eq!(StoreErrorCode::SoilNotFound.code(), "SOIL_NOT_FOUND");
        assert_eq!(StoreErrorCode::SoilInternal.code(), "SOIL_INTERNAL");
    }

    #[test]
    fn test_only_internal_is_fatal() {
        assert!(StoreError::internal("index out of sync").is_fatal());
        assert!(!StoreError::not_found("Site_description", RecordKey::profile("KE", 1)).is_fatal());
    }

    #[test]
    fn test_dangling_reference_carries_target() {
        let target = RecordRef::new("Site_description", RecordKey::profile("KE", 99));
        let err = StoreError::dangling_reference(
            "Morphology_I",
            RecordKey::horizon("KE", 99, 1),
            target.clone(),
        );
        assert_eq!(err.related(), &[target]);
        let display = err.to_string();
        assert!(display.contains("[REJECT] SOIL_DANGLING_REFERENCE"));
        assert!(display.contains("Site_description[KE/99]"));
    }

    #[test]
    fn test_type_mismatch_details() {
        let err = StoreError::type_mismatch(
            "Chemical_properties",
            ValidationDetails::new("phh2o", "value in [0, 14]", "15.2"),
        );
        assert_eq!(err.details().unwrap().field, "phh2o");
        assert!(err.message().contains("phh2o"));
    }

    #[test]
    fn test_unknown_kind_from_schema_error() {
        let err: StoreError = SchemaError::unknown_kind("Nope").into();
        assert_eq!(err.code(), StoreErrorCode::SoilUnknownKind);
        assert_eq!(err.kind(), Some("Nope"));
    }
}
