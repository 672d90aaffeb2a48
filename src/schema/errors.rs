//! Schema error types
//!
//! Error codes:
//! - SOIL_SCHEMA_INVALID (FATAL)
//! - SOIL_SCHEMA_CONFLICT (FATAL)
//! - SOIL_SCHEMA_IO (FATAL)
//! - SOIL_UNKNOWN_KIND (REJECT)

use std::fmt;

/// Severity levels shared by all soildb error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Caller request rejected, store unchanged
    Reject,
    /// Startup cannot continue
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Kind declaration is structurally invalid
    SoilSchemaInvalid,
    /// Kind redeclared with a different shape
    SoilSchemaConflict,
    /// Schema file could not be read, parsed or written
    SoilSchemaIo,
    /// Kind name not registered
    SoilUnknownKind,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::SoilSchemaInvalid => "SOIL_SCHEMA_INVALID",
            SchemaErrorCode::SoilSchemaConflict => "SOIL_SCHEMA_CONFLICT",
            SchemaErrorCode::SoilSchemaIo => "SOIL_SCHEMA_IO",
            SchemaErrorCode::SoilUnknownKind => "SOIL_UNKNOWN_KIND",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::SoilUnknownKind => Severity::Reject,
            _ => Severity::Fatal,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    kind: Option<String>,
}

impl SchemaError {
    /// Create an invalid declaration error
    pub fn invalid(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            code: SchemaErrorCode::SoilSchemaInvalid,
            message: format!("Kind '{}' is invalid: {}", kind, reason.into()),
            kind: Some(kind),
        }
    }

    /// Create a conflicting redeclaration error
    pub fn conflict(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            code: SchemaErrorCode::SoilSchemaConflict,
            message: format!("Kind '{}' is already registered with a different shape", kind),
            kind: Some(kind),
        }
    }

    /// Create an unknown kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            code: SchemaErrorCode::SoilUnknownKind,
            message: format!("Kind '{}' is not registered", kind),
            kind: Some(kind),
        }
    }

    /// Create an error for an unreadable or malformed schema file
    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::SoilSchemaIo,
            message: format!("Schema file '{}': {}", path.into(), reason.into()),
            kind: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
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

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::SoilSchemaInvalid.code(), "SOIL_SCHEMA_INVALID");
        assert_eq!(SchemaErrorCode::SoilSchemaConflict.code(), "SOIL_SCHEMA_CONFLICT");
        assert_eq!(SchemaErrorCode::SoilSchemaIo.code(), "SOIL_SCHEMA_IO");
        assert_eq!(SchemaErrorCode::SoilUnknownKind.code(), "SOIL_UNKNOWN_KIND");
    }

    #[test]
    fn test_severity_levels() {
        assert!(SchemaError::conflict("Country").is_fatal());
        assert!(SchemaError::invalid("Country", "empty key").is_fatal());
        assert!(!SchemaError::unknown_kind("Nope").is_fatal());
    }

    #[test]
    fn test_display_includes_code_and_kind() {
        let err = SchemaError::unknown_kind("Horizon_X");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("SOIL_UNKNOWN_KIND"));
        assert!(display.contains("Horizon_X"));
        assert_eq!(err.kind(), Some("Horizon_X"));
    }
}
