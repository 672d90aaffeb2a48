//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::schema::SchemaError;
use crate::store::StoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable code string for scripted callers
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "SOIL_CLI_CONFIG_ERROR",
            Self::Schema(e) => e.code().code(),
            Self::Store(e) => e.code().code(),
            Self::Io(_) => "SOIL_CLI_IO_ERROR",
            Self::Json(_) => "SOIL_CLI_JSON_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err: CliError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.code_str(), "SOIL_CLI_IO_ERROR");
        assert_eq!(err.to_string(), "I/O error: gone");

        let err: CliError = SchemaError::unknown_kind("Horizon_X").into();
        assert_eq!(err.code_str(), "SOIL_UNKNOWN_KIND");
    }
}
