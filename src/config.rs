//! Store configuration
//!
//! A JSON file with every key optional:
//!
//! ```json
//! {
//!   "schema_dir": "./schemas",
//!   "enforce_vocabulary": true,
//!   "default_scan_order": "insertion",
//!   "log": { "level": "info", "json": false }
//! }
//! ```
//!
//! Unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::catalog;
use crate::observability::Event;
use crate::schema::{SchemaError, SchemaLoader, SchemaRegistry};
use crate::store::{RecordStore, ScanOrder, StoreOptions};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive, e.g. "info" or "soildb=debug"
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of text
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory of extra kind declarations loaded after the built-in catalog
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,

    #[serde(default = "default_enforce_vocabulary")]
    pub enforce_vocabulary: bool,

    #[serde(default)]
    pub default_scan_order: ScanOrder,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_enforce_vocabulary() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            schema_dir: None,
            enforce_vocabulary: default_enforce_vocabulary(),
            default_scan_order: ScanOrder::default(),
            log: LogConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Reads and validates a config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: StoreConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!(
            event = Event::ConfigLoaded.as_str(),
            path = %path.display(),
            "config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Invalid("log.level must not be empty".into()));
        }
        if let Some(dir) = &self.schema_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "schema_dir {} is not a directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn options(&self) -> StoreOptions {
        StoreOptions {
            enforce_vocabulary: self.enforce_vocabulary,
            default_scan_order: self.default_scan_order,
        }
    }

    /// Built-in catalog plus the declarations in `schema_dir`
    pub fn build_registry(&self) -> ConfigResult<SchemaRegistry> {
        let mut registry = catalog::registry()?;
        info!(
            event = Event::CatalogRegistered.as_str(),
            kinds = registry.len(),
            "catalog registered"
        );

        if let Some(dir) = &self.schema_dir {
            let files = SchemaLoader::new(dir).load_into(&mut registry)?;
            info!(
                event = Event::SchemasLoaded.as_str(),
                dir = %dir.display(),
                files,
                kinds = registry.len(),
                "schemas loaded"
            );
        }
        Ok(registry)
    }

    /// An empty store over `build_registry`
    pub fn open_store(&self) -> ConfigResult<RecordStore> {
        let registry = self.build_registry()?;
        Ok(RecordStore::with_options(Arc::new(registry), self.options()))
    }
}
