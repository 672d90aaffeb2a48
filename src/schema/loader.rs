//! Schema loader for kind declarations stored on disk
//!
//! - One JSON file per kind: `<schema_dir>/kind_<name>.json`
//! - Files load in file-name order so reference targets can be declared first
//! - Existing files are never overwritten

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::registry::SchemaRegistry;
use super::types::KindSchema;

/// Reads and writes kind declarations in a schema directory.
pub struct SchemaLoader {
    schema_dir: PathBuf,
}

impl SchemaLoader {
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `*.json` file into the registry.
    ///
    /// A missing directory loads nothing. Returns the number of files read.
    pub fn load_into(&self, registry: &mut SchemaRegistry) -> SchemaResult<usize> {
        if !self.schema_dir.exists() {
            return Ok(0);
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::io(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::io(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let kind = Self::read_kind_file(path)?;
            registry.register(kind)?;
        }

        Ok(paths.len())
    }

    fn read_kind_file(path: &Path) -> SchemaResult<KindSchema> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::io(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            SchemaError::io(path.display().to_string(), format!("Invalid JSON: {}", e))
        })
    }

    /// Writes one kind declaration, refusing to replace an existing file.
    pub fn save(&self, kind: &KindSchema) -> SchemaResult<PathBuf> {
        self.save_as(kind, &format!("kind_{}.json", kind.name))
    }

    /// Writes a kind under an explicit file name (used to keep load order).
    pub fn save_as(&self, kind: &KindSchema, file_name: &str) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(file_name);

        if path.exists() {
            return Err(SchemaError::io(
                path.display().to_string(),
                "File already exists",
            ));
        }

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::io(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(kind).map_err(|e| {
            SchemaError::io(path.display().to_string(), format!("Failed to serialize: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            SchemaError::io(path.display().to_string(), format!("Failed to write file: {}", e))
        })?;

        Ok(path)
    }
}
