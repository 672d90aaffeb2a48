//! Schema registry
//!
//! Holds every record kind declaration. Built once at startup (catalog plus
//! optional schema files) and shared read-only afterwards.

use std::collections::HashMap;

use regex::Regex;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldType, KindSchema, RefColumn};

/// Registry of record kinds, in registration order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    kinds: Vec<KindSchema>,
    by_name: HashMap<String, usize>,
    /// Compiled text patterns keyed by (kind, field)
    patterns: HashMap<(String, String), Regex>,
    /// Kinds referencing a given kind
    dependents: HashMap<String, Vec<String>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind.
    ///
    /// Redeclaring an identical kind is a no-op. Fails with SOIL_SCHEMA_CONFLICT
    /// if the kind exists with a different shape, and SOIL_SCHEMA_INVALID if the
    /// declaration is malformed or references an unknown kind.
    pub fn register(&mut self, kind: KindSchema) -> SchemaResult<()> {
        if let Some(existing) = self.get(&kind.name) {
            if *existing == kind {
                return Ok(());
            }
            return Err(SchemaError::conflict(&kind.name));
        }

        kind.validate_structure()
            .map_err(|e| SchemaError::invalid(&kind.name, e))?;

        for reference in &kind.references {
            let target = self.get(&reference.target).ok_or_else(|| {
                SchemaError::invalid(
                    &kind.name,
                    format!("reference target '{}' is not registered", reference.target),
                )
            })?;

            if reference.columns.len() != target.key.len() {
                return Err(SchemaError::invalid(
                    &kind.name,
                    format!(
                        "reference to '{}' has {} columns, target key has {}",
                        target.name,
                        reference.columns.len(),
                        target.key.len()
                    ),
                ));
            }

            for (column, target_field) in reference.columns.iter().zip(target.key_fields()) {
                let compatible = match column {
                    RefColumn::Const(_) => target_field.field_type == FieldType::Text,
                    RefColumn::Field(name) => {
                        let local = kind.field(name).map(|f| &f.field_type);
                        match (local, &target_field.field_type) {
                            (Some(FieldType::Int), FieldType::Float) => true,
                            (Some(local), target_type) => local == target_type,
                            (None, _) => false,
                        }
                    }
                };
                if !compatible {
                    return Err(SchemaError::invalid(
                        &kind.name,
                        format!(
                            "reference to '{}' does not match key field '{}'",
                            target.name, target_field.name
                        ),
                    ));
                }
            }
        }

        let mut compiled = Vec::new();
        for field in &kind.fields {
            if let Some(pattern) = &field.pattern {
                let regex = Regex::new(pattern).map_err(|e| {
                    SchemaError::invalid(&kind.name, format!("pattern on '{}': {}", field.name, e))
                })?;
                compiled.push(((kind.name.clone(), field.name.clone()), regex));
            }
        }
        self.patterns.extend(compiled);

        for reference in &kind.references {
            let entry = self.dependents.entry(reference.target.clone()).or_default();
            if !entry.contains(&kind.name) {
                entry.push(kind.name.clone());
            }
        }

        self.by_name.insert(kind.name.clone(), self.kinds.len());
        self.kinds.push(kind);
        Ok(())
    }

    /// Returns the declaration of a kind.
    pub fn describe(&self, name: &str) -> SchemaResult<&KindSchema> {
        self.get(name).ok_or_else(|| SchemaError::unknown_kind(name))
    }

    pub fn get(&self, name: &str) -> Option<&KindSchema> {
        self.by_name.get(name).map(|&i| &self.kinds[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &KindSchema> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Kinds declaring a reference to `name`
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.dependents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Compiled pattern for a text field, if one is declared
    pub fn pattern(&self, kind: &str, field: &str) -> Option<&Regex> {
        self.patterns.get(&(kind.to_string(), field.to_string()))
    }
}
