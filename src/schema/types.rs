//! Record kind declarations
//!
//! Supported field types:
//! - text: UTF-8 string, optionally constrained by a pattern
//! - int: 64-bit signed integer
//! - float: 64-bit floating point (integers accepted)
//! - date: calendar date
//! - spectrum: reflectance sequence on a fixed wavelength grid

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Semantic type of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    Text,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Calendar date
    Date,
    /// Wavelength-indexed reflectance sequence
    Spectrum {
        /// First band, in nanometers
        start_nm: u32,
        /// Last band, in nanometers (inclusive)
        end_nm: u32,
        /// Band spacing, in nanometers
        step_nm: u32,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Date => "date",
            FieldType::Spectrum { .. } => "spectrum",
        }
    }

    /// Whether values of this type may participate in a key
    pub fn is_keyable(&self) -> bool {
        !matches!(self, FieldType::Spectrum { .. })
    }

    /// Whether a declared range applies to values of this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Float | FieldType::Spectrum { .. })
    }
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// pH scale
    pub fn ph() -> Self {
        Self::new(0.0, 14.0)
    }

    /// Percentage of a whole
    pub fn percent() -> Self {
        Self::new(0.0, 100.0)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Whether field must be present
    pub required: bool,
    /// Declared numeric bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    /// Regular expression text values must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Whether a secondary index is maintained for this field
    #[serde(default, skip_serializing_if = "is_false")]
    pub indexed: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl FieldDef {
    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            range: None,
            pattern: None,
            indexed: false,
        }
    }

    /// Create an optional field
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }
}

/// What a record kind represents in the soil data model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindRole {
    /// Aggregation root, one row per soil profile
    Profile,
    /// One row per horizon within a profile
    Horizon,
    /// One row per measured depth interval
    DepthInterval,
    /// Per-profile classification and diagnostic annotations
    Annotation,
    /// Physical lab sample rows, independent of the profile hierarchy
    Sample,
    /// Spectral scan of a sample
    Scan,
    /// Climate station
    Station,
    /// Climate series owned by a station
    Climate,
    /// Many-to-many association between two owners
    Link,
    /// Controlled vocabulary, referenced by code value
    Vocabulary,
}

/// How a reference participates in purge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Hierarchical parent; cascades
    Owner,
    /// Association endpoint; cascades
    Link,
    /// Code lookup; always blocks purge of the code
    Vocabulary,
}

impl ReferenceKind {
    pub fn cascades(&self) -> bool {
        !matches!(self, ReferenceKind::Vocabulary)
    }
}

/// One column of a reference tuple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefColumn {
    /// Taken from a local field
    Field(String),
    /// Fixed text, e.g. the attribute name of a shared code table
    Const(String),
}

/// Reference from a kind to the key of another kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Target kind name
    pub target: String,
    /// Columns mapped positionally onto the target key
    pub columns: Vec<RefColumn>,
    pub kind: ReferenceKind,
}

impl Reference {
    pub fn owner(target: impl Into<String>, fields: &[&str]) -> Self {
        Self::from_fields(target, fields, ReferenceKind::Owner)
    }

    pub fn link(target: impl Into<String>, fields: &[&str]) -> Self {
        Self::from_fields(target, fields, ReferenceKind::Link)
    }

    pub fn vocabulary(target: impl Into<String>, columns: Vec<RefColumn>) -> Self {
        Self {
            target: target.into(),
            columns,
            kind: ReferenceKind::Vocabulary,
        }
    }

    fn from_fields(target: impl Into<String>, fields: &[&str], kind: ReferenceKind) -> Self {
        Self {
            target: target.into(),
            columns: fields.iter().map(|f| RefColumn::Field((*f).to_string())).collect(),
            kind,
        }
    }

    /// Local fields read by this reference
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| match c {
            RefColumn::Field(name) => Some(name.as_str()),
            RefColumn::Const(_) => None,
        })
    }
}

/// Depth interval declaration for measurement kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSpec {
    /// Key prefix within which intervals must be disjoint
    pub scope: Vec<String>,
    /// Upper depth field (inclusive)
    pub top: String,
    /// Lower depth field (exclusive)
    pub bot: String,
}

/// Complete declaration of one record kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindSchema {
    /// Unique kind name
    pub name: String,
    pub role: KindRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
    /// Primary key field names
    pub key: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<IntervalSpec>,
}

impl KindSchema {
    pub fn new(name: impl Into<String>, role: KindRole) -> Self {
        Self {
            name: name.into(),
            role,
            description: None,
            fields: Vec::new(),
            key: Vec::new(),
            references: Vec::new(),
            interval: None,
        }
    }

    /// Looks up a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Key field definitions in key order
    pub fn key_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.key.iter().filter_map(move |k| self.field(k))
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.indexed)
    }

    pub fn is_vocabulary(&self) -> bool {
        self.role == KindRole::Vocabulary
    }

    /// Validates the declaration on its own (not against other kinds)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("kind name must not be empty".into());
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(format!("field '{}' declared twice", field.name));
            }
            if field.range.is_some() && !field.field_type.is_numeric() {
                return Err(format!("range declared on non-numeric field '{}'", field.name));
            }
            if let Some(range) = field.range {
                if !(range.min <= range.max) {
                    return Err(format!("empty range on field '{}'", field.name));
                }
            }
            if field.pattern.is_some() && field.field_type != FieldType::Text {
                return Err(format!("pattern declared on non-text field '{}'", field.name));
            }
        }

        if self.key.is_empty() {
            return Err("key must name at least one field".into());
        }
        for name in &self.key {
            let field = self
                .field(name)
                .ok_or_else(|| format!("key field '{}' is not declared", name))?;
            if !field.required {
                return Err(format!("key field '{}' must be required", name));
            }
            if !field.field_type.is_keyable() {
                return Err(format!("key field '{}' has unkeyable type", name));
            }
        }

        for field in self.indexed_fields() {
            if !field.field_type.is_keyable() {
                return Err(format!("indexed field '{}' has unkeyable type", field.name));
            }
        }

        for reference in &self.references {
            if reference.target == self.name {
                return Err("kind must not reference itself".into());
            }
            if reference.columns.is_empty() {
                return Err(format!("reference to '{}' has no columns", reference.target));
            }
            for name in reference.fields() {
                if self.field(name).is_none() {
                    return Err(format!(
                        "reference to '{}' reads undeclared field '{}'",
                        reference.target, name
                    ));
                }
            }
        }

        if let Some(interval) = &self.interval {
            if interval.scope.len() > self.key.len() || interval.scope[..] != self.key[..interval.scope.len()] {
                return Err("interval scope must be a prefix of the key".into());
            }
            for bound in [&interval.top, &interval.bot] {
                let field = self
                    .field(bound)
                    .ok_or_else(|| format!("interval bound '{}' is not declared", bound))?;
                if !matches!(field.field_type, FieldType::Int | FieldType::Float) {
                    return Err(format!("interval bound '{}' must be numeric", bound));
                }
                if !self.key.contains(bound) {
                    return Err(format!("interval bound '{}' must be part of the key", bound));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizon_schema() -> KindSchema {
        let mut schema = KindSchema::new("Morphology_I", KindRole::Horizon);
        schema.fields = vec![
            FieldDef::required("iso", FieldType::Text),
            FieldDef::required("id", FieldType::Int),
            FieldDef::required("hori", FieldType::Int),
            FieldDef::optional("symbol", FieldType::Text),
        ];
        schema.key = vec!["iso".into(), "id".into(), "hori".into()];
        schema.references = vec![Reference::owner("Site_description", &["iso", "id"])];
        schema
    }

    #[test]
    fn test_structure_valid() {
        assert!(horizon_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_key_field_must_be_declared() {
        let mut schema = horizon_schema();
        schema.key.push("top".into());
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("top"));
    }

    #[test]
    fn test_key_field_must_be_required() {
        let mut schema = horizon_schema();
        schema.key = vec!["symbol".into()];
        assert!(schema.validate_structure().unwrap_err().contains("required"));
    }

    #[test]
    fn test_self_reference_rejected() {
        let mut schema = horizon_schema();
        schema.references.push(Reference::owner("Morphology_I", &["iso", "id", "hori"]));
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_interval_scope_must_prefix_key() {
        let mut schema = horizon_schema();
        schema.fields.push(FieldDef::required("top", FieldType::Int));
        schema.fields.push(FieldDef::required("bot", FieldType::Int));
        schema.key = vec!["iso".into(), "id".into(), "hori".into(), "top".into(), "bot".into()];
        schema.interval = Some(IntervalSpec {
            scope: vec!["iso".into(), "hori".into()],
            top: "top".into(),
            bot: "bot".into(),
        });
        assert!(schema.validate_structure().unwrap_err().contains("prefix"));

        schema.interval = Some(IntervalSpec {
            scope: vec!["iso".into(), "id".into(), "hori".into()],
            top: "top".into(),
            bot: "bot".into(),
        });
        assert!(schema.validate_structure().is_ok());
    }

    #[test]
    fn test_range_on_text_rejected() {
        let mut schema = horizon_schema();
        schema.fields[3] = FieldDef::optional("symbol", FieldType::Text).with_range(ValueRange::ph());
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_json_shape() {
        let def = FieldDef::optional("phh2o", FieldType::Float).with_range(ValueRange::ph());
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["type"], "float");
        assert_eq!(json["range"]["max"], 14.0);
        assert!(json.get("indexed").is_none());

        let back: FieldDef = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }
}
