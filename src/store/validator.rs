//! Record validation against kind declarations
//!
//! Validation semantics:
//! - All required fields are present
//! - No undeclared fields exist
//! - Field types match declared types (ints are accepted for floats)
//! - Numeric values lie within declared ranges, never clamped
//! - Text values match declared patterns
//! - Spectra lie on the declared wavelength grid
//! - Depth intervals have `bot > top`
//!
//! The validator does not mutate records and is deterministic: fields are
//! checked in declaration order and the first failure is reported.

use crate::record::{KeyValue, Record, RecordKey, Value};
use crate::schema::{FieldDef, FieldType, KindSchema, SchemaRegistry};

use super::errors::{StoreError, StoreResult, ValidationDetails};

/// Validates records against the registry's declarations.
pub struct RecordValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> RecordValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a record and returns its primary key.
    ///
    /// # Errors
    ///
    /// Returns SOIL_TYPE_MISMATCH with the offending field.
    pub fn validate(&self, schema: &KindSchema, record: &Record) -> StoreResult<RecordKey> {
        for (name, _) in record.fields() {
            if schema.field(name).is_none() {
                return Err(mismatch(schema, ValidationDetails::extra_field(name)));
            }
        }

        for def in &schema.fields {
            match record.get(&def.name) {
                Some(value) => self.validate_value(schema, def, value)?,
                None if def.required => {
                    return Err(mismatch(schema, ValidationDetails::missing_field(&def.name)));
                }
                None => {}
            }
        }

        if let Some(interval) = &schema.interval {
            if let (Some(top), Some(bot)) = (record.number(&interval.top), record.number(&interval.bot)) {
                if bot <= top {
                    return Err(mismatch(
                        schema,
                        ValidationDetails::new(
                            &interval.bot,
                            format!("value greater than {} ({})", interval.top, top),
                            bot.to_string(),
                        ),
                    ));
                }
            }
        }

        key_of(schema, record)
            .ok_or_else(|| StoreError::internal(format!("{} key could not be built", schema.name)))
    }

    fn validate_value(&self, schema: &KindSchema, def: &FieldDef, value: &Value) -> StoreResult<()> {
        let type_ok = match (&def.field_type, value) {
            (FieldType::Text, Value::Text(_)) => true,
            (FieldType::Int, Value::Int(_)) => true,
            (FieldType::Float, Value::Int(_)) => true,
            (FieldType::Float, Value::Float(f)) => f.is_finite(),
            (FieldType::Date, Value::Date(_)) => true,
            (FieldType::Spectrum { .. }, Value::Spectrum(_)) => true,
            _ => false,
        };
        if !type_ok {
            return Err(mismatch(
                schema,
                ValidationDetails::new(&def.name, def.field_type.type_name(), actual_type(value)),
            ));
        }

        if let Some(range) = def.range {
            let out_of_range = match value {
                Value::Spectrum(s) => s.values().iter().copied().find(|v| !range.contains(*v)),
                other => other.as_f64().filter(|v| !range.contains(*v)),
            };
            if let Some(v) = out_of_range {
                return Err(mismatch(
                    schema,
                    ValidationDetails::new(
                        &def.name,
                        format!("value in [{}, {}]", range.min, range.max),
                        v.to_string(),
                    ),
                ));
            }
        }

        if let (Value::Text(text), Some(regex)) = (value, self.registry.pattern(&schema.name, &def.name)) {
            if !regex.is_match(text) {
                return Err(mismatch(
                    schema,
                    ValidationDetails::new(&def.name, format!("text matching {}", regex), format!("'{}'", text)),
                ));
            }
        }

        if let (FieldType::Spectrum { start_nm, end_nm, step_nm }, Value::Spectrum(s)) = (&def.field_type, value) {
            if !s.matches_grid(*start_nm, *end_nm, *step_nm) {
                return Err(mismatch(
                    schema,
                    ValidationDetails::new(
                        &def.name,
                        format!("{}-{} nm at {} nm", start_nm, end_nm, step_nm),
                        format!(
                            "{}-{} nm at {} nm ({} bands)",
                            s.start_nm(),
                            s.end_nm(),
                            s.step_nm(),
                            s.len()
                        ),
                    ),
                ));
            }
        }

        Ok(())
    }
}

/// Builds the primary key of a record, None if a key field is absent or mistyped
pub fn key_of(schema: &KindSchema, record: &Record) -> Option<RecordKey> {
    schema
        .key_fields()
        .map(|def| KeyValue::for_field(record.get(&def.name)?, &def.field_type))
        .collect::<Option<Vec<_>>>()
        .map(RecordKey::new)
}

/// Re-types the parts of a caller-supplied key to the declared key types,
/// so `RecordKey::new(vec![1.into()])` addresses a float key of `1.0`
pub fn normalize_key(schema: &KindSchema, key: RecordKey) -> RecordKey {
    let types: Vec<&FieldType> = schema.key_fields().map(|d| &d.field_type).collect();
    let parts = key
        .parts()
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, part)| match types.get(i) {
            Some(t) => part.coerce_to(t),
            None => part,
        })
        .collect();
    RecordKey::new(parts)
}

fn actual_type(value: &Value) -> String {
    match value {
        Value::Float(f) if !f.is_finite() => format!("non-finite float {}", f),
        other => other.type_name().to_string(),
    }
}

fn mismatch(schema: &KindSchema, details: ValidationDetails) -> StoreError {
    StoreError::type_mismatch(&schema.name, details)
}
