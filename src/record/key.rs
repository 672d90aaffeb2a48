//! Record keys
//!
//! A key is an ordered tuple of key values. Tuples compare lexicographically,
//! so a key prefix sorts immediately before every key extending it and a
//! prefix range walks one profile, horizon or station in key order.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::schema::FieldType;

/// One component of a key.
///
/// Floats are stored as order-preserving bits so keys have a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeyValue {
    Int(i64),
    Float(u64),
    Date(NaiveDate),
    Text(String),
}

impl KeyValue {
    /// Create a key from a float
    ///
    /// Uses bit representation for total ordering. `-0.0` keys as `0.0`.
    pub fn from_float(v: f64) -> Self {
        let v = if v == 0.0 { 0.0 } else { v };
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits // Negative: flip all bits
        } else {
            bits ^ (1 << 63) // Positive: flip sign bit
        };
        KeyValue::Float(ordered)
    }

    /// Create a key for a field of a declared type.
    ///
    /// Integers stored in float fields key as floats, so `2` and `2.0`
    /// address the same row. Returns None when the value cannot key that type.
    pub fn for_field(value: &Value, field_type: &FieldType) -> Option<Self> {
        match (field_type, value) {
            (FieldType::Text, Value::Text(s)) => Some(KeyValue::Text(s.clone())),
            (FieldType::Int, Value::Int(i)) => Some(KeyValue::Int(*i)),
            (FieldType::Float, v) => v.as_f64().map(KeyValue::from_float),
            (FieldType::Date, Value::Date(d)) => Some(KeyValue::Date(*d)),
            _ => None,
        }
    }

    /// Converts back to the value it was built from
    pub fn to_value(&self) -> Value {
        match self {
            KeyValue::Int(i) => Value::Int(*i),
            KeyValue::Float(bits) => Value::Float(Self::float_from_bits(*bits)),
            KeyValue::Date(d) => Value::Date(*d),
            KeyValue::Text(s) => Value::Text(s.clone()),
        }
    }

    fn float_from_bits(ordered: u64) -> f64 {
        let bits = if (ordered >> 63) == 1 {
            ordered ^ (1 << 63)
        } else {
            !ordered
        };
        f64::from_bits(bits)
    }

    /// Re-types an int component for a float key field
    pub(crate) fn coerce_to(self, field_type: &FieldType) -> Self {
        match (field_type, self) {
            (FieldType::Float, KeyValue::Int(i)) => KeyValue::from_float(i as f64),
            (_, other) => other,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::Float(bits) => write!(f, "{}", Self::float_from_bits(*bits)),
            KeyValue::Date(d) => write!(f, "{}", d),
            KeyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(v: &str) -> Self {
        KeyValue::Text(v.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(v: String) -> Self {
        KeyValue::Text(v)
    }
}

impl From<i32> for KeyValue {
    fn from(v: i32) -> Self {
        KeyValue::Int(v as i64)
    }
}

impl From<i64> for KeyValue {
    fn from(v: i64) -> Self {
        KeyValue::Int(v)
    }
}

impl From<f64> for KeyValue {
    fn from(v: f64) -> Self {
        KeyValue::from_float(v)
    }
}

impl From<NaiveDate> for KeyValue {
    fn from(v: NaiveDate) -> Self {
        KeyValue::Date(v)
    }
}

/// Primary key of a record, in declared key-field order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey(Vec<KeyValue>);

impl RecordKey {
    pub fn new(parts: Vec<KeyValue>) -> Self {
        Self(parts)
    }

    /// `(iso, id)` key of a profile or station
    pub fn profile(iso: &str, id: i64) -> Self {
        Self(vec![iso.into(), id.into()])
    }

    /// `(iso, id, hori)` key of a horizon
    pub fn horizon(iso: &str, id: i64, hori: i64) -> Self {
        Self(vec![iso.into(), id.into(), hori.into()])
    }

    /// Single text key, e.g. a sample number or country code
    pub fn text(code: &str) -> Self {
        Self(vec![code.into()])
    }

    pub fn parts(&self) -> &[KeyValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &RecordKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The first `n` components
    pub fn prefix(&self, n: usize) -> RecordKey {
        RecordKey(self.0[..n.min(self.0.len())].to_vec())
    }

    /// Appends a component
    pub fn push(mut self, part: impl Into<KeyValue>) -> Self {
        self.0.push(part.into());
        self
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl From<Vec<KeyValue>> for RecordKey {
    fn from(parts: Vec<KeyValue>) -> Self {
        Self(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_ordering() {
        let mut keys = vec![
            KeyValue::from_float(2.5),
            KeyValue::from_float(-1.0),
            KeyValue::from_float(0.0),
            KeyValue::from_float(10.0),
        ];
        keys.sort();
        let values: Vec<f64> = keys.iter().filter_map(|k| k.to_value().as_f64()).collect();
        assert_eq!(values, vec![-1.0, 0.0, 2.5, 10.0]);
    }

    #[test]
    fn test_signed_zero_keys_once() {
        assert_eq!(KeyValue::from_float(-0.0), KeyValue::from_float(0.0));
        assert_eq!(KeyValue::from_float(-0.0).to_value().as_f64(), Some(0.0));
    }

    #[test]
    fn test_int_keys_as_float_field() {
        let a = KeyValue::for_field(&Value::Int(4), &FieldType::Float).unwrap();
        let b = KeyValue::for_field(&Value::Float(4.0), &FieldType::Float).unwrap();
        assert_eq!(a, b);
        assert_eq!(KeyValue::Int(4).coerce_to(&FieldType::Float), b);
    }

    #[test]
    fn test_for_field_rejects_wrong_type() {
        assert!(KeyValue::for_field(&Value::Float(1.5), &FieldType::Int).is_none());
        assert!(KeyValue::for_field(&Value::Int(1), &FieldType::Text).is_none());
    }

    #[test]
    fn test_prefix_sorts_before_extensions() {
        let profile = RecordKey::profile("KE", 1);
        let h1 = RecordKey::horizon("KE", 1, 1);
        let h2 = RecordKey::horizon("KE", 1, 2);
        let other = RecordKey::profile("KE", 2);

        assert!(profile < h1);
        assert!(h1 < h2);
        assert!(h2 < other);
        assert!(h2.starts_with(&profile));
        assert!(!other.starts_with(&profile));
        assert_eq!(h2.prefix(2), profile);
    }

    #[test]
    fn test_display() {
        let key = RecordKey::horizon("KE", 12, 3).push(10).push(20);
        assert_eq!(key.to_string(), "KE/12/3/10/20");
    }
}
