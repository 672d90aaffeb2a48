//! Scan filters
//!
//! A filter is a conjunction of field predicates. No expressions, no
//! disjunction. A missing field never matches.

use std::cmp::Ordering;

use crate::record::{Record, Value};

/// Filter operation types
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    /// Equality: field = value
    Eq(Value),
    /// Greater than or equal: field >= value
    Gte(Value),
    /// Greater than: field > value
    Gt(Value),
    /// Less than or equal: field <= value
    Lte(Value),
    /// Less than: field < value
    Lt(Value),
}

impl FilterOp {
    /// Returns the operation name for log output
    pub fn op_name(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "eq",
            FilterOp::Gte(_) => "gte",
            FilterOp::Gt(_) => "gt",
            FilterOp::Lte(_) => "lte",
            FilterOp::Lt(_) => "lt",
        }
    }
}

/// A single predicate (field + operation)
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub op: FilterOp,
}

impl Predicate {
    pub fn new(field: impl Into<String>, op: FilterOp) -> Self {
        Self {
            field: field.into(),
            op,
        }
    }

    /// Checks a record against this predicate
    pub fn matches(&self, record: &Record) -> bool {
        let actual = match record.get(&self.field) {
            Some(v) => v,
            None => return false,
        };

        let (bound, accept): (&Value, fn(Ordering) -> bool) = match &self.op {
            FilterOp::Eq(v) => (v, Ordering::is_eq),
            FilterOp::Gte(v) => (v, Ordering::is_ge),
            FilterOp::Gt(v) => (v, Ordering::is_gt),
            FilterOp::Lte(v) => (v, Ordering::is_le),
            FilterOp::Lt(v) => (v, Ordering::is_lt),
        };

        compare(actual, bound).map(accept).unwrap_or(false)
    }
}

/// Orders two values of comparable types.
///
/// Numbers compare numerically (ints widen), text lexicographically and dates
/// chronologically. Anything else, spectra included, is incomparable.
fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
    match (actual, bound) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

/// Conjunction of predicates; the empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    /// Matches every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(Predicate::new(field, FilterOp::Eq(value.into())))
    }

    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(Predicate::new(field, FilterOp::Gt(value.into())))
    }

    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(Predicate::new(field, FilterOp::Gte(value.into())))
    }

    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(Predicate::new(field, FilterOp::Lt(value.into())))
    }

    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(Predicate::new(field, FilterOp::Lte(value.into())))
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Checks if a record matches all predicates
    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }
}
