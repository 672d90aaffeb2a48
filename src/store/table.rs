//! Per-kind row storage
//!
//! Rows live in a key-ordered map. A second map from insertion sequence to
//! key gives insertion-order scans; sequence numbers are never reused.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::Arc;

use crate::record::{KeyValue, Record, RecordKey};
use crate::schema::KindSchema;

use super::index::FieldIndex;

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub seq: u64,
    pub record: Arc<Record>,
}

#[derive(Debug)]
pub(crate) struct Table {
    schema: Arc<KindSchema>,
    rows: BTreeMap<RecordKey, Row>,
    order: BTreeMap<u64, RecordKey>,
    next_seq: u64,
    indexes: HashMap<String, FieldIndex>,
}

impl Table {
    pub fn new(schema: Arc<KindSchema>) -> Self {
        let indexes = schema
            .indexed_fields()
            .map(|f| (f.name.clone(), FieldIndex::new()))
            .collect();
        Self {
            schema,
            rows: BTreeMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
            indexes,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, key: &RecordKey) -> bool {
        self.rows.contains_key(key)
    }

    pub fn get(&self, key: &RecordKey) -> Option<&Arc<Record>> {
        self.rows.get(key).map(|row| &row.record)
    }

    /// Stores a new row; the caller has checked uniqueness
    pub fn insert(&mut self, key: RecordKey, record: Arc<Record>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.put(key, Row { seq, record });
    }

    /// Puts back a row removed earlier, keeping its sequence number
    pub fn restore(&mut self, key: RecordKey, row: Row) {
        self.put(key, row);
    }

    fn put(&mut self, key: RecordKey, row: Row) {
        for (value, index) in self.index_values(&row.record) {
            if let Some(tree) = self.indexes.get_mut(&index) {
                tree.insert(value, key.clone());
            }
        }
        self.order.insert(row.seq, key.clone());
        self.rows.insert(key, row);
    }

    pub fn remove(&mut self, key: &RecordKey) -> Option<Row> {
        let row = self.rows.remove(key)?;
        self.order.remove(&row.seq);
        for (value, index) in self.index_values(&row.record) {
            if let Some(tree) = self.indexes.get_mut(&index) {
                tree.remove(&value, key);
            }
        }
        Some(row)
    }

    fn index_values(&self, record: &Record) -> Vec<(KeyValue, String)> {
        self.schema
            .indexed_fields()
            .filter_map(|def| {
                let value = KeyValue::for_field(record.get(&def.name)?, &def.field_type)?;
                Some((value, def.name.clone()))
            })
            .collect()
    }

    /// Keys holding `value` in an indexed field; None if the field is not indexed
    pub fn lookup(&self, field: &str, value: &KeyValue) -> Option<Vec<RecordKey>> {
        self.indexes.get(field).map(|index| index.lookup_eq(value))
    }

    /// Rows whose key extends `prefix`, in key order
    pub fn prefix<'t>(&'t self, prefix: &'t RecordKey) -> impl Iterator<Item = (&'t RecordKey, &'t Row)> + 't {
        self.rows
            .range((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
    }

    /// First row after `cursor` in key order
    pub fn next_by_key(&self, cursor: Option<&RecordKey>) -> impl Iterator<Item = (&RecordKey, &Row)> {
        let lower = match cursor {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };
        self.rows.range((lower, Bound::Unbounded))
    }

    /// Rows after sequence `cursor` in insertion order
    pub fn next_by_seq(&self, cursor: Option<u64>) -> impl Iterator<Item = (&RecordKey, &Row)> {
        let lower = match cursor {
            Some(seq) => Bound::Excluded(seq),
            None => Bound::Unbounded,
        };
        self.order
            .range((lower, Bound::Unbounded))
            .filter_map(move |(_, key)| self.rows.get_key_value(key))
    }
}
