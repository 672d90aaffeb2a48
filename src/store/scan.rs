//! Lazy record scans
//!
//! A scan holds only a cursor. Each step takes the table's read lock, finds
//! the next matching row after the cursor and releases the lock. Rows
//! inserted while a scan is open are seen if they sort after the cursor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordKey};

use super::filter::Filter;
use super::store::RecordStore;

/// Scan order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanOrder {
    /// Order of successful inserts
    #[default]
    Insertion,
    /// Primary key order
    Key,
}

#[derive(Debug, Clone, PartialEq)]
enum Cursor {
    Start,
    Seq(u64),
    Key(RecordKey),
    Done,
}

/// Restartable iterator over the records of one kind matching a filter
pub struct Scan<'s> {
    store: &'s RecordStore,
    kind: String,
    filter: Filter,
    order: ScanOrder,
    cursor: Cursor,
}

impl<'s> Scan<'s> {
    pub(crate) fn new(store: &'s RecordStore, kind: String, filter: Filter, order: ScanOrder) -> Self {
        Self {
            store,
            kind,
            filter,
            order,
            cursor: Cursor::Start,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn order(&self) -> ScanOrder {
        self.order
    }

    /// Rewinds to the first record
    pub fn restart(&mut self) {
        self.cursor = Cursor::Start;
    }

    fn step(&self) -> Option<(Cursor, RecordKey, Arc<Record>)> {
        let filter = &self.filter;
        self.store
            .with_table(&self.kind, |table| match (&self.order, &self.cursor) {
                (_, Cursor::Done) => None,
                (ScanOrder::Insertion, cursor) => {
                    let after = match cursor {
                        Cursor::Seq(seq) => Some(*seq),
                        _ => None,
                    };
                    table
                        .next_by_seq(after)
                        .find(|(_, row)| filter.matches(&row.record))
                        .map(|(key, row)| (Cursor::Seq(row.seq), key.clone(), Arc::clone(&row.record)))
                }
                (ScanOrder::Key, cursor) => {
                    let after = match cursor {
                        Cursor::Key(key) => Some(key),
                        _ => None,
                    };
                    table
                        .next_by_key(after)
                        .find(|(_, row)| filter.matches(&row.record))
                        .map(|(key, row)| (Cursor::Key(key.clone()), key.clone(), Arc::clone(&row.record)))
                }
            })
            .ok()
            .flatten()
    }
}

impl Iterator for Scan<'_> {
    type Item = (RecordKey, Arc<Record>);

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Some((cursor, key, record)) => {
                self.cursor = cursor;
                Some((key, record))
            }
            None => {
                self.cursor = Cursor::Done;
                None
            }
        }
    }
}
