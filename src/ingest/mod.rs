//! Ingestion boundary
//!
//! File parsing lives outside the crate. An adapter hands the store
//! `(kind, record)` pairs already typed per the registry; `ingest` inserts
//! them and reports the outcome of every record.

use serde::Serialize;
use tracing::{info, warn};

use crate::observability::Event;
use crate::record::{Record, RecordKey};
use crate::store::{RecordStore, StoreError, StoreErrorCode};

/// Source of typed records
pub trait RecordSource {
    /// Next `(kind, record)` pair, None when exhausted
    fn next_record(&mut self) -> Option<(String, Record)>;
}

impl<I> RecordSource for I
where
    I: Iterator<Item = (String, Record)>,
{
    fn next_record(&mut self) -> Option<(String, Record)> {
        self.next()
    }
}

/// What to do after a rejected record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchPolicy {
    /// Keep inserting valid sibling rows
    #[default]
    ContinueOnError,
    /// Stop at the first rejection
    StopOnFirstError,
}

/// Result for one record of a batch
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    Inserted { kind: String, key: RecordKey },
    Rejected { kind: String, error: StoreError },
}

impl RecordOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, RecordOutcome::Inserted { .. })
    }

    pub fn kind(&self) -> &str {
        match self {
            RecordOutcome::Inserted { kind, .. } | RecordOutcome::Rejected { kind, .. } => kind,
        }
    }
}

/// Per-record report of one batch, in source order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RecordOutcome>,
    /// True if the batch stopped before the source was exhausted
    pub halted: bool,
}

/// Counts of a report, for logging and display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub inserted: usize,
    pub rejected: usize,
    pub halted: bool,
}

impl BatchReport {
    pub fn inserted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_inserted()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.inserted()
    }

    /// Rejections, in source order
    pub fn errors(&self) -> impl Iterator<Item = &StoreError> {
        self.outcomes.iter().filter_map(|o| match o {
            RecordOutcome::Rejected { error, .. } => Some(error),
            RecordOutcome::Inserted { .. } => None,
        })
    }

    /// Rejections carrying the given code
    pub fn count_code(&self, code: StoreErrorCode) -> usize {
        self.errors().filter(|e| e.code() == code).count()
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            inserted: self.inserted(),
            rejected: self.rejected(),
            halted: self.halted,
        }
    }
}

/// Inserts every record of `source` into `store`.
///
/// Each record is all-or-nothing on its own; a rejection never undoes
/// earlier inserts of the batch.
pub fn ingest<S: RecordSource>(store: &RecordStore, mut source: S, policy: BatchPolicy) -> BatchReport {
    info!(event = Event::IngestBegin.as_str(), policy = ?policy, "ingest begin");
    let mut report = BatchReport::default();

    while let Some((kind, record)) = source.next_record() {
        match store.insert(&kind, record) {
            Ok(key) => report.outcomes.push(RecordOutcome::Inserted { kind, key }),
            Err(error) => {
                let stop = policy == BatchPolicy::StopOnFirstError;
                report.outcomes.push(RecordOutcome::Rejected { kind, error });
                if stop {
                    report.halted = true;
                    break;
                }
            }
        }
    }

    let summary = report.summary();
    if report.halted {
        warn!(
            event = Event::IngestHalted.as_str(),
            inserted = summary.inserted,
            rejected = summary.rejected,
            "ingest halted at first error"
        );
    } else {
        info!(
            event = Event::IngestComplete.as_str(),
            inserted = summary.inserted,
            rejected = summary.rejected,
            "ingest complete"
        );
    }
    report
}
