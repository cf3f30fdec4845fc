//! Store: the session's ordered, append-only collection of [`CallRecord`] values.
//!
//! The store is the single source of truth; the UI reads from it, never from
//! an import directly. Records can be appended or dropped all at once, never
//! edited in place.

use crate::normalizer::IngestBatch;
use crate::types::{CallRecord, Source};

#[derive(Debug, Clone, Default)]
pub struct CallStore {
    records: Vec<CallRecord>,
}

impl CallStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. `call_id` collisions are not checked.
    pub fn append(&mut self, record: CallRecord) {
        tracing::debug!(call_id = %record.call_id, source = %record.source, "store: append");
        self.records.push(record);
    }

    /// Append every record of a batch, in batch order. Returns how many were added.
    pub fn extend(&mut self, batch: IngestBatch) -> usize {
        let added = batch.records.len();
        self.records.extend(batch.records);
        tracing::debug!(added, total = self.records.len(), "store: extend");
        added
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        tracing::debug!(dropped = self.records.len(), "store: clear");
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sequence index handed to the manual normalizer (the current size).
    pub fn next_manual_index(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, index: usize) -> Option<&CallRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CallRecord> {
        self.records.iter()
    }

    pub fn stats(&self) -> Stats {
        Stats::from_records(&self.records)
    }
}

impl<'a> IntoIterator for &'a CallStore {
    type Item = &'a CallRecord;
    type IntoIter = std::slice::Iter<'a, CallRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Aggregate figures shown above the call table.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    pub count: usize,
    pub total_cost: f64,
    pub manual: usize,
    pub json_upload: usize,
    pub google_sheets: usize,
}

impl Stats {
    pub fn from_records(records: &[CallRecord]) -> Self {
        records.iter().fold(Stats::default(), |mut acc, r| {
            acc.count += 1;
            acc.total_cost += r.cost;
            match r.source {
                Source::Manual => acc.manual += 1,
                Source::JsonUpload => acc.json_upload += 1,
                Source::GoogleSheets => acc.google_sheets += 1,
            }
            acc
        })
    }

    pub fn by_source(&self, source: Source) -> usize {
        match source {
            Source::Manual => self.manual,
            Source::JsonUpload => self.json_upload,
            Source::GoogleSheets => self.google_sheets,
        }
    }
}
