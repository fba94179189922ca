//! Result aggregation
//!
//! Workers append records concurrently; the final collection holds exactly
//! one record per input entry, production dependencies first, then by name.

use crate::domain::{DependencyEntry, ResultRecord};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Note attached to entries whose processing never produced a record
pub(crate) const LOST_NOTE: &str = "processing aborted";

/// Shared, append-only result collection
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Mutex<Vec<ResultRecord>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record
    pub async fn push(&self, record: ResultRecord) {
        self.records.lock().await.push(record);
    }

    /// Number of records collected so far
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Finish aggregation for the given input entries
    ///
    /// Any entry without a record gets a failure record, so the output size
    /// always matches the input size.
    pub async fn finish(&self, entries: &[DependencyEntry]) -> Vec<ResultRecord> {
        let mut records = std::mem::take(&mut *self.records.lock().await);

        let mut produced: HashMap<(&str, bool), usize> = HashMap::new();
        for record in &records {
            *produced.entry((record.name.as_str(), record.is_dev)).or_default() += 1;
        }

        let mut missing = Vec::new();
        for entry in entries {
            match produced.get_mut(&(entry.name.as_str(), entry.is_dev)) {
                Some(count) if *count > 0 => *count -= 1,
                _ => missing.push(ResultRecord::failed(entry, LOST_NOTE)),
            }
        }
        drop(produced);
        records.extend(missing);

        sort_records(&mut records);
        records
    }
}

/// Stable sort: non-dev before dev, then by name
///
/// Names compare by their UTF-8 bytes, so uppercase sorts before lowercase
/// (`Zed` before `jest`) and the order is the same on every machine.
pub fn sort_records(records: &mut [ResultRecord]) {
    records.sort_by(|a, b| a.is_dev.cmp(&b.is_dev).then_with(|| a.name.cmp(&b.name)));
}
