use std::sync::{Arc, PoisonError, RwLock};

use super::model::NormalizedRecord;

/// Normalized records, most recent first. Equal instants keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<NormalizedRecord>,
}

impl Dataset {
    /// Sort `records` (stable, descending by instant) into a dataset.
    pub fn from_records(mut records: Vec<NormalizedRecord>) -> Self {
        records.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Self { records }
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by its Message URL.
    pub fn find_by_url(&self, url: &str) -> Option<&NormalizedRecord> {
        self.records.iter().find(|r| r.message_url == url)
    }
}

/// Owner of the active dataset.
///
/// Replacement swaps a whole `Arc<Dataset>` under a write lock, so readers
/// holding a snapshot never see a partially replaced dataset.
#[derive(Debug, Clone, Default)]
pub struct DatasetHandle {
    current: Arc<RwLock<Arc<Dataset>>>,
}

impl DatasetHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(dataset))),
        }
    }

    /// Current dataset. Cheap; the snapshot outlives later replacements.
    pub fn snapshot(&self) -> Arc<Dataset> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Atomically install `dataset`, returning the one it replaced.
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let next = Arc::new(dataset);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }
}
