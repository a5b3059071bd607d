use async_trait::async_trait;
use dsw_domain::error::Result;
use dsw_domain::ports::{ComparisonRecord, ComparisonStore};
use std::sync::{Mutex, PoisonError};

/// Comparison records kept in memory, oldest first
#[derive(Debug, Default)]
pub struct InMemoryComparisonStore {
    records: Mutex<Vec<ComparisonRecord>>,
}

impl InMemoryComparisonStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every persisted record
    pub fn records(&self) -> Vec<ComparisonRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records whose outcomes differed
    pub fn mismatches(&self) -> Vec<ComparisonRecord> {
        self.records()
            .into_iter()
            .filter(|r| !r.comparison.is_match())
            .collect()
    }

    /// Number of persisted records
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing was persisted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ComparisonStore for InMemoryComparisonStore {
    async fn persist(&self, record: &ComparisonRecord) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}
