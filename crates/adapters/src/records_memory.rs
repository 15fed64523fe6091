//! In-memory run record store for tests and offline mode

use async_trait::async_trait;
use pagecast_domain::{RecordError, RunRecord, RunRecordStore};
use std::sync::RwLock;

/// Run record store that lives only as long as the process
#[derive(Debug, Default)]
pub struct InMemoryRunRecordStore {
    records: RwLock<Vec<RunRecord>>,
}

impl InMemoryRunRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(error: impl std::fmt::Display) -> RecordError {
    RecordError::Io(std::io::Error::other(error.to_string()))
}

#[async_trait]
impl RunRecordStore for InMemoryRunRecordStore {
    async fn record(&self, record: &RunRecord) -> Result<(), RecordError> {
        let mut records = self.records.write().map_err(poisoned)?;
        records.push(record.clone());
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<RunRecord>, RecordError> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.clone())
    }
}
