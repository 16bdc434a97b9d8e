use anyhow::Result;
use parking_lot::Mutex;

use super::RecordSink;
use crate::page_extractor::PageRecord;

/// Keeps emitted records in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<PageRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything pushed so far
    #[must_use]
    pub fn records(&self) -> Vec<PageRecord> {
        self.records.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Take all records out of the sink
    pub fn drain(&self) -> Vec<PageRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl RecordSink for MemorySink {
    async fn push(&self, record: &PageRecord) -> Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
