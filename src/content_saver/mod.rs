//! Record sinks
//!
//! Emitted records go through [`RecordSink`]; the orchestrator never knows
//! where they end up.

use anyhow::Result;
use std::future::Future;

use crate::page_extractor::PageRecord;

// Module declarations
mod json_saver;
mod memory;

pub use json_saver::JsonLinesSink;
pub use memory::MemorySink;

/// Append-only destination for emitted records
pub trait RecordSink: Send + Sync {
    /// Persist one record
    fn push(&self, record: &PageRecord) -> impl Future<Output = Result<()>> + Send;
}
