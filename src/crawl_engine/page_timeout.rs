//! Timeout utilities for page operations
//!
//! Wraps browser operations so a hung navigation or a page that never
//! signals readiness turns into a typed, retryable attempt failure instead
//! of stalling a worker slot.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use super::crawl_types::CrawlError;

/// Run `operation` with an explicit deadline
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err` - Either the operation failed, or the deadline passed; the latter
///   carries a `CrawlError::NavigationTimeout` so callers can downcast it
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(CrawlError::NavigationTimeout {
            operation: operation_name.to_string(),
            secs: timeout_secs,
        }
        .into()),
    }
}
