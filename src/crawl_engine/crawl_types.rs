//! Core types for page crawling operations.
//!
//! This module contains the error type shared by the whole crate, the queue
//! item the orchestrator moves between states, and the failure
//! classification used to size retry backoff.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for crawl operations
#[derive(Debug, Clone, Error)]
pub enum CrawlError {
    /// Invalid or empty run configuration; fatal before any crawling
    #[error("Configuration error: {0}")]
    Config(String),

    /// A bounded browser operation did not finish in time
    #[error("{operation} timeout after {secs} seconds")]
    NavigationTimeout { operation: String, secs: u64 },

    /// Browser launch or CDP failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Retries exhausted for one URL
    #[error("Gave up on {url} after {attempts} attempts: {last_error}")]
    AttemptExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    /// Record sink failure
    #[error("Sink error: {0}")]
    Sink(String),

    /// Other errors
    #[error("Crawl error: {0}")]
    Other(String),
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// One URL waiting in the crawl queue
///
/// `attempt` is the number the next dispatch will carry (1 for the initial
/// attempt). `last_error` is only set once an attempt has failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlQueue {
    pub url: String,
    pub attempt: u32,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl CrawlQueue {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attempt: 1,
            last_error: None,
        }
    }

    /// Queue item for the attempt after a failure
    #[must_use]
    pub fn next_attempt(&self, reason: impl Into<String>) -> Self {
        Self {
            url: self.url.clone(),
            attempt: self.attempt + 1,
            last_error: Some(reason.into()),
        }
    }

    /// Whether this URL has already been dispatched at least once
    #[must_use]
    pub fn is_retry(&self) -> bool {
        self.attempt > 1
    }
}

/// Transient record of one dispatch, owned by the orchestrator
#[derive(Debug, Clone)]
pub struct CrawlAttempt {
    pub url: String,
    pub attempt_number: u32,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl CrawlAttempt {
    #[must_use]
    pub fn start(item: &CrawlQueue) -> Self {
        Self {
            url: item.url.clone(),
            attempt_number: item.attempt,
            started_at: chrono::Utc::now(),
        }
    }
}

/// Categorizes attempt failures for retry backoff sizing
///
/// Every kind is retried; the kind only stretches or shrinks the delay
/// before the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Navigation or content-loaded signal exceeded its budget
    Timeout,
    /// Network-level failure (DNS, connection refused, reset)
    Network,
    /// Browser/page failure (crash, closed target, CDP error)
    Browser,
    /// Unknown/unclassified error
    Unknown,
}

impl FailureKind {
    /// Classify an error into a failure kind based on its message chain
    #[must_use]
    pub fn classify(error: &anyhow::Error) -> Self {
        if let Some(CrawlError::NavigationTimeout { .. }) = error.downcast_ref::<CrawlError>() {
            return Self::Timeout;
        }

        let msg = format!("{error:#}").to_lowercase();

        if msg.contains("timeout") || msg.contains("timed out") {
            return Self::Timeout;
        }

        if msg.contains("connection refused")
            || msg.contains("connection reset")
            || msg.contains("dns")
            || msg.contains("net::err")
            || msg.contains("unreachable")
        {
            return Self::Network;
        }

        if msg.contains("browser")
            || msg.contains("chrome")
            || msg.contains("cdp")
            || msg.contains("target")
            || msg.contains("session")
        {
            return Self::Browser;
        }

        Self::Unknown
    }

    /// Base delay multiplier for this failure kind
    #[must_use]
    pub const fn delay_multiplier(&self) -> f64 {
        match self {
            Self::Timeout | Self::Unknown => 1.0,
            Self::Network => 1.5,
            Self::Browser => 2.0,
        }
    }
}

/// Delay before the retry that follows a failed `attempt`
///
/// Doubles per attempt from `base`, scaled by the failure kind, capped at
/// `cap`. A zero base disables backoff entirely.
#[must_use]
pub fn retry_backoff(base: Duration, attempt: u32, kind: FailureKind, cap: Duration) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }

    let exponent = attempt.saturating_sub(1).min(16);
    let millis = base.as_millis() as f64 * f64::from(1u32 << exponent) * kind.delay_multiplier();
    let delay = Duration::from_millis(millis.round() as u64);
    delay.min(cap)
}

/// Final counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlSummary {
    /// Attempts dispatched (initial and retries)
    pub dispatched: usize,
    /// URLs that ended with a success record
    pub succeeded: usize,
    /// URLs that ended with an error record
    pub failed: usize,
    /// Retries scheduled
    pub retries: usize,
    /// URLs never dispatched because the attempt ceiling was reached
    pub abandoned: usize,
    /// Records the sink refused
    pub sink_errors: usize,
}

impl CrawlSummary {
    /// Records handed to the sink (successful or not)
    #[must_use]
    pub fn records_emitted(&self) -> usize {
        self.succeeded + self.failed
    }
}
