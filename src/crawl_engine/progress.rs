//! Progress reporting abstraction for crawl operations
//!
//! Defines the `ProgressReporter` trait, a structured event sink receiving
//! `(level, message, attributes)` triples, with provided helpers for the
//! lifecycle events the orchestrator emits. `TracingProgress` forwards to
//! `tracing`; `NoOpProgress` drops everything.

use std::fmt;

/// Severity of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Trait for reporting crawl progress at key lifecycle events
///
/// Only [`report`](ProgressReporter::report) is required; the helpers
/// shape common events into it.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, level: ProgressLevel, message: &str, attributes: &[(&str, String)]);

    /// Report that the browser has launched successfully
    fn report_browser_launched(&self) {
        self.report(ProgressLevel::Info, "Browser launched", &[]);
    }

    /// Report the start of one attempt
    fn report_attempt_started(&self, url: &str, attempt: u32) {
        self.report(
            ProgressLevel::Info,
            "Processing page",
            &[("url", url.to_string()), ("attempt", attempt.to_string())],
        );
    }

    fn report_retry_scheduled(&self, url: &str, attempt: u32, delay_ms: u64, reason: &str) {
        self.report(
            ProgressLevel::Warn,
            "Attempt failed, retrying",
            &[
                ("url", url.to_string()),
                ("attempt", attempt.to_string()),
                ("delay_ms", delay_ms.to_string()),
                ("reason", reason.to_string()),
            ],
        );
    }

    fn report_gave_up(&self, url: &str, attempts: u32, reason: &str) {
        self.report(
            ProgressLevel::Error,
            "Giving up on page",
            &[
                ("url", url.to_string()),
                ("attempts", attempts.to_string()),
                ("reason", reason.to_string()),
            ],
        );
    }

    fn report_record_emitted(&self, url: &str, is_error: bool) {
        self.report(
            ProgressLevel::Debug,
            "Record emitted",
            &[("url", url.to_string()), ("error", is_error.to_string())],
        );
    }

    fn report_sink_failed(&self, url: &str, error: &str) {
        self.report(
            ProgressLevel::Error,
            "Failed to store record",
            &[("url", url.to_string()), ("error", error.to_string())],
        );
    }

    /// Report that the global attempt ceiling stopped further dispatches
    fn report_limit_reached(&self, limit: usize, abandoned: usize) {
        self.report(
            ProgressLevel::Info,
            "Request limit reached",
            &[
                ("max_requests_per_crawl", limit.to_string()),
                ("abandoned", abandoned.to_string()),
            ],
        );
    }

    fn report_completed(&self, succeeded: usize, failed: usize, dispatched: usize) {
        self.report(
            ProgressLevel::Info,
            "Crawl finished",
            &[
                ("succeeded", succeeded.to_string()),
                ("failed", failed.to_string()),
                ("dispatched", dispatched.to_string()),
            ],
        );
    }
}

/// Forwards progress events to `tracing` under the `pagescrape::crawl` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressReporter for TracingProgress {
    fn report(&self, level: ProgressLevel, message: &str, attributes: &[(&str, String)]) {
        let url = attribute(attributes, "url");
        let attributes = Attributes(attributes);
        match level {
            ProgressLevel::Debug => {
                tracing::debug!(target: "pagescrape::crawl", url, attributes = ?attributes, "{message}");
            }
            ProgressLevel::Info => {
                tracing::info!(target: "pagescrape::crawl", url, attributes = ?attributes, "{message}");
            }
            ProgressLevel::Warn => {
                tracing::warn!(target: "pagescrape::crawl", url, attributes = ?attributes, "{message}");
            }
            ProgressLevel::Error => {
                tracing::error!(target: "pagescrape::crawl", url, attributes = ?attributes, "{message}");
            }
        }
    }
}

fn attribute<'a>(attributes: &'a [(&str, String)], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.as_str())
}

/// Event attributes other than `url`, recorded as one map-valued field
struct Attributes<'a>(&'a [(&'a str, String)]);

impl fmt::Debug for Attributes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().filter(|(key, _)| *key != "url").map(|(k, v)| (k, v)))
            .finish()
    }
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report(&self, _level: ProgressLevel, _message: &str, _attributes: &[(&str, String)]) {}
}
