//! Getter methods for `ScrapeConfig`
//!
//! Plain accessors plus the derived values (handler timeout, delays as
//! `Duration`s, extraction options).

use std::path::Path;
use std::time::Duration;

use super::types::ScrapeConfig;
use crate::page_extractor::ExtractOptions;
use crate::crawl_engine::OVERLAY_AFFORDANCES;
use crate::utils::constants::{HANDLER_TIMEOUT_GRACE_SECS, SCROLL_TIMEOUT_MS};

impl ScrapeConfig {
    #[must_use]
    pub fn start_urls(&self) -> &[String] {
        &self.start_urls
    }

    #[must_use]
    pub fn max_requests_per_crawl(&self) -> usize {
        self.max_requests_per_crawl
    }

    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Budget for navigation and for the content-loaded signal, each
    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }

    /// Budget for one whole attempt
    #[must_use]
    pub fn handler_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs + HANDLER_TIMEOUT_GRACE_SECS
    }

    #[must_use]
    pub fn scrape_about(&self) -> bool {
        self.scrape_about
    }

    /// Accepted for input compatibility; no extractor reads it yet
    #[must_use]
    pub fn scrape_posts(&self) -> bool {
        self.scrape_posts
    }

    /// Accepted for input compatibility; no extractor reads it yet
    #[must_use]
    pub fn scrape_reviews(&self) -> bool {
        self.scrape_reviews
    }

    #[must_use]
    pub fn user_data(&self) -> &serde_json::Value {
        &self.user_data
    }

    #[must_use]
    pub fn search_run_id(&self) -> Option<&str> {
        self.search_run_id.as_deref()
    }

    #[must_use]
    pub fn debug_log(&self) -> bool {
        self.debug_log
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn overlay_click_timeout(&self) -> Duration {
        Duration::from_millis(self.overlay_click_timeout_ms)
    }

    /// Budget for the whole overlay pass: one click timeout per affordance,
    /// plus one for locating them
    #[must_use]
    pub fn overlay_dismissal_timeout(&self) -> Duration {
        let steps = u32::try_from(OVERLAY_AFFORDANCES.len()).unwrap_or(u32::MAX).saturating_add(1);
        self.overlay_click_timeout().saturating_mul(steps)
    }

    #[must_use]
    pub fn scroll_timeout(&self) -> Duration {
        Duration::from_millis(SCROLL_TIMEOUT_MS)
    }

    #[must_use]
    pub fn retry_backoff_base(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    #[must_use]
    pub fn max_retry_backoff(&self) -> Duration {
        Duration::from_millis(self.max_retry_backoff_ms)
    }

    #[must_use]
    pub fn min_phone_digits(&self) -> usize {
        self.min_phone_digits
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&Path> {
        self.chrome_data_dir.as_deref()
    }

    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            scrape_about: self.scrape_about,
            min_phone_digits: self.min_phone_digits,
        }
    }
}
