//! Core configuration types for page scraping
//!
//! `ActorInput` is the raw, serde-deserialized run input; `ScrapeConfig` is
//! the validated, immutable configuration the orchestrator and the page
//! handler receive by reference.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_REQUESTS_PER_CRAWL, DEFAULT_MAX_RETRIES,
    DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
};

/// Main configuration struct for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Normalized start URLs in input order (duplicates are kept here and
    /// collapsed by the orchestrator)
    pub(crate) start_urls: Vec<String>,
    /// Global ceiling on dispatched attempts, retries included
    pub(crate) max_requests_per_crawl: usize,
    pub(crate) max_concurrency: usize,
    pub(crate) max_retries: u32,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) scrape_about: bool,
    pub(crate) scrape_posts: bool,
    pub(crate) scrape_reviews: bool,
    /// Caller payload, forwarded untouched
    pub(crate) user_data: serde_json::Value,
    /// Correlation id lifted out of `user_data.search_run_id`
    pub(crate) search_run_id: Option<String>,
    pub(crate) debug_log: bool,
    pub(crate) headless: bool,
    pub(crate) settle_delay_ms: u64,
    pub(crate) overlay_click_timeout_ms: u64,
    /// Delay before the first retry; doubles for each later one
    pub(crate) retry_backoff_ms: u64,
    pub(crate) max_retry_backoff_ms: u64,
    pub(crate) min_phone_digits: usize,
    /// Chrome profile directory; a scratch dir removed after the run when unset
    pub(crate) chrome_data_dir: Option<PathBuf>,
}

/// One `startUrls` entry: a plain string or a `{ "url": ... }` request object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StartUrlEntry {
    Url(String),
    Request { url: String },
}

impl StartUrlEntry {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(url) | Self::Request { url } => url,
        }
    }
}

/// Raw run input, as read from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActorInput {
    pub start_urls: Vec<StartUrlEntry>,
    pub max_requests_per_crawl: usize,
    pub max_concurrency: usize,
    pub max_retries: u32,
    pub page_load_timeout_secs: u64,
    pub scrape_about: bool,
    pub scrape_posts: bool,
    pub scrape_reviews: bool,
    pub user_data: serde_json::Value,
    pub debug_log: bool,
    pub headless: bool,
}

impl Default for ActorInput {
    fn default() -> Self {
        Self {
            start_urls: Vec::new(),
            max_requests_per_crawl: DEFAULT_MAX_REQUESTS_PER_CRAWL,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            scrape_about: true,
            scrape_posts: false,
            scrape_reviews: false,
            user_data: serde_json::Value::Object(serde_json::Map::new()),
            debug_log: false,
            headless: true,
        }
    }
}

/// Read `search_run_id` out of the caller's payload
///
/// Strings are taken as-is, numbers are stringified; anything else counts
/// as absent.
#[must_use]
pub fn search_run_id_from(user_data: &serde_json::Value) -> Option<String> {
    match user_data.get("search_run_id")? {
        serde_json::Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
