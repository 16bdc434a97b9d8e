//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! `build()` only exists once start URLs were supplied; the remaining
//! invariants (non-empty URL list, non-zero bounds) are checked at build
//! time and reported as `CrawlError::Config`.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{ActorInput, ScrapeConfig, search_run_id_from};
use crate::crawl_engine::crawl_types::{CrawlError, CrawlResult};
use crate::utils::constants::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_REQUESTS_PER_CRAWL, DEFAULT_MAX_RETRIES,
    DEFAULT_MIN_PHONE_DIGITS, DEFAULT_OVERLAY_CLICK_TIMEOUT_MS, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_RETRY_BACKOFF_MS, DEFAULT_SETTLE_DELAY_MS, MAX_RETRY_BACKOFF_MS,
};
use crate::utils::{is_valid_url, normalize_start_url};
use tracing::warn;

// Type states for the builder
pub struct WithStartUrls;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) start_urls: Vec<String>,
    pub(crate) max_requests_per_crawl: usize,
    pub(crate) max_concurrency: usize,
    pub(crate) max_retries: u32,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) scrape_about: bool,
    pub(crate) scrape_posts: bool,
    pub(crate) scrape_reviews: bool,
    pub(crate) user_data: serde_json::Value,
    pub(crate) debug_log: bool,
    pub(crate) headless: bool,
    pub(crate) settle_delay_ms: u64,
    pub(crate) overlay_click_timeout_ms: u64,
    pub(crate) retry_backoff_ms: u64,
    pub(crate) max_retry_backoff_ms: u64,
    pub(crate) min_phone_digits: usize,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
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
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            overlay_click_timeout_ms: DEFAULT_OVERLAY_CLICK_TIMEOUT_MS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            max_retry_backoff_ms: MAX_RETRY_BACKOFF_MS,
            min_phone_digits: DEFAULT_MIN_PHONE_DIGITS,
            chrome_data_dir: None,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }

    /// Validate raw run input
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::Config` when no usable start URL is present or a
    /// bound is zero.
    pub fn from_input(input: ActorInput) -> CrawlResult<Self> {
        Self::builder()
            .start_urls(input.start_urls.iter().map(|entry| entry.as_str().to_string()))
            .max_requests_per_crawl(input.max_requests_per_crawl)
            .max_concurrency(input.max_concurrency)
            .max_retries(input.max_retries)
            .page_load_timeout_secs(input.page_load_timeout_secs)
            .scrape_about(input.scrape_about)
            .scrape_posts(input.scrape_posts)
            .scrape_reviews(input.scrape_reviews)
            .user_data(input.user_data)
            .debug_log(input.debug_log)
            .headless(input.headless)
            .build()
    }
}

impl ScrapeConfigBuilder<()> {
    /// Set the start URLs; bare page identifiers are expanded to full page
    /// URLs; blank and malformed entries are dropped
    pub fn start_urls<I, S>(self, urls: I) -> ScrapeConfigBuilder<WithStartUrls>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ScrapeConfigBuilder {
            start_urls: urls
                .into_iter()
                .filter_map(|url| normalize_start_url(url.as_ref()))
                .filter(|url| {
                    let valid = is_valid_url(url);
                    if !valid {
                        warn!("Dropping malformed start URL: {url}");
                    }
                    valid
                })
                .collect(),
            max_requests_per_crawl: self.max_requests_per_crawl,
            max_concurrency: self.max_concurrency,
            max_retries: self.max_retries,
            page_load_timeout_secs: self.page_load_timeout_secs,
            scrape_about: self.scrape_about,
            scrape_posts: self.scrape_posts,
            scrape_reviews: self.scrape_reviews,
            user_data: self.user_data,
            debug_log: self.debug_log,
            headless: self.headless,
            settle_delay_ms: self.settle_delay_ms,
            overlay_click_timeout_ms: self.overlay_click_timeout_ms,
            retry_backoff_ms: self.retry_backoff_ms,
            max_retry_backoff_ms: self.max_retry_backoff_ms,
            min_phone_digits: self.min_phone_digits,
            chrome_data_dir: self.chrome_data_dir,
            _phantom: PhantomData,
        }
    }
}

// Build method only available when start URLs are set
impl ScrapeConfigBuilder<WithStartUrls> {
    /// # Errors
    ///
    /// Returns `CrawlError::Config` when every start URL was blank, or when
    /// `max_concurrency`, `max_requests_per_crawl` or the page load timeout
    /// is zero.
    pub fn build(self) -> CrawlResult<ScrapeConfig> {
        if self.start_urls.is_empty() {
            return Err(CrawlError::Config(
                "No start URLs provided; at least one page URL or identifier is required".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(CrawlError::Config("maxConcurrency must be at least 1".into()));
        }
        if self.max_requests_per_crawl == 0 {
            return Err(CrawlError::Config(
                "maxRequestsPerCrawl must be at least 1".into(),
            ));
        }
        if self.page_load_timeout_secs == 0 {
            return Err(CrawlError::Config(
                "pageLoadTimeoutSecs must be at least 1".into(),
            ));
        }

        let search_run_id = search_run_id_from(&self.user_data);

        Ok(ScrapeConfig {
            start_urls: self.start_urls,
            max_requests_per_crawl: self.max_requests_per_crawl,
            max_concurrency: self.max_concurrency,
            max_retries: self.max_retries,
            page_load_timeout_secs: self.page_load_timeout_secs,
            scrape_about: self.scrape_about,
            scrape_posts: self.scrape_posts,
            scrape_reviews: self.scrape_reviews,
            user_data: self.user_data,
            search_run_id,
            debug_log: self.debug_log,
            headless: self.headless,
            settle_delay_ms: self.settle_delay_ms,
            overlay_click_timeout_ms: self.overlay_click_timeout_ms,
            retry_backoff_ms: self.retry_backoff_ms,
            max_retry_backoff_ms: self.max_retry_backoff_ms.max(self.retry_backoff_ms),
            min_phone_digits: self.min_phone_digits,
            chrome_data_dir: self.chrome_data_dir,
        })
    }
}

// Builder methods available at any state
impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn max_requests_per_crawl(mut self, max: usize) -> Self {
        self.max_requests_per_crawl = max;
        self
    }

    #[must_use]
    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    /// Retries after the first failed attempt; 0 disables retrying
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn scrape_about(mut self, enabled: bool) -> Self {
        self.scrape_about = enabled;
        self
    }

    #[must_use]
    pub fn scrape_posts(mut self, enabled: bool) -> Self {
        self.scrape_posts = enabled;
        self
    }

    #[must_use]
    pub fn scrape_reviews(mut self, enabled: bool) -> Self {
        self.scrape_reviews = enabled;
        self
    }

    #[must_use]
    pub fn user_data(mut self, user_data: serde_json::Value) -> Self {
        self.user_data = user_data;
        self
    }

    #[must_use]
    pub fn debug_log(mut self, enabled: bool) -> Self {
        self.debug_log = enabled;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn overlay_click_timeout_ms(mut self, ms: u64) -> Self {
        self.overlay_click_timeout_ms = ms;
        self
    }

    /// Base retry delay; 0 retries immediately
    #[must_use]
    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    #[must_use]
    pub fn max_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.max_retry_backoff_ms = ms;
        self
    }

    #[must_use]
    pub fn min_phone_digits(mut self, digits: usize) -> Self {
        self.min_phone_digits = digits;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }
}
