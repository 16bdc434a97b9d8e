//! Shared configuration constants for pagescrape
//!
//! Default values and platform knowledge used across the crate, kept in one
//! place to avoid magic numbers drifting between the config layer, the
//! extractors and the orchestrator.

/// Default global attempt ceiling for one run
pub const DEFAULT_MAX_REQUESTS_PER_CRAWL: usize = 10;

/// Default number of attempts in flight at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Default number of retries after the first failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default budget for navigation and the content-loaded signal
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 60;

/// Extra time the whole attempt gets on top of the page load budget
pub const HANDLER_TIMEOUT_GRACE_SECS: u64 = 30;

/// Pause after the midpoint scroll so lazy content can render
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2_000;

/// Per-click budget while dismissing overlays
pub const DEFAULT_OVERLAY_CLICK_TIMEOUT_MS: u64 = 2_000;

/// Bound on the best-effort midpoint scroll
pub const SCROLL_TIMEOUT_MS: u64 = 5_000;

/// First retry waits this long; later retries double it
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1_000;

/// Upper bound for a single retry delay
pub const MAX_RETRY_BACKOFF_MS: u64 = 30_000;

/// Candidates with fewer digits than this are not treated as phone numbers
pub const DEFAULT_MIN_PHONE_DIGITS: usize = 8;

/// Canonical page URL base used to expand bare page identifiers
pub const PLATFORM_PAGE_BASE: &str = "https://www.facebook.com/";

/// Hosts owned by the platform itself (never reported as websites)
pub const PLATFORM_HOSTS: &[&str] = &["facebook.com", "fb.com", "fb.me"];

/// Hosts owned by the messaging sub-product
pub const MESSENGER_HOSTS: &[&str] = &["messenger.com", "m.me"];

/// Host used by the platform to wrap outbound links
pub const OUTBOUND_REDIRECT_HOST: &str = "l.facebook.com";

/// Default `pageName` when no vanity handle can be recovered
pub const DEFAULT_PAGE_NAME: &str = "people";

/// Chrome user agent string
///
/// Kept in line with a current stable Chrome so pages render their desktop
/// layout.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
