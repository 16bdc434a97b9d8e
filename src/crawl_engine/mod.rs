//! Crawl Engine Module
//!
//! Per-URL attempt handling, the retry state machine and the rendering
//! session seam the attempts run on.

// Sub-modules
pub mod chromium_session;
pub mod cleanup;
pub mod crawl_types;
pub mod orchestrator;
pub mod page_handler;
pub mod page_timeout;
pub mod progress;
pub mod session;

pub use chromium_session::{ChromiumSession, ChromiumSessionFactory};
pub use cleanup::{CleanupResult, cleanup_browser_and_data, remove_profile_dir};
pub use crawl_types::{
    CrawlAttempt, CrawlError, CrawlQueue, CrawlResult, CrawlSummary, FailureKind, retry_backoff,
};
pub use orchestrator::crawl_pages;
pub use page_handler::{AttemptOutcome, classify_attempt, handle_page, run_attempt};
pub use page_timeout::with_page_timeout;
pub use progress::{NoOpProgress, ProgressLevel, ProgressReporter, TracingProgress};
pub use session::{Affordance, OVERLAY_AFFORDANCES, RenderingSession, SessionFactory};
