pub mod browser_setup;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod page_extractor;
pub mod utils;

use std::sync::Arc;

use tracing::{info, warn};

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ActorInput, ScrapeConfig, StartUrlEntry};
pub use content_saver::{JsonLinesSink, MemorySink, RecordSink};
pub use crawl_engine::{
    ChromiumSessionFactory, CrawlError, CrawlResult, CrawlSummary, NoOpProgress,
    ProgressReporter, RenderingSession, SessionFactory, TracingProgress, crawl_pages,
};
pub use page_extractor::schema::*;
pub use page_extractor::{ExtractOptions, PageSnapshot, extract_page_data};

/// Crawl every configured page in a freshly launched Chromium and push one
/// record per URL into `sink`
///
/// The browser and any scratch profile directory are torn down before
/// returning, whatever happened during the crawl.
///
/// # Errors
///
/// Only browser launch failures are fatal; per-URL failures end up as
/// error records in the sink.
pub async fn crawl<S: RecordSink>(config: ScrapeConfig, sink: &S) -> CrawlResult<CrawlSummary> {
    let (data_dir, owned_data_dir) = match config.chrome_data_dir() {
        Some(dir) => (dir.to_path_buf(), None),
        None => {
            let dir = browser_setup::scratch_profile_dir();
            (dir.clone(), Some(dir))
        }
    };

    let (browser, handler_task) = match launch_browser(config.headless(), &data_dir).await {
        Ok(launched) => launched,
        Err(e) => {
            if let Some(dir) = &owned_data_dir
                && crawl_engine::remove_profile_dir(dir).await.is_err()
            {
                warn!(target: "pagescrape::cleanup", "Scratch profile left behind at {}", dir.display());
            }
            return Err(CrawlError::Browser(format!("{e:#}")));
        }
    };
    TracingProgress.report_browser_launched();
    let browser = Arc::new(browser);

    let summary = {
        let factory = Arc::new(ChromiumSessionFactory::new(Arc::clone(&browser)));
        crawl_pages(Arc::new(config), factory, sink, &TracingProgress).await
    };

    // Every session task has finished, so this is the last reference
    match Arc::try_unwrap(browser) {
        Ok(browser) => {
            match crawl_engine::cleanup_browser_and_data(browser, owned_data_dir).await {
                Ok(crawl_engine::CleanupResult::Success) => {
                    info!(target: "pagescrape::cleanup", "Browser cleanup completed");
                }
                Ok(crawl_engine::CleanupResult::PartialFailure(errors)) => {
                    warn!(target: "pagescrape::cleanup", "Browser cleanup incomplete: {}", errors.join("; "));
                }
                Err(e) => warn!(target: "pagescrape::cleanup", "Browser cleanup failed: {e:#}"),
            }
        }
        Err(_) => {
            warn!(target: "pagescrape::cleanup", "Browser still referenced after crawl, skipping graceful close");
        }
    }
    handler_task.abort();

    Ok(summary)
}
