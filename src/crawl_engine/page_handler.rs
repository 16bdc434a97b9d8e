//! Page task handler
//!
//! Runs one attempt for one URL: navigate, wait for content, best-effort
//! page preparation, snapshot, extract. The outcome is returned as an
//! explicit [`AttemptOutcome`] for the orchestrator to act on.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};

use super::crawl_types::{CrawlQueue, FailureKind};
use super::page_timeout::with_page_timeout;
use super::session::{OVERLAY_AFFORDANCES, RenderingSession, SessionFactory};
use crate::config::ScrapeConfig;
use crate::page_extractor::{ErrorRecord, PageProfile, PageRecord, extract_page_data};

/// Upper bound for releasing a session after an attempt
const SESSION_CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// What the orchestrator should do after one attempt
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// Terminal success; emit the record
    Success(PageRecord),
    /// Failed, and retries remain
    Retry { reason: String, kind: FailureKind },
    /// Failed with no retries left; emit the error record
    GiveUp(PageRecord),
}

/// Drive one loaded-page cycle and extract a profile
///
/// Navigation and the content-loaded signal are each bounded by the page
/// load timeout and fail the attempt; overlay dismissal and scrolling are
/// best effort, each under its own timeout.
///
/// # Errors
///
/// Navigation failures, load timeouts and snapshot failures.
pub async fn handle_page<S: RenderingSession>(
    session: &S,
    url: &str,
    config: &ScrapeConfig,
) -> Result<PageProfile> {
    let load_secs = config.page_load_timeout_secs();

    with_page_timeout(session.navigate(url), load_secs, "Page navigation").await?;
    with_page_timeout(session.wait_for_content_loaded(), load_secs, "Content loaded").await?;

    match tokio::time::timeout(
        config.overlay_dismissal_timeout(),
        session.dismiss_overlays(OVERLAY_AFFORDANCES, config.overlay_click_timeout()),
    )
    .await
    {
        Ok(Ok(0)) => {}
        Ok(Ok(clicked)) => debug!("Dismissed {clicked} overlay element(s) on {url}"),
        Ok(Err(e)) => debug!("Overlay dismissal failed on {url}: {e:#}"),
        Err(_) => debug!("Overlay dismissal timed out on {url}"),
    }

    match tokio::time::timeout(config.scroll_timeout(), session.scroll_to_midpoint()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("Scroll failed on {url}: {e:#}"),
        Err(_) => debug!("Scroll timed out on {url}"),
    }
    tokio::time::sleep(config.settle_delay()).await;

    let snapshot = session
        .snapshot()
        .await
        .context("Failed to capture page snapshot")?;

    let mut profile = extract_page_data(url, &snapshot, &config.extract_options());
    profile.search_run_id = config.search_run_id().map(str::to_string);
    Ok(profile)
}

/// Run one attempt end to end on a fresh session and classify the result
///
/// The whole attempt, session setup included, is bounded by the handler
/// timeout. The session is always closed, whatever the outcome.
pub async fn run_attempt<F: SessionFactory>(
    factory: &F,
    item: &CrawlQueue,
    config: &ScrapeConfig,
) -> AttemptOutcome {
    let handler_secs = config.handler_timeout_secs();

    let result = match with_page_timeout(factory.open(), handler_secs, "Session open").await {
        Ok(session) => {
            let result = with_page_timeout(
                handle_page(&session, &item.url, config),
                handler_secs,
                "Request handler",
            )
            .await;

            match tokio::time::timeout(SESSION_CLOSE_TIMEOUT, session.close()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to close session for {}: {e:#}", item.url),
                Err(_) => warn!("Timed out closing session for {}", item.url),
            }
            result
        }
        Err(e) => Err(e.context("Failed to open rendering session")),
    };

    classify_attempt(item, result, config)
}

/// Map an attempt result onto the retry policy: retry while
/// `attempt <= max_retries`, give up afterwards
#[must_use]
pub fn classify_attempt(
    item: &CrawlQueue,
    result: Result<PageProfile>,
    config: &ScrapeConfig,
) -> AttemptOutcome {
    match result {
        Ok(profile) => AttemptOutcome::Success(profile.into()),
        Err(e) => {
            let reason = format!("{e:#}");
            if item.attempt <= config.max_retries() {
                AttemptOutcome::Retry {
                    reason,
                    kind: FailureKind::classify(&e),
                }
            } else {
                AttemptOutcome::GiveUp(
                    ErrorRecord::new(
                        &item.url,
                        config.search_run_id().map(str::to_string),
                        reason,
                    )
                    .into(),
                )
            }
        }
    }
}
