//! Main crawl orchestration logic
//!
//! Owns the per-URL state machine
//! `PENDING -> IN_FLIGHT -> {SUCCEEDED | RETRY_SCHEDULED -> IN_FLIGHT | FAILED}`
//! and the two global bounds:
//! - at most `max_concurrency` attempts in flight
//! - at most `max_requests_per_crawl` dispatches over the whole run
//!
//! Attempts run as spawned tasks; retries wait out their backoff outside the
//! concurrency pool and then jump the queue. Every URL that was dispatched at
//! least once ends with exactly one emitted record.

use dashmap::{DashMap, DashSet};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

use super::crawl_types::{CrawlAttempt, CrawlError, CrawlQueue, CrawlSummary, retry_backoff};
use super::page_handler::{AttemptOutcome, classify_attempt, run_attempt};
use super::progress::ProgressReporter;
use super::session::SessionFactory;
use crate::config::ScrapeConfig;
use crate::content_saver::RecordSink;
use crate::page_extractor::{ErrorRecord, PageRecord};

enum LoopEvent {
    /// An attempt task finished (or panicked)
    Finished(CrawlQueue, Result<AttemptOutcome, JoinError>),
    /// A retry finished its backoff
    RetryReady(CrawlQueue),
}

struct CrawlState<'a, S, P> {
    config: &'a ScrapeConfig,
    sink: &'a S,
    progress: &'a P,
    pending: VecDeque<CrawlQueue>,
    summary: CrawlSummary,
}

impl<S: RecordSink, P: ProgressReporter> CrawlState<'_, S, P> {
    fn budget_exhausted(&self) -> bool {
        self.summary.dispatched >= self.config.max_requests_per_crawl()
    }

    async fn emit(&mut self, record: PageRecord) {
        match self.sink.push(&record).await {
            Ok(()) => self
                .progress
                .report_record_emitted(record.page_url(), record.is_error()),
            Err(e) => {
                self.summary.sink_errors += 1;
                let err = CrawlError::Sink(format!("{e:#}"));
                self.progress.report_sink_failed(record.page_url(), &err.to_string());
            }
        }
    }

    async fn succeed(&mut self, record: PageRecord) {
        self.summary.succeeded += 1;
        self.emit(record).await;
    }

    async fn give_up(&mut self, url: &str, attempts: u32, record: PageRecord) {
        let reason = record
            .as_error()
            .map(|err| err.error.clone())
            .unwrap_or_default();
        debug!(
            "{}",
            CrawlError::AttemptExhausted {
                url: url.to_string(),
                attempts,
                last_error: reason.clone(),
            }
        );
        self.progress.report_gave_up(url, attempts, &reason);
        self.summary.failed += 1;
        self.emit(record).await;
    }

    /// Finalize a URL that already ran but can no longer be dispatched
    async fn give_up_on_budget(&mut self, item: &CrawlQueue, reason: String) {
        let record = ErrorRecord::new(
            &item.url,
            self.config.search_run_id().map(str::to_string),
            reason,
        );
        self.give_up(&item.url, item.attempt.saturating_sub(1).max(1), record.into())
            .await;
    }
}

/// Crawl every start URL once, honoring retry and resource bounds
///
/// Records go to `sink` in completion order. Sink failures are counted in
/// the summary and never change a URL's outcome.
pub async fn crawl_pages<F, S, P>(
    config: Arc<ScrapeConfig>,
    factory: Arc<F>,
    sink: &S,
    progress: &P,
) -> CrawlSummary
where
    F: SessionFactory,
    S: RecordSink,
    P: ProgressReporter,
{
    // Duplicate start URLs are crawled once
    let seen: DashSet<String> = DashSet::new();
    let pending: VecDeque<CrawlQueue> = config
        .start_urls()
        .iter()
        .filter(|url| {
            let fresh = seen.insert((*url).clone());
            if !fresh {
                debug!("Skipping duplicate start URL: {url}");
            }
            fresh
        })
        .map(CrawlQueue::new)
        .collect();

    let mut state = CrawlState {
        config: &config,
        sink,
        progress,
        pending,
        summary: CrawlSummary::default(),
    };

    let concurrency = config.max_concurrency();
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let in_flight: DashMap<String, CrawlAttempt> = DashMap::new();

    let mut active_tasks = FuturesUnordered::new();
    let mut delayed_retries = FuturesUnordered::new();

    loop {
        // Fill up to concurrency limit
        while active_tasks.len() < concurrency {
            let Some(item) = state.pending.pop_front() else {
                break;
            };

            if state.budget_exhausted() {
                if item.is_retry() {
                    let reason = item.last_error.clone().unwrap_or_default();
                    state.give_up_on_budget(&item, reason).await;
                } else {
                    state.summary.abandoned += 1;
                }
                continue;
            }

            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                error!("Semaphore closed unexpectedly");
                state.pending.push_front(item);
                break;
            };

            state.summary.dispatched += 1;
            progress.report_attempt_started(&item.url, item.attempt);
            in_flight.insert(item.url.clone(), CrawlAttempt::start(&item));

            let factory = Arc::clone(&factory);
            let task_config = Arc::clone(&config);
            let task_item = item.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit; // Hold until the attempt completes
                run_attempt(factory.as_ref(), &task_item, &task_config).await
            });

            active_tasks.push(async move { (item, handle.await) });
        }

        let event = tokio::select! {
            Some((item, joined)) = active_tasks.next(), if !active_tasks.is_empty() => {
                LoopEvent::Finished(item, joined)
            }
            Some(item) = delayed_retries.next(), if !delayed_retries.is_empty() => {
                LoopEvent::RetryReady(item)
            }
            else => break,
        };

        let (item, joined) = match event {
            LoopEvent::RetryReady(item) => {
                state.pending.push_front(item);
                continue;
            }
            LoopEvent::Finished(item, joined) => (item, joined),
        };

        if let Some((_, attempt)) = in_flight.remove(&item.url) {
            let elapsed = chrono::Utc::now() - attempt.started_at;
            debug!(
                "Attempt {} for {} finished after {}ms",
                attempt.attempt_number,
                attempt.url,
                elapsed.num_milliseconds()
            );
        }

        let outcome = joined.unwrap_or_else(|e| {
            error!("Attempt task for {} panicked: {e}", item.url);
            classify_attempt(
                &item,
                Err(anyhow::anyhow!("Attempt task failed: {e}")),
                &config,
            )
        });

        match outcome {
            AttemptOutcome::Success(record) => state.succeed(record).await,
            AttemptOutcome::GiveUp(record) => state.give_up(&item.url, item.attempt, record).await,
            AttemptOutcome::Retry { reason, kind } => {
                let next = item.next_attempt(reason.clone());
                if state.budget_exhausted() {
                    warn!(
                        "Request limit reached, cannot retry {} (attempt {})",
                        item.url, item.attempt
                    );
                    state.give_up_on_budget(&next, reason).await;
                    continue;
                }

                let delay = retry_backoff(
                    config.retry_backoff_base(),
                    item.attempt,
                    kind,
                    config.max_retry_backoff(),
                );
                state.summary.retries += 1;
                progress.report_retry_scheduled(
                    &item.url,
                    item.attempt,
                    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    &reason,
                );

                if delay.is_zero() {
                    state.pending.push_front(next);
                } else {
                    delayed_retries.push(async move {
                        tokio::time::sleep(delay).await;
                        next
                    });
                }
            }
        }
    }

    let summary = state.summary;
    if summary.abandoned > 0 {
        progress.report_limit_reached(config.max_requests_per_crawl(), summary.abandoned);
    }
    progress.report_completed(summary.succeeded, summary.failed, summary.dispatched);
    summary
}
