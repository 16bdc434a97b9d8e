//! Chromium-backed rendering sessions
//!
//! Every session lives in its own browser context so cookies and storage
//! never bleed between concurrent attempts. Closing the session closes the
//! page and disposes the context.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

use super::session::{Affordance, RenderingSession, SessionFactory};
use crate::page_extractor::PageSnapshot;
use crate::page_extractor::js_scripts::{
    READY_STATE_SCRIPT, SCROLL_TO_MIDPOINT_SCRIPT, SNAPSHOT_SCRIPT, click_buttons_with_text_script,
};

/// How often the readiness probe runs while waiting for content
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadyState {
    ready_state: String,
    body_exists: bool,
}

/// Opens one isolated context + page per attempt on a shared browser
#[derive(Clone)]
pub struct ChromiumSessionFactory {
    browser: Arc<Browser>,
}

impl ChromiumSessionFactory {
    #[must_use]
    pub fn new(browser: Arc<Browser>) -> Self {
        Self { browser }
    }

    async fn dispose_context(browser: &Browser, context_id: BrowserContextId) -> Result<()> {
        browser
            .execute(DisposeBrowserContextParams::new(context_id))
            .await
            .context("Failed to dispose browser context")?;
        Ok(())
    }
}

impl SessionFactory for ChromiumSessionFactory {
    type Session = ChromiumSession;

    async fn open(&self) -> Result<ChromiumSession> {
        let context = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .context("Failed to create browser context")?;
        let context_id = context.result.browser_context_id.clone();

        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(context_id.clone())
            .build()
            .map_err(|e| anyhow!("Failed to build target params: {e}"))?;

        let page = match self.browser.new_page(params).await {
            Ok(page) => page,
            Err(e) => {
                if let Err(dispose_err) = Self::dispose_context(&self.browser, context_id).await {
                    debug!("{dispose_err:#}");
                }
                return Err(anyhow!("Failed to create page: {e}"));
            }
        };

        Ok(ChromiumSession {
            page,
            browser: Arc::clone(&self.browser),
            context_id,
        })
    }
}

/// A page inside its own browser context
pub struct ChromiumSession {
    page: Page,
    browser: Arc<Browser>,
    context_id: BrowserContextId,
}

impl ChromiumSession {
    async fn click_selector(&self, selector: &str, click_timeout: Duration) -> usize {
        let elements = match tokio::time::timeout(click_timeout, self.page.find_elements(selector)).await {
            Ok(Ok(elements)) => elements,
            Ok(Err(e)) => {
                trace!("No overlay elements for '{selector}': {e}");
                return 0;
            }
            Err(_) => {
                debug!("Looking up overlay '{selector}' timed out");
                return 0;
            }
        };

        let mut clicked = 0;
        for element in elements {
            match tokio::time::timeout(click_timeout, element.click()).await {
                Ok(Ok(_)) => clicked += 1,
                Ok(Err(e)) => debug!("Overlay click on '{selector}' failed: {e}"),
                Err(_) => debug!("Overlay click on '{selector}' timed out"),
            }
        }
        clicked
    }

    async fn click_button_text(&self, label: &str, click_timeout: Duration) -> usize {
        let script = click_buttons_with_text_script(label);
        match tokio::time::timeout(click_timeout, self.page.evaluate(script.as_str())).await {
            Ok(Ok(result)) => result.into_value::<usize>().unwrap_or(0),
            Ok(Err(e)) => {
                debug!("Overlay button '{label}' click failed: {e}");
                0
            }
            Err(_) => {
                debug!("Overlay button '{label}' click timed out");
                0
            }
        }
    }
}

impl RenderingSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| anyhow!("Navigation to {url} failed: {e}"))?;
        Ok(())
    }

    async fn wait_for_content_loaded(&self) -> Result<()> {
        loop {
            match self.page.evaluate(READY_STATE_SCRIPT).await {
                Ok(result) => {
                    if let Ok(state) = result.into_value::<ReadyState>()
                        && state.body_exists
                        && matches!(state.ready_state.as_str(), "interactive" | "complete")
                    {
                        return Ok(());
                    }
                }
                Err(e) => trace!("Readiness probe failed, retrying: {e}"),
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    async fn dismiss_overlays(
        &self,
        affordances: &[Affordance],
        click_timeout: Duration,
    ) -> Result<usize> {
        let mut clicked = 0;
        for affordance in affordances {
            clicked += match *affordance {
                Affordance::Css(selector) => self.click_selector(selector, click_timeout).await,
                Affordance::ButtonText(label) => self.click_button_text(label, click_timeout).await,
            };
        }
        Ok(clicked)
    }

    async fn scroll_to_midpoint(&self) -> Result<()> {
        self.page
            .evaluate(SCROLL_TO_MIDPOINT_SCRIPT)
            .await
            .context("Failed to execute scroll script")?;
        Ok(())
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let js_result = self
            .page
            .evaluate(SNAPSHOT_SCRIPT)
            .await
            .context("Failed to execute snapshot script")?;

        let snapshot: PageSnapshot = match js_result.into_value() {
            Ok(value) => {
                serde_json::from_value(value).context("Failed to parse snapshot from JS result")?
            }
            Err(e) => return Err(anyhow!("Failed to get snapshot value: {e}")),
        };

        Ok(snapshot)
    }

    async fn close(self) -> Result<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.page.close().await {
            warn!("Failed to close page: {e}");
            errors.push(format!("page close: {e}"));
        }
        if let Err(e) = ChromiumSessionFactory::dispose_context(&self.browser, self.context_id).await {
            warn!("{e:#}");
            errors.push(format!("{e:#}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Session cleanup incomplete: {}", errors.join("; ")))
        }
    }
}
