//! Test utilities shared by the pagescrape integration tests

use anyhow::{Result, anyhow};
use dashmap::DashMap;
use kodegen_tools_pagescrape::crawl_engine::{Affordance, RenderingSession, SessionFactory};
use kodegen_tools_pagescrape::{PageSnapshot, ScrapeConfig};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// How a scripted URL behaves on navigation
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Loads and renders this document
    Html(String),
    /// Navigation never completes
    Hang,
    /// Fails this many attempts, then renders the document
    FailThenSucceed(u32, String),
    /// Every navigation fails with this message
    AlwaysFail(String),
    /// Renders the document; overlay dismissal and scrolling never resolve
    StalledPreparation(String),
    /// Renders the document; overlay dismissal and scrolling both fail
    FailingPreparation(String),
}

#[derive(Default)]
struct Shared {
    behaviors: HashMap<String, Behavior>,
    navigations: DashMap<String, u32>,
    open_sessions: AtomicUsize,
    peak_sessions: AtomicUsize,
    render_delay: Duration,
}

/// Session factory whose pages are scripted per URL
#[derive(Clone, Default)]
pub struct ScriptedSessionFactory {
    shared: Arc<Shared>,
}

#[allow(dead_code)]
impl ScriptedSessionFactory {
    pub fn new<I, S>(behaviors: I) -> Self
    where
        I: IntoIterator<Item = (S, Behavior)>,
        S: Into<String>,
    {
        Self::with_render_delay(behaviors, Duration::ZERO)
    }

    /// Successful navigations take `delay`, so sessions overlap
    pub fn with_render_delay<I, S>(behaviors: I, delay: Duration) -> Self
    where
        I: IntoIterator<Item = (S, Behavior)>,
        S: Into<String>,
    {
        Self {
            shared: Arc::new(Shared {
                behaviors: behaviors
                    .into_iter()
                    .map(|(url, behavior)| (url.into(), behavior))
                    .collect(),
                render_delay: delay,
                ..Shared::default()
            }),
        }
    }

    /// Number of navigations issued for `url`
    pub fn attempts(&self, url: &str) -> u32 {
        self.shared.navigations.get(url).map_or(0, |n| *n)
    }

    pub fn total_attempts(&self) -> u32 {
        self.shared.navigations.iter().map(|entry| *entry.value()).sum()
    }

    /// Most sessions ever open at the same time
    pub fn peak_sessions(&self) -> usize {
        self.shared.peak_sessions.load(Ordering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.shared.open_sessions.load(Ordering::SeqCst)
    }
}

impl SessionFactory for ScriptedSessionFactory {
    type Session = ScriptedSession;

    async fn open(&self) -> Result<ScriptedSession> {
        let open = self.shared.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.peak_sessions.fetch_max(open, Ordering::SeqCst);
        Ok(ScriptedSession {
            shared: Arc::clone(&self.shared),
            loaded: Mutex::new(None),
        })
    }
}

pub struct ScriptedSession {
    shared: Arc<Shared>,
    loaded: Mutex<Option<(String, String)>>,
}

impl ScriptedSession {
    /// Behavior of the URL currently loaded in this session
    fn loaded_behavior(&self) -> Option<Behavior> {
        let loaded = self.loaded.lock();
        let (url, _) = loaded.as_ref()?;
        self.shared.behaviors.get(url).cloned()
    }
}

impl RenderingSession for ScriptedSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        let attempt = {
            let mut count = self.shared.navigations.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let html = match self.shared.behaviors.get(url) {
            None => return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED at {url}")),
            Some(Behavior::Hang) => std::future::pending::<String>().await,
            Some(Behavior::AlwaysFail(message)) => return Err(anyhow!("{message}")),
            Some(Behavior::FailThenSucceed(failures, _)) if attempt <= *failures => {
                return Err(anyhow!("net::ERR_CONNECTION_RESET (attempt {attempt})"));
            }
            Some(
                Behavior::FailThenSucceed(_, html)
                | Behavior::Html(html)
                | Behavior::StalledPreparation(html)
                | Behavior::FailingPreparation(html),
            ) => html.clone(),
        };

        if !self.shared.render_delay.is_zero() {
            tokio::time::sleep(self.shared.render_delay).await;
        }
        *self.loaded.lock() = Some((url.to_string(), html));
        Ok(())
    }

    async fn wait_for_content_loaded(&self) -> Result<()> {
        Ok(())
    }

    async fn dismiss_overlays(&self, _affordances: &[Affordance], _click_timeout: Duration) -> Result<usize> {
        match self.loaded_behavior() {
            Some(Behavior::StalledPreparation(_)) => std::future::pending().await,
            Some(Behavior::FailingPreparation(_)) => Err(anyhow!("Overlay lookup failed: target closed")),
            _ => Ok(0),
        }
    }

    async fn scroll_to_midpoint(&self) -> Result<()> {
        match self.loaded_behavior() {
            Some(Behavior::StalledPreparation(_)) => std::future::pending().await,
            Some(Behavior::FailingPreparation(_)) => Err(anyhow!("Failed to execute scroll script")),
            _ => Ok(()),
        }
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let loaded = self.loaded.lock().clone();
        let (url, html) = loaded.ok_or_else(|| anyhow!("Nothing loaded"))?;
        Ok(PageSnapshot::from_html(url, html))
    }

    async fn close(self) -> Result<()> {
        self.shared.open_sessions.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Wraps `body` in a minimal document with an optional `<head>` block
#[allow(dead_code)]
pub fn page_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// A profile page with a main heading, an android app link and a counts line
#[allow(dead_code)]
pub fn profile_html(title: &str, page_id: &str, counts: &str) -> String {
    page_html(
        &format!(r#"<meta property="al:android:url" content="fb://page/{page_id}">"#),
        &format!(
            r#"<div role="main"><h1>{}</h1><div>{}</div></div>"#,
            html_escape::encode_text(title),
            html_escape::encode_text(counts)
        ),
    )
}

/// Page body made of one anchor per href
#[allow(dead_code)]
pub fn anchors_html(hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<a href="{}">link</a>"#,
                html_escape::encode_double_quoted_attribute(href)
            )
        })
        .collect();
    page_html("", &anchors)
}

/// Config tuned for the scripted factory: no settle pause, fast backoff
#[allow(dead_code)]
pub fn test_config<I, S>(urls: I) -> kodegen_tools_pagescrape::config::ScrapeConfigBuilder<kodegen_tools_pagescrape::config::WithStartUrls>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ScrapeConfig::builder()
        .settle_delay_ms(0)
        .retry_backoff_ms(100)
        .start_urls(urls)
}
