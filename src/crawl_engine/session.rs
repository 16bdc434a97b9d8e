//! Rendering session seam
//!
//! The page handler only talks to a browser through [`RenderingSession`];
//! the orchestrator only obtains sessions through a [`SessionFactory`].
//! One session serves exactly one attempt and is closed afterwards.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

use crate::page_extractor::PageSnapshot;

/// Something on the page that closes an overlay when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Every element matching a CSS selector
    Css(&'static str),
    /// Buttons whose visible text is exactly this label
    ButtonText(&'static str),
}

/// Close buttons and "not now" prompts, English and Portuguese
pub const OVERLAY_AFFORDANCES: &[Affordance] = &[
    Affordance::Css(r#"[aria-label*="Close"]"#),
    Affordance::Css(r#"[aria-label*="Fechar"]"#),
    Affordance::ButtonText("Not Now"),
    Affordance::ButtonText("Agora não"),
];

/// One isolated page in a browser
pub trait RenderingSession: Send + Sync {
    /// Navigate to `url`
    fn navigate(&self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Resolve once the document has reached a usable state; never times out
    /// on its own
    fn wait_for_content_loaded(&self) -> impl Future<Output = Result<()>> + Send;

    /// Click every element matching `affordances`, each click bounded by
    /// `click_timeout`; returns the number of successful clicks
    fn dismiss_overlays(
        &self,
        affordances: &[Affordance],
        click_timeout: Duration,
    ) -> impl Future<Output = Result<usize>> + Send;

    /// Scroll to the vertical midpoint of the document
    fn scroll_to_midpoint(&self) -> impl Future<Output = Result<()>> + Send;

    /// Capture final location, serialized DOM and visible text
    fn snapshot(&self) -> impl Future<Output = Result<PageSnapshot>> + Send;

    /// Release the page and any per-session browser state
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}

/// Opens a fresh [`RenderingSession`] per attempt
pub trait SessionFactory: Send + Sync + 'static {
    type Session: RenderingSession + 'static;

    fn open(&self) -> impl Future<Output = Result<Self::Session>> + Send;
}
