//! Ad Library status.

use super::ExtractionContext;
use crate::page_extractor::schema::AdStatus;

/// Phrases stating the page is not advertising; checked first so a negation
/// wins over the positive phrase it embeds
const INACTIVE_PHRASES: &[&str] = &[
    "not currently running ads",
    "not running ads",
    "não está executando anúncios",
];

const ACTIVE_PHRASES: &[&str] = &["currently running ads", "executando anúncios"];

const ACTIVE_TEXT: &str = "This Page is currently running ads.";
const INACTIVE_TEXT: &str = "This Page is not running ads.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdStatusSignal {
    pub status: AdStatus,
}

impl AdStatusSignal {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AdStatus::Active
    }

    /// Display string; `None` when the status is unknown
    #[must_use]
    pub fn display(&self) -> Option<&'static str> {
        match self.status {
            AdStatus::Active => Some(ACTIVE_TEXT),
            AdStatus::Inactive => Some(INACTIVE_TEXT),
            AdStatus::Unknown => None,
        }
    }
}

#[must_use]
pub fn extract_ad_status(ctx: &ExtractionContext<'_>) -> AdStatusSignal {
    let text = ctx.text.to_lowercase();
    let status = if INACTIVE_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        AdStatus::Inactive
    } else if ACTIVE_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        AdStatus::Active
    } else {
        AdStatus::Unknown
    };
    AdStatusSignal { status }
}
