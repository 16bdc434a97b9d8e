//! Field extractors
//!
//! Each extractor is a pure function over an [`ExtractionContext`]: the
//! parsed document, the final location and the flattened visible text. None
//! of them fail; a missing signal is `None` (or an empty list).
//!
//! Extractors with several sources express them as an ordered list of
//! strategies run through [`first_of`], so adding a selector or a locale is
//! a one-line change to the list.

mod ad_status;
mod contact;
mod identity;
mod popularity;
mod profile;
mod rating;

pub use ad_status::{AdStatusSignal, extract_ad_status};
pub use contact::{extract_messenger, extract_phone, extract_websites};
pub use identity::{CATEGORY_VOCABULARY, extract_category, extract_page_id, extract_page_name, extract_title};
pub use popularity::{CountKind, CountMatch, PopularityCounts, extract_counts, parse_count, scan_counts};
pub use profile::{extract_intro, extract_profile_picture};
pub use rating::{NOT_YET_RATED, RatingSignal, extract_creation_date, extract_rating, extract_review_count};

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Read-only view of one page shared by all extractors
pub struct ExtractionContext<'a> {
    pub document: &'a Html,
    /// Final location, when it parses as a URL
    pub location: Option<Url>,
    /// Flattened visible text
    pub text: &'a str,
}

impl<'a> ExtractionContext<'a> {
    #[must_use]
    pub fn new(document: &'a Html, location: &str, text: &'a str) -> Self {
        Self {
            document,
            location: Url::parse(location).ok(),
            text,
        }
    }

    /// Resolve an attribute value (href, src) against the page location
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<Url> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match &self.location {
            Some(base) => base.join(raw).ok(),
            None => Url::parse(raw).ok(),
        }
    }
}

/// One way of recovering a value
pub type Strategy<T> = fn(&ExtractionContext<'_>) -> Option<T>;

/// Run `strategies` in order and return the first value found
pub fn first_of<T>(ctx: &ExtractionContext<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(ctx))
}

/// Text content of an element with runs of whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty element text matching `selector`
pub(crate) fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_none(_: &ExtractionContext<'_>) -> Option<u32> {
        None
    }

    fn one(_: &ExtractionContext<'_>) -> Option<u32> {
        Some(1)
    }

    fn two(_: &ExtractionContext<'_>) -> Option<u32> {
        Some(2)
    }

    #[test]
    fn first_strategy_with_a_value_wins() {
        let document = Html::parse_document("");
        let ctx = ExtractionContext::new(&document, "https://www.facebook.com/acme", "");

        assert_eq!(first_of(&ctx, &[always_none, two, one]), Some(2));
        assert_eq!(first_of(&ctx, &[always_none]), None);
        assert_eq!(first_of::<u32>(&ctx, &[]), None);
    }

    #[test]
    fn relative_links_resolve_against_location() {
        let document = Html::parse_document("");
        let ctx = ExtractionContext::new(&document, "https://www.facebook.com/acme/", "");
        assert_eq!(
            ctx.resolve("about").map(String::from).as_deref(),
            Some("https://www.facebook.com/acme/about")
        );

        let detached = ExtractionContext::new(&document, "not a url", "");
        assert!(detached.resolve("about").is_none());
        assert!(detached.resolve("https://acme.example").is_some());
    }
}
