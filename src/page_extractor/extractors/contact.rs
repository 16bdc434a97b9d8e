//! Phone number, external websites and messenger link.

use regex::Regex;
use scraper::Selector;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

use super::ExtractionContext;
use crate::utils::constants::OUTBOUND_REDIRECT_HOST;
use crate::utils::{host_matches, is_messenger_host, is_platform_host};

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,5}[-\s.]?[0-9]{1,5}[-\s.]?[0-9]{0,5}",
    )
    .expect("PHONE_RE: hardcoded regex is valid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

/// First phone-looking run with at least `min_digits` digits
///
/// Recall over precision: dates or ids with enough digits can match.
#[must_use]
pub fn extract_phone(ctx: &ExtractionContext<'_>, min_digits: usize) -> Option<String> {
    PHONE_RE
        .find_iter(ctx.text)
        .map(|found| found.as_str().trim())
        .find(|candidate| candidate.chars().filter(char::is_ascii_digit).count() >= min_digits)
        .map(str::to_string)
}

/// Follow the platform's outbound link wrapper (`l.php?u=...`) to its target
fn unwrap_redirect(url: Url) -> Url {
    let is_wrapper = url
        .host_str()
        .is_some_and(|host| host_matches(host, OUTBOUND_REDIRECT_HOST))
        && url.path() == "/l.php";
    if !is_wrapper {
        return url;
    }

    let target = url
        .query_pairs()
        .find(|(key, _)| key == "u")
        .and_then(|(_, target)| Url::parse(&target).ok());
    target.unwrap_or(url)
}

/// Every anchor on the page, resolved and unwrapped, in document order
fn anchor_targets<'a>(ctx: &'a ExtractionContext<'a>) -> impl Iterator<Item = Url> + 'a {
    ctx.document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(move |href| ctx.resolve(href))
        .map(unwrap_redirect)
}

/// External http(s) links, first-seen order, no duplicates, never pointing
/// at the platform or its messenger
#[must_use]
pub fn extract_websites(ctx: &ExtractionContext<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    anchor_targets(ctx)
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| {
            url.host_str()
                .is_some_and(|host| !is_platform_host(host) && !is_messenger_host(host))
        })
        .map(String::from)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// First link into the messaging product
#[must_use]
pub fn extract_messenger(ctx: &ExtractionContext<'_>) -> Option<String> {
    anchor_targets(ctx)
        .find(|url| url.host_str().is_some_and(is_messenger_host))
        .map(String::from)
}
