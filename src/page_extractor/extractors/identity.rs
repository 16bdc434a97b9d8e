//! Title, numeric page id, category and vanity handle.

use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

use super::{ExtractionContext, Strategy, first_of, first_text};
use crate::utils::constants::DEFAULT_PAGE_NAME;

static MAIN_HEADING: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[role="main"] h1"#)
        .expect("BUG: hardcoded CSS selector '[role=\"main\"] h1' is invalid")
});

static TOP_HEADING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("BUG: hardcoded CSS selector 'h1' is invalid"));

static TEXT_SPAN: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[dir="auto"]"#)
        .expect("BUG: hardcoded CSS selector 'span[dir=\"auto\"]' is invalid")
});

static ANDROID_APP_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="al:android:url"], meta[name="al:android:url"]"#)
        .expect("BUG: hardcoded CSS selector for al:android:url is invalid")
});

static IOS_APP_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="al:ios:url"], meta[name="al:ios:url"]"#)
        .expect("BUG: hardcoded CSS selector for al:ios:url is invalid")
});

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("DIGIT_RUN: hardcoded regex is valid"));

/// Category labels in priority order; the first one present in the text wins
pub const CATEGORY_VOCABULARY: &[&str] = &[
    "Plastic Surgeon",
    "Doctor",
    "Medical Center",
    "Hospital",
    "Dentist",
    "Clinic",
    "Restaurant",
    "Shop",
    "Store",
    "Company",
    "Business",
    "Brand",
    "Product",
    "Service",
    "Artist",
    "Musician",
    "Public Figure",
    "Entrepreneur",
];

/// Path segments that never name a page
const RESERVED_PATHS: &[&str] = &["profile.php", "pages", "people", "pg", "p", "watch", "groups"];

fn title_from_main_heading(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_text(ctx.document, &MAIN_HEADING)
}

fn title_from_top_heading(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_text(ctx.document, &TOP_HEADING)
}

fn title_from_text_span(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_text(ctx.document, &TEXT_SPAN)
}

const TITLE_STRATEGIES: &[Strategy<String>] = &[
    title_from_main_heading,
    title_from_top_heading,
    title_from_text_span,
];

/// Page display name
#[must_use]
pub fn extract_title(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_of(ctx, TITLE_STRATEGIES)
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn id_from_path(ctx: &ExtractionContext<'_>) -> Option<String> {
    ctx.location
        .as_ref()?
        .path_segments()?
        .find(|segment| is_numeric(segment))
        .map(str::to_string)
}

fn id_from_profile_query(ctx: &ExtractionContext<'_>) -> Option<String> {
    let location = ctx.location.as_ref()?;
    if !location.path().ends_with("profile.php") {
        return None;
    }
    location
        .query_pairs()
        .find(|(key, value)| key == "id" && is_numeric(value))
        .map(|(_, value)| value.into_owned())
}

fn id_from_meta(ctx: &ExtractionContext<'_>, selector: &Selector) -> Option<String> {
    ctx.document
        .select(selector)
        .filter_map(|meta| meta.value().attr("content"))
        .find_map(|content| DIGIT_RUN.find(content))
        .map(|found| found.as_str().to_string())
}

fn id_from_android_app_link(ctx: &ExtractionContext<'_>) -> Option<String> {
    id_from_meta(ctx, &ANDROID_APP_LINK)
}

fn id_from_ios_app_link(ctx: &ExtractionContext<'_>) -> Option<String> {
    id_from_meta(ctx, &IOS_APP_LINK)
}

const ID_STRATEGIES: &[Strategy<String>] = &[
    id_from_path,
    id_from_profile_query,
    id_from_android_app_link,
    id_from_ios_app_link,
];

/// Numeric page id; seeds `pageId`, `facebookId` and `adLibrary.id`
#[must_use]
pub fn extract_page_id(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_of(ctx, ID_STRATEGIES)
}

/// First vocabulary label found in the visible text
#[must_use]
pub fn extract_category(ctx: &ExtractionContext<'_>) -> Option<&'static str> {
    CATEGORY_VOCABULARY
        .iter()
        .copied()
        .find(|label| ctx.text.contains(label))
}

/// Vanity handle from the final location, or the generic `people` name
#[must_use]
pub fn extract_page_name(ctx: &ExtractionContext<'_>) -> String {
    ctx.location
        .as_ref()
        .and_then(|location| location.path_segments()?.next().map(str::to_string))
        .filter(|segment| {
            !segment.is_empty() && !is_numeric(segment) && !RESERVED_PATHS.contains(&segment.as_str())
        })
        .unwrap_or_else(|| DEFAULT_PAGE_NAME.to_string())
}
