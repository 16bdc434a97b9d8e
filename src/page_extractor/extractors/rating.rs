//! Star rating, review count and creation date.

use regex::Regex;
use std::sync::LazyLock;

use super::ExtractionContext;

static STARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+\.?\d*)\s*(?:stars?|estrelas?)\b")
        .expect("STARS_RE: hardcoded regex is valid")
});

static NOT_YET_RATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)not yet rated|ainda não avaliado")
        .expect("NOT_YET_RATED_RE: hardcoded regex is valid")
});

static REVIEWS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d+)*)\s*(?:reviews?|avaliações|avaliação)")
        .expect("REVIEWS_RE: hardcoded regex is valid")
});

static CREATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Created|Criado|Joined|Ingressou).*?(\w+\s+\d+,\s+\d{4})")
        .expect("CREATED_RE: hardcoded regex is valid")
});

/// Display string used for pages without any rating
pub const NOT_YET_RATED: &str = "Not yet rated (0 Reviews)";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingSignal {
    /// The page states it has no rating yet
    NotYetRated,
    /// Overall star rating
    Stars(f64),
}

impl RatingSignal {
    /// Display string stored in both `rating` and `ratings`
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::NotYetRated => NOT_YET_RATED.to_string(),
            Self::Stars(value) => format!("{value} stars"),
        }
    }
}

/// Rating signal; an explicit "not yet rated" phrase anywhere on the page
/// outranks star-like numbers elsewhere
#[must_use]
pub fn extract_rating(ctx: &ExtractionContext<'_>) -> Option<RatingSignal> {
    if NOT_YET_RATED_RE.is_match(ctx.text) {
        return Some(RatingSignal::NotYetRated);
    }

    STARS_RE
        .captures_iter(ctx.text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|value| value.is_finite())
        .map(RatingSignal::Stars)
}

/// Number of reviews mentioned next to the rating
#[must_use]
pub fn extract_review_count(ctx: &ExtractionContext<'_>) -> Option<u64> {
    REVIEWS_RE
        .captures_iter(ctx.text)
        .filter_map(|caps| caps.get(1)?.as_str().replace(',', "").parse().ok())
        .next()
}

/// `<Month> <Day>, <Year>` following a created/joined phrase, verbatim
#[must_use]
pub fn extract_creation_date(ctx: &ExtractionContext<'_>) -> Option<String> {
    CREATED_RE
        .captures(ctx.text)
        .and_then(|caps| caps.get(1))
        .map(|found| found.as_str().to_string())
}
