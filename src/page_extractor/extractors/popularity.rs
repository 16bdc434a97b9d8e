//! Likes / followers counts.
//!
//! One pass over the visible text yields tagged matches; a reducer assigns
//! them to fields, later matches overwriting earlier ones.

use regex::Regex;
use std::sync::LazyLock;

use super::ExtractionContext;

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d+)*(?:\.\d+)?)\s*([kmb])?\s*(likes|followers|seguidores|curtidas)")
        .expect("COUNT_RE: hardcoded regex is valid")
});

/// Which field a count mention belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountKind {
    Likes,
    Followers,
}

impl CountKind {
    fn from_unit(unit: &str) -> Option<Self> {
        match unit.to_ascii_lowercase().as_str() {
            "likes" | "curtidas" => Some(Self::Likes),
            "followers" | "seguidores" => Some(Self::Followers),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountMatch {
    pub kind: CountKind,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopularityCounts {
    pub likes: Option<u64>,
    pub followers: Option<u64>,
}

impl PopularityCounts {
    fn apply(mut self, found: CountMatch) -> Self {
        match found.kind {
            CountKind::Likes => self.likes = Some(found.value),
            CountKind::Followers => self.followers = Some(found.value),
        }
        self
    }
}

/// `floor(number * magnitude)` for a thousands-separated decimal and an
/// optional `K`/`M`/`B` suffix
///
/// Computed on integers so `12.5K` is exactly 12500. `None` when the value
/// does not fit in a `u64`.
#[must_use]
pub fn parse_count(number: &str, suffix: Option<char>) -> Option<u64> {
    let multiplier: u64 = match suffix.map(|c| c.to_ascii_uppercase()) {
        None => 1,
        Some('K') => 1_000,
        Some('M') => 1_000_000,
        Some('B') => 1_000_000_000,
        Some(_) => return None,
    };

    let digits: String = number.chars().filter(|c| *c != ',').collect();
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits.as_str(), ""),
    };

    let whole: u64 = whole.parse().ok()?;
    let mut value = whole.checked_mul(multiplier)?;

    // Digits past the ninth can never move the floor for multipliers up to 1e9
    let fraction = &fraction[..fraction.len().min(9)];
    if !fraction.is_empty() {
        let numerator: u64 = fraction.parse().ok()?;
        let denominator = 10u64.pow(fraction.len() as u32);
        let scaled = u128::from(numerator) * u128::from(multiplier) / u128::from(denominator);
        value = value.checked_add(u64::try_from(scaled).ok()?)?;
    }

    Some(value)
}

/// Every count mention in `text`, in order of appearance
pub fn scan_counts(text: &str) -> impl Iterator<Item = CountMatch> + '_ {
    COUNT_RE.captures_iter(text).filter_map(|caps| {
        let kind = CountKind::from_unit(caps.get(3)?.as_str())?;
        let suffix = caps.get(2).and_then(|m| m.as_str().chars().next());
        let value = parse_count(caps.get(1)?.as_str(), suffix)?;
        Some(CountMatch { kind, value })
    })
}

#[must_use]
pub fn extract_counts(ctx: &ExtractionContext<'_>) -> PopularityCounts {
    scan_counts(ctx.text).fold(PopularityCounts::default(), PopularityCounts::apply)
}
