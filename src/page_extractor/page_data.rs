//! Extraction engine
//!
//! Assembles one [`PageProfile`] from a static [`PageSnapshot`]. The engine
//! never fails: every extractor degrades to absence, and every output field
//! starts at its documented default. Extraction is synchronous and holds
//! the parsed document only for the duration of the call.

use scraper::Html;

use super::extractors::{
    ExtractionContext, RatingSignal, extract_ad_status, extract_category, extract_counts,
    extract_creation_date, extract_intro, extract_messenger, extract_page_id, extract_page_name,
    extract_phone, extract_profile_picture, extract_rating, extract_review_count, extract_title,
    extract_websites,
};
use super::schema::{AdLibrary, PageProfile};
use super::snapshot::PageSnapshot;
use crate::utils::constants::{DEFAULT_MIN_PHONE_DIGITS, PLATFORM_PAGE_BASE};

/// Knobs that change what the engine extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Run the "about" group (intro, phone, websites, messenger, creation date)
    pub scrape_about: bool,
    /// Minimum digit count for a phone candidate
    pub min_phone_digits: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            scrape_about: true,
            min_phone_digits: DEFAULT_MIN_PHONE_DIGITS,
        }
    }
}

/// Media lookup URL for a page id
#[must_use]
pub fn profile_photo_url(page_id: &str) -> String {
    format!("{PLATFORM_PAGE_BASE}photo/?fbid={page_id}&set=a.{page_id}")
}

/// Extract a profile record from one snapshot
///
/// `page_url` is the normalized input URL the attempt was dispatched for;
/// the snapshot's own URL becomes `facebookUrl`.
#[must_use]
pub fn extract_page_data(
    page_url: &str,
    snapshot: &PageSnapshot,
    options: &ExtractOptions,
) -> PageProfile {
    let document = Html::parse_document(&snapshot.html);
    let ctx = ExtractionContext::new(&document, &snapshot.url, &snapshot.visible_text);

    let mut profile = PageProfile {
        facebook_url: snapshot.url.clone(),
        page_url: page_url.to_string(),
        page_name: extract_page_name(&ctx),
        ..PageProfile::default()
    };

    profile.title = extract_title(&ctx);

    if let Some(id) = extract_page_id(&ctx) {
        profile.page_id = Some(id.clone());
        profile.facebook_id = Some(id.clone());
        profile.ad_library.id = Some(id);
    }

    if let Some(category) = extract_category(&ctx) {
        profile.category = Some(category.to_string());
        profile.categories.extend(["Page".to_string(), category.to_string()]);
    }

    let counts = extract_counts(&ctx);
    profile.likes = counts.likes;
    profile.followers = counts.followers;

    profile.profile_picture_url = extract_profile_picture(&ctx);

    if options.scrape_about {
        profile.intro = extract_intro(&ctx);
        profile.phone = extract_phone(&ctx, options.min_phone_digits);
        profile.websites = extract_websites(&ctx);
        profile.messenger = extract_messenger(&ctx);
        profile.creation_date = extract_creation_date(&ctx);
    }

    apply_rating(&mut profile, &ctx);

    let ad_status = extract_ad_status(&ctx);
    profile.ad_status = ad_status.status;
    profile.ad_status_text = ad_status.display().map(str::to_string);
    profile.ad_library = AdLibrary {
        is_active: ad_status.is_active(),
        id: profile.ad_library.id.take(),
    };

    profile.info = build_info(&profile);
    profile.profile_photo = profile.page_id.as_deref().map(profile_photo_url);

    profile
}

fn apply_rating(profile: &mut PageProfile, ctx: &ExtractionContext<'_>) {
    match extract_rating(ctx) {
        Some(RatingSignal::NotYetRated) => {
            let display = RatingSignal::NotYetRated.display();
            profile.rating = Some(display.clone());
            profile.ratings = Some(display);
            profile.rating_count = 0;
        }
        Some(signal @ RatingSignal::Stars(value)) => {
            let display = signal.display();
            profile.rating_overall = Some(value);
            profile.rating = Some(display.clone());
            profile.ratings = Some(display);
        }
        None => {}
    }

    if let Some(count) = extract_review_count(ctx) {
        profile.rating_count = count;
    }
}

/// Display rollup of already-extracted fields
fn build_info(profile: &PageProfile) -> Vec<String> {
    let mut info = Vec::new();
    if let Some(title) = &profile.title {
        match profile.likes {
            Some(likes) => info.push(format!("{title}. {likes} likes")),
            None => info.push(title.clone()),
        }
    }
    if let Some(intro) = &profile.intro {
        info.push(intro.clone());
    }
    info
}
