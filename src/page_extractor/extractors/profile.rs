//! Intro/bio text and profile picture.

use scraper::Selector;
use std::sync::LazyLock;

use super::{ExtractionContext, Strategy, element_text, first_of, first_text};

static BIO_ROLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[data-ad-rendering-role="profile_bio"]"#)
        .expect("BUG: hardcoded CSS selector for profile_bio is invalid")
});

static BIO_CLASS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class*="bio"]"#)
        .expect("BUG: hardcoded CSS selector '[class*=\"bio\"]' is invalid")
});

static INTRO_CLASS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[class*="intro"]"#)
        .expect("BUG: hardcoded CSS selector '[class*=\"intro\"]' is invalid")
});

static TEXT_BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"p, div[dir="auto"]"#)
        .expect("BUG: hardcoded CSS selector 'p, div[dir=\"auto\"]' is invalid")
});

static IMAGES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[src]").expect("BUG: hardcoded CSS selector 'img[src]' is invalid")
});

/// Fallback intro candidates must be strictly longer than this...
const MIN_INTRO_CHARS: usize = 20;
/// ...and strictly shorter than this
const MAX_INTRO_CHARS: usize = 500;

/// Words that mark a block as UI chrome rather than a bio
const CHROME_WORDS: &[&str] = &["Like", "Share"];

fn intro_from_bio_role(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_text(ctx.document, &BIO_ROLE)
}

fn intro_from_bio_class(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_text(ctx.document, &BIO_CLASS)
}

fn intro_from_intro_class(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_text(ctx.document, &INTRO_CLASS)
}

fn intro_from_text_blocks(ctx: &ExtractionContext<'_>) -> Option<String> {
    ctx.document
        .select(&TEXT_BLOCKS)
        .map(element_text)
        .find(|text| {
            let len = text.chars().count();
            len > MIN_INTRO_CHARS
                && len < MAX_INTRO_CHARS
                && !CHROME_WORDS.iter().any(|word| text.contains(word))
        })
}

const INTRO_STRATEGIES: &[Strategy<String>] = &[
    intro_from_bio_role,
    intro_from_bio_class,
    intro_from_intro_class,
    intro_from_text_blocks,
];

#[must_use]
pub fn extract_intro(ctx: &ExtractionContext<'_>) -> Option<String> {
    first_of(ctx, INTRO_STRATEGIES)
}

fn is_media_cdn(host: &str) -> bool {
    host.contains("fbcdn") || host.starts_with("scontent")
}

/// First image served from the platform's media CDN, in document order
#[must_use]
pub fn extract_profile_picture(ctx: &ExtractionContext<'_>) -> Option<String> {
    ctx.document
        .select(&IMAGES)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(|src| ctx.resolve(src))
        .find(|url| url.host_str().is_some_and(is_media_cdn))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const LOCATION: &str = "https://www.facebook.com/acmedental";

    fn intro_of(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let ctx = ExtractionContext::new(&document, LOCATION, "");
        extract_intro(&ctx)
    }

    #[test]
    fn bio_role_wins() {
        let html = r#"
            <div class="intro-card">Card intro text</div>
            <span data-ad-rendering-role="profile_bio">Family dentistry since 1998</span>
        "#;
        assert_eq!(intro_of(html).as_deref(), Some("Family dentistry since 1998"));
    }

    #[test]
    fn class_based_bio_before_text_fallback() {
        let html = r#"
            <p>This paragraph is long enough to qualify as an intro.</p>
            <div class="x1 page-bio">Short bio</div>
        "#;
        assert_eq!(intro_of(html).as_deref(), Some("Short bio"));
    }

    #[test]
    fn fallback_skips_short_long_and_chrome_blocks() {
        let long = "x".repeat(600);
        let html = format!(
            r#"
            <p>Too short</p>
            <p>{long}</p>
            <div dir="auto">Like this page to see more updates</div>
            <p>Gentle dental care for the whole family.</p>
            "#
        );
        assert_eq!(
            intro_of(&html).as_deref(),
            Some("Gentle dental care for the whole family.")
        );
        assert_eq!(intro_of("<p>Too short</p>"), None);
    }

    #[test]
    fn picture_comes_from_media_cdn() {
        let html = r#"
            <img src="/images/logo.png">
            <img src="https://static.xx.fbcdn.net/rsrc.php/icon.png">
            <img src="https://scontent.fgru5-1.fna.fbcdn.net/v/t39/photo.jpg">
        "#;
        let document = Html::parse_document(html);
        let ctx = ExtractionContext::new(&document, LOCATION, "");
        assert_eq!(
            extract_profile_picture(&ctx).as_deref(),
            Some("https://static.xx.fbcdn.net/rsrc.php/icon.png")
        );

        let none = Html::parse_document(r#"<img src="https://acme.example/me.jpg">"#);
        let ctx = ExtractionContext::new(&none, LOCATION, "");
        assert_eq!(extract_profile_picture(&ctx), None);
    }
}
