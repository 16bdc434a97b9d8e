//! Extraction engine tests over whole documents

mod common;

use common::{anchors_html, page_html, profile_html};
use kodegen_tools_pagescrape::utils::{is_messenger_host, is_platform_host};
use kodegen_tools_pagescrape::{
    AdStatus, ExtractOptions, PageProfile, PageRecord, PageSnapshot, extract_page_data,
};
use proptest::prelude::*;
use std::collections::HashSet;
use url::Url;

const ACME: &str = "https://www.facebook.com/acmedental";

fn extract(url: &str, html: &str) -> PageProfile {
    extract_page_data(url, &PageSnapshot::from_html(url, html), &ExtractOptions::default())
}

fn body(text: &str) -> String {
    page_html("", &format!("<div>{}</div>", html_escape::encode_text(text)))
}

#[test]
fn heading_app_link_and_counts_fill_identity_and_popularity() {
    let html = profile_html("Acme Dental", "123456789", "1,234 likes · 500 followers");
    let profile = extract(ACME, &html);

    assert_eq!(profile.title.as_deref(), Some("Acme Dental"));
    assert_eq!(profile.page_id.as_deref(), Some("123456789"));
    assert_eq!(profile.facebook_id.as_deref(), Some("123456789"));
    assert_eq!(profile.ad_library.id.as_deref(), Some("123456789"));
    assert_eq!(profile.likes, Some(1234));
    assert_eq!(profile.followers, Some(500));
    assert_eq!(profile.page_name, "acmedental");
    assert_eq!(
        profile.profile_photo.as_deref(),
        Some("https://www.facebook.com/photo/?fbid=123456789&set=a.123456789")
    );
    assert_eq!(profile.info, ["Acme Dental. 1234 likes"]);
}

#[test]
fn about_section_page() {
    let html = page_html(
        r#"<meta property="al:ios:url" content="fb://profile/998877">"#,
        r#"
        <div role="main">
            <h1>Sorriso Clínica</h1>
            <span>Dentist</span>
            <div data-ad-rendering-role="profile_bio">Family dentistry in the heart of Lisbon since 1998.</div>
            <span>+351 21 123 4567</span>
            <a href="https://l.facebook.com/l.php?u=https%3A%2F%2Fsorriso.example%2F&amp;h=abc">site</a>
            <a href="https://sorriso.example/">site again</a>
            <a href="https://m.me/sorriso">message</a>
            <a href="https://www.facebook.com/sorriso/reviews">reviews</a>
            <span>4.8 stars</span><span>120 reviews</span>
            <span>Page created - March 3, 2015</span>
            <span>This Page is currently running ads.</span>
            <img src="https://scontent.xx.fbcdn.net/v/t39/photo.jpg">
        </div>"#,
    );
    let profile = extract("https://www.facebook.com/sorriso", &html);

    assert_eq!(profile.page_id.as_deref(), Some("998877"));
    assert_eq!(profile.category.as_deref(), Some("Dentist"));
    assert_eq!(profile.categories, ["Page", "Dentist"]);
    assert_eq!(
        profile.intro.as_deref(),
        Some("Family dentistry in the heart of Lisbon since 1998.")
    );
    assert_eq!(profile.phone.as_deref(), Some("+351 21 123 4567"));
    assert_eq!(profile.websites, ["https://sorriso.example/"]);
    assert_eq!(profile.messenger.as_deref(), Some("https://m.me/sorriso"));
    assert_eq!(profile.rating_overall, Some(4.8));
    assert_eq!(profile.rating.as_deref(), Some("4.8 stars"));
    assert_eq!(profile.ratings.as_deref(), Some("4.8 stars"));
    assert_eq!(profile.rating_count, 120);
    assert_eq!(profile.creation_date.as_deref(), Some("March 3, 2015"));
    assert_eq!(profile.ad_status, AdStatus::Active);
    assert!(profile.ad_library.is_active);
    assert_eq!(
        profile.profile_picture_url.as_deref(),
        Some("https://scontent.xx.fbcdn.net/v/t39/photo.jpg")
    );
    assert_eq!(profile.info.len(), 2);
}

#[test]
fn empty_document_keeps_every_key_with_defaults() {
    let profile = extract(ACME, &page_html("", ""));
    let json = serde_json::to_value(PageRecord::from(profile)).unwrap();
    let object = json.as_object().unwrap();

    for key in [
        "facebookUrl",
        "pageUrl",
        "search_run_id",
        "categories",
        "info",
        "likes",
        "messenger",
        "title",
        "pageId",
        "pageName",
        "intro",
        "websites",
        "phone",
        "rating",
        "followers",
        "followings",
        "profilePictureUrl",
        "profilePhoto",
        "ratingOverall",
        "ratingCount",
        "category",
        "ratings",
        "creation_date",
        "adStatus",
        "adStatusText",
        "facebookId",
        "adLibrary",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert!(!object.contains_key("error"));
    assert_eq!(json["followings"], 0);
    assert_eq!(json["ratingCount"], 0);
    assert_eq!(json["pageId"], serde_json::Value::Null);
    assert_eq!(json["adLibrary"]["isActive"], false);
    assert_eq!(json["adStatus"], "unknown");
}

fn with_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn external_url() -> impl Strategy<Value = String> {
    (0u8..6, "[a-z]{1,6}").prop_map(|(site, path)| format!("https://site{site}.example/{path}"))
}

fn any_href() -> impl Strategy<Value = String> {
    prop_oneof![
        external_url(),
        "[a-z]{1,8}".prop_map(|p| format!("https://www.facebook.com/{p}")),
        "[a-z]{1,8}".prop_map(|p| format!("https://m.facebook.com/{p}")),
        "[a-z]{1,8}".prop_map(|p| format!("https://m.me/{p}")),
        "[a-z]{1,8}".prop_map(|p| format!("https://www.messenger.com/t/{p}")),
        external_url().prop_map(|target| format!(
            "https://l.facebook.com/l.php?u={}",
            url::form_urlencoded::byte_serialize(target.as_bytes()).collect::<String>()
        )),
        "[a-z]{1,8}".prop_map(|p| format!("mailto:{p}@example.com")),
        "[a-z]{1,8}".prop_map(|p| format!("/{p}")),
    ]
}

proptest! {
    #[test]
    fn counts_floor_number_times_magnitude(
        whole in 0u64..1_000_000,
        tenths in proptest::option::of(0u64..10),
        suffix in prop_oneof![Just(None), Just(Some('K')), Just(Some('m')), Just(Some('B'))],
        unit in prop_oneof![Just("followers"), Just("seguidores")],
    ) {
        let multiplier = match suffix {
            None => 1,
            Some('K') => 1_000,
            Some('m') => 1_000_000,
            _ => 1_000_000_000,
        };
        let number = match tenths {
            Some(d) => format!("{}.{d}", with_separators(whole)),
            None => with_separators(whole),
        };
        let suffix_text = suffix.map(String::from).unwrap_or_default();
        let text = format!("Visit us · {number}{suffix_text} {unit}");

        let profile = extract(ACME, &body(&text));
        let expected = whole * multiplier + tenths.unwrap_or(0) * multiplier / 10;
        prop_assert_eq!(profile.followers, Some(expected));
        prop_assert_eq!(profile.likes, None);
    }

    #[test]
    fn websites_exclude_platform_hosts_and_duplicates(hrefs in proptest::collection::vec(any_href(), 0..20)) {
        let profile = extract(ACME, &anchors_html(&hrefs));

        let mut seen = HashSet::new();
        for site in &profile.websites {
            let parsed = Url::parse(site).unwrap();
            let host = parsed.host_str().unwrap();
            prop_assert!(!is_platform_host(host), "platform host kept: {}", site);
            prop_assert!(!is_messenger_host(host), "messenger host kept: {}", site);
            prop_assert!(seen.insert(site.clone()), "duplicate: {}", site);
        }

        for href in hrefs.iter().filter(|href| href.starts_with("https://site")) {
            prop_assert!(profile.websites.contains(href), "lost {}", href);
        }
    }

    #[test]
    fn identity_fields_agree(id in proptest::option::of("[1-9][0-9]{4,15}")) {
        let head = id
            .as_ref()
            .map(|id| format!(r#"<meta name="al:android:url" content="fb://page/{id}">"#))
            .unwrap_or_default();
        let profile = extract(ACME, &page_html(&head, "<h1>Acme</h1>"));

        prop_assert_eq!(&profile.page_id, &id);
        prop_assert_eq!(&profile.facebook_id, &id);
        prop_assert_eq!(&profile.ad_library.id, &id);
        prop_assert_eq!(profile.profile_photo.is_some(), id.is_some());
    }

    #[test]
    fn not_yet_rated_wins_over_numeric_text(stars in 1u32..50) {
        let text = format!("{}.{} stars from elsewhere · Not yet rated", stars / 10, stars % 10);
        let profile = extract(ACME, &body(&text));

        prop_assert_eq!(profile.rating_count, 0);
        prop_assert_eq!(profile.rating.as_deref(), Some("Not yet rated (0 Reviews)"));
        prop_assert_eq!(profile.rating_overall, None);
    }

    #[test]
    fn review_count_applies_on_either_rating_branch(
        not_yet_rated in any::<bool>(),
        reviews in 1u64..100_000,
    ) {
        let rating = if not_yet_rated { "Not yet rated" } else { "4.2 stars" };
        let text = format!("{rating} · {} reviews", with_separators(reviews));
        let profile = extract(ACME, &body(&text));

        prop_assert_eq!(profile.rating_count, reviews);
        prop_assert_eq!(profile.rating_overall.is_none(), not_yet_rated);
    }

    #[test]
    fn extraction_is_idempotent(text in "[ -~]{0,200}", hrefs in proptest::collection::vec(any_href(), 0..5)) {
        let html = page_html("", &format!(
            "<p>{}</p>{}",
            html_escape::encode_text(&text),
            anchors_html(&hrefs)
        ));
        let snapshot = PageSnapshot::from_html(ACME, html);
        let options = ExtractOptions::default();

        let first = serde_json::to_string(&extract_page_data(ACME, &snapshot, &options)).unwrap();
        let second = serde_json::to_string(&extract_page_data(ACME, &snapshot, &options)).unwrap();
        prop_assert_eq!(first, second);
    }
}
