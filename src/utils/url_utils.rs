//! URL helpers for start-URL normalization and host classification.

use url::Url;

use super::constants::{MESSENGER_HOSTS, PLATFORM_HOSTS, PLATFORM_PAGE_BASE};

/// Normalize one start URL entry
///
/// Anything that does not already start with `http` is treated as a bare
/// page identifier (vanity name or numeric id) and expanded against the
/// canonical page base. Returns `None` for blank entries.
#[must_use]
pub fn normalize_start_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with("http") {
        return Some(trimmed.to_string());
    }

    let identifier = trimmed.trim_start_matches('/');
    if identifier.is_empty() {
        return None;
    }

    Some(format!("{PLATFORM_PAGE_BASE}{identifier}"))
}

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// True when `host` is `domain` itself or one of its subdomains
#[must_use]
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// True for hosts belonging to the platform itself
#[must_use]
pub fn is_platform_host(host: &str) -> bool {
    PLATFORM_HOSTS.iter().any(|domain| host_matches(host, domain))
}

/// True for hosts belonging to the messaging sub-product
#[must_use]
pub fn is_messenger_host(host: &str) -> bool {
    MESSENGER_HOSTS.iter().any(|domain| host_matches(host, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_identifiers_are_expanded() {
        assert_eq!(
            normalize_start_url("acmedental").as_deref(),
            Some("https://www.facebook.com/acmedental")
        );
        assert_eq!(
            normalize_start_url("  /123456789 ").as_deref(),
            Some("https://www.facebook.com/123456789")
        );
    }

    #[test]
    fn absolute_urls_are_kept() {
        assert_eq!(
            normalize_start_url("https://www.facebook.com/acme").as_deref(),
            Some("https://www.facebook.com/acme")
        );
        assert_eq!(
            normalize_start_url("http://example.com").as_deref(),
            Some("http://example.com")
        );
    }

    #[test]
    fn blank_entries_are_dropped() {
        assert_eq!(normalize_start_url(""), None);
        assert_eq!(normalize_start_url("   "), None);
        assert_eq!(normalize_start_url("///"), None);
    }

    #[test]
    fn host_classification() {
        assert!(is_platform_host("www.facebook.com"));
        assert!(is_platform_host("facebook.com"));
        assert!(is_platform_host("l.facebook.com"));
        assert!(is_platform_host("fb.com"));
        assert!(!is_platform_host("notfacebook.com"));
        assert!(!is_platform_host("facebook.com.evil.example"));
        assert!(is_platform_host("WWW.FACEBOOK.COM."));
        assert!(!is_platform_host("scontent.xx.fbcdn.net"));
        assert!(is_messenger_host("m.me"));
        assert!(is_messenger_host("www.messenger.com"));
        assert!(!is_messenger_host("acme.me"));
    }

    #[test]
    fn only_http_schemes_are_valid() {
        assert!(is_valid_url("https://acme.example/"));
        assert!(!is_valid_url("mailto:hi@acme.example"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url(""));
    }
}
