use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Whether the page is currently running paid promotions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdStatus {
    Active,
    Inactive,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdLibrary {
    pub is_active: bool,
    pub id: Option<String>,
}

/// Successful extraction result for one page
///
/// Every key is always serialized; unknown values are explicit nulls or
/// the documented defaults (`followings = 0`, `ratingCount = 0`, empty lists).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProfile {
    /// Location the browser ended up on
    pub facebook_url: String,
    /// Normalized input URL
    pub page_url: String,
    #[serde(rename = "search_run_id")]
    pub search_run_id: Option<String>,
    pub categories: Vec<String>,
    pub info: Vec<String>,
    pub likes: Option<u64>,
    pub messenger: Option<String>,
    pub title: Option<String>,
    pub page_id: Option<String>,
    pub page_name: String,
    pub intro: Option<String>,
    pub websites: Vec<String>,
    pub phone: Option<String>,
    pub rating: Option<String>,
    pub followers: Option<u64>,
    pub followings: u64,
    pub profile_picture_url: Option<String>,
    pub profile_photo: Option<String>,
    pub rating_overall: Option<f64>,
    pub rating_count: u64,
    pub category: Option<String>,
    pub ratings: Option<String>,
    #[serde(rename = "creation_date")]
    pub creation_date: Option<String>,
    pub ad_status: AdStatus,
    pub ad_status_text: Option<String>,
    pub facebook_id: Option<String>,
    pub ad_library: AdLibrary,
}

/// Terminal failure record for a URL whose retries were exhausted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub facebook_url: String,
    pub page_url: String,
    #[serde(rename = "search_run_id")]
    pub search_run_id: Option<String>,
    pub error: String,
    /// RFC 3339 UTC with millisecond precision
    pub timestamp: String,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(page_url: &str, search_run_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            facebook_url: page_url.to_string(),
            page_url: page_url.to_string(),
            search_run_id,
            error: error.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// One emitted output record; a record is either a profile or an error,
/// never both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRecord {
    Error(ErrorRecord),
    Page(Box<PageProfile>),
}

impl PageRecord {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn page_url(&self) -> &str {
        match self {
            Self::Page(profile) => &profile.page_url,
            Self::Error(err) => &err.page_url,
        }
    }

    #[must_use]
    pub fn as_page(&self) -> Option<&PageProfile> {
        match self {
            Self::Page(profile) => Some(profile),
            Self::Error(_) => None,
        }
    }

    #[must_use]
    pub fn as_error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Error(err) => Some(err),
            Self::Page(_) => None,
        }
    }
}

impl From<PageProfile> for PageRecord {
    fn from(profile: PageProfile) -> Self {
        Self::Page(Box::new(profile))
    }
}

impl From<ErrorRecord> for PageRecord {
    fn from(err: ErrorRecord) -> Self {
        Self::Error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serializes_every_key_with_mixed_casing() {
        let value = serde_json::to_value(PageProfile::default()).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "facebookUrl",
            "pageUrl",
            "search_run_id",
            "creation_date",
            "ratingCount",
            "adLibrary",
            "profilePhoto",
        ] {
            assert!(obj.contains_key(key), "missing key {key}");
        }
        assert_eq!(obj["followings"], 0);
        assert_eq!(obj["adStatus"], "unknown");
        assert!(obj["likes"].is_null());
        assert_eq!(obj["adLibrary"]["isActive"], false);
    }

    #[test]
    fn error_records_round_trip_as_errors() {
        let record = PageRecord::from(ErrorRecord::new(
            "https://www.facebook.com/acme",
            Some("run-1".into()),
            "Content loaded timeout after 60 seconds",
        ));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"error\""));
        assert!(!json.contains("\"likes\""));

        let parsed: PageRecord = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_error());
        assert_eq!(parsed.page_url(), "https://www.facebook.com/acme");
    }

    #[test]
    fn timestamps_are_utc_millis() {
        let err = ErrorRecord::new("https://www.facebook.com/acme", None, "boom");
        assert!(err.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&err.timestamp).is_ok());
    }
}
