//! Settings file sections.

use crate::feed::FeedSettings;
use crate::source::Period;
use crate::storage::StorageScheme;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level structure of `trending-feed.toml`.
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults used by the hosted feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Where the seen-set and the rendered feeds are stored.
    pub storage: StorageSettings,

    /// Where trending candidates come from.
    pub source: SourceSettings,

    /// Natural-language filtering policy.
    pub filter: FilterSettings,

    /// Feed header shown to subscribers.
    pub feed: FeedSettings,
}

/// The `[storage]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StorageSettings {
    /// Storage backend (`s3` or `file`).
    pub scheme: StorageScheme,

    /// Bucket name. Required for the `s3` scheme.
    pub bucket: Option<String>,

    /// Object key of the seen-set. Feeds are stored next to it with
    /// `.atom` and `.rss` suffixes.
    pub key: String,

    /// Base directory for the `file` scheme.
    pub root: PathBuf,

    /// Grant public read access on uploaded objects.
    pub public_read: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            scheme: StorageScheme::S3,
            bucket: None,
            key: "github_trending_all_daily".to_string(),
            root: PathBuf::from("."),
            public_read: true,
        }
    }
}

/// The `[source]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SourceSettings {
    /// Trending window.
    pub period: Period,

    /// Programming language slug, or `all`.
    pub category: String,

    /// Trending page URL.
    pub base_url: String,

    /// User agent sent with the trending request.
    pub user_agent: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            period: Period::Daily,
            category: "all".to_string(),
            base_url: "https://github.com/trending".to_string(),
            user_agent: concat!("trending-feed/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

/// The `[filter]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterSettings {
    /// ISO 639-3 codes whose descriptions are dropped from the feed.
    pub excluded_languages: Vec<String>,

    /// Detections below this confidence count as "no match".
    pub min_confidence: f64,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            excluded_languages: vec!["cmn".to_string(), "kor".to_string()],
            min_confidence: 0.0,
        }
    }
}
