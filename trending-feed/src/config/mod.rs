//! Settings loading.
//!
//! Settings come from three layers, later layers winning:
//! the TOML file, environment variables, then CLI flags (applied by the caller).

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{FilterSettings, Settings, SourceSettings, StorageSettings};

use crate::language::LanguageCode;
use crate::storage::{StoragePath, StorageScheme};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Default settings file name, looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "trending-feed.toml";

const BUCKET_ENV: &str = "S3_BUCKET";
const STATE_KEY_ENV: &str = "TRENDING_FEED_STATE_KEY";
const EXCLUDED_LANGUAGES_ENV: &str = "TRENDING_FEED_EXCLUDED_LANGUAGES";

impl Settings {
    /// Loads settings from a TOML file, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `path` does not exist, or a
    /// read/parse error if it cannot be loaded.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }
        let mut settings = Self::parse_file(path)?;
        settings.apply_env();
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = if path.exists() {
            Self::parse_file(path)?
        } else {
            debug!(path = %path.display(), "No settings file, using defaults");
            Self::default()
        };
        settings.apply_env();
        Ok(settings)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading settings");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::TomlError {
            path: path.display().to_string(),
            source,
        })
    }

    /// Applies environment variable overrides.
    ///
    /// Environment variables take precedence over the settings file.
    pub fn apply_env(&mut self) {
        if let Some(bucket) = non_empty_env(BUCKET_ENV) {
            self.storage.bucket = Some(bucket);
        }
        if let Some(key) = non_empty_env(STATE_KEY_ENV) {
            self.storage.key = key;
        }
        if let Some(codes) = non_empty_env(EXCLUDED_LANGUAGES_ENV) {
            self.filter.excluded_languages = codes
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Checks every setting the run depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.state_path()?;
        self.excluded_languages()?;

        if !(0.0..=1.0).contains(&self.filter.min_confidence) {
            return Err(ConfigError::invalid(
                "filter.min-confidence",
                format!("{} is outside 0.0-1.0", self.filter.min_confidence),
            ));
        }

        if Url::parse(&self.source.base_url).is_err() {
            return Err(ConfigError::invalid(
                "source.base-url",
                format!("not a valid URL: {}", self.source.base_url),
            ));
        }

        if self.source.category.trim().is_empty() {
            return Err(ConfigError::invalid("source.category", "must not be empty"));
        }

        if Url::parse(&self.feed.link).is_err() {
            return Err(ConfigError::invalid(
                "feed.link",
                format!("not a valid URL: {}", self.feed.link),
            ));
        }

        Ok(())
    }

    /// Storage path of the seen-set.
    ///
    /// The feeds live at the same path with `.atom` and `.rss` appended.
    pub fn state_path(&self) -> Result<StoragePath, ConfigError> {
        let key = self.storage.key.trim_matches('/');
        if key.is_empty() {
            return Err(ConfigError::invalid("storage.key", "must not be empty"));
        }

        let bucket = match (&self.storage.scheme, self.storage.bucket.as_deref()) {
            (_, Some(bucket)) if !bucket.trim().is_empty() => bucket.trim().to_string(),
            (StorageScheme::File, _) => "state".to_string(),
            (StorageScheme::S3, _) => {
                return Err(ConfigError::invalid(
                    "storage.bucket",
                    format!("not configured; set {BUCKET_ENV} or storage.bucket"),
                ))
            }
        };

        Ok(StoragePath::new(self.storage.scheme, bucket, key))
    }

    /// Parsed excluded-language set.
    pub fn excluded_languages(&self) -> Result<HashSet<LanguageCode>, ConfigError> {
        self.filter
            .excluded_languages
            .iter()
            .map(|code| {
                LanguageCode::parse(code).ok_or_else(|| {
                    ConfigError::invalid(
                        "filter.excluded-languages",
                        format!("'{code}' is not an ISO 639-3 code"),
                    )
                })
            })
            .collect()
    }
}

/// Reads an environment variable, ignoring unset and blank values.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Period;
    use std::fs;
    use tempfile::TempDir;

    fn write_settings(temp: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = temp.path().join(DEFAULT_SETTINGS_FILE);
        fs::write(&path, contents).unwrap();
        path
    }

    fn without_overrides<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset([BUCKET_ENV, STATE_KEY_ENV, EXCLUDED_LANGUAGES_ENV], f)
    }

    #[test]
    fn load_parses_all_sections() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            &temp,
            r#"
[storage]
bucket = "feeds"
key = "trending/rust_weekly"
public-read = false

[source]
period = "weekly"
category = "rust"
timeout-secs = 5

[filter]
excluded-languages = ["jpn"]
min-confidence = 0.5

[feed]
title = "Rust weekly"
"#,
        );

        let settings = without_overrides(|| Settings::load(&path)).unwrap();

        assert_eq!(settings.storage.bucket.as_deref(), Some("feeds"));
        assert!(!settings.storage.public_read);
        assert_eq!(settings.source.period, Period::Weekly);
        assert_eq!(settings.source.category, "rust");
        assert_eq!(settings.source.timeout_secs, 5);
        assert_eq!(settings.filter.excluded_languages, vec!["jpn"]);
        assert_eq!(settings.feed.title, "Rust weekly");
        assert_eq!(
            settings.state_path().unwrap().to_string(),
            "s3://feeds/trending/rust_weekly"
        );
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = Settings::load(&temp.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn load_or_default_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let settings =
            without_overrides(|| Settings::load_or_default(&temp.path().join("missing.toml")))
                .unwrap();

        assert_eq!(settings.storage.key, "github_trending_all_daily");
        assert_eq!(settings.source.period, Period::Daily);
        assert_eq!(settings.filter.excluded_languages, vec!["cmn", "kor"]);
    }

    #[test]
    fn load_rejects_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(&temp, "[storage\nbucket = ");
        let result = Settings::load(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = write_settings(
            &temp,
            r#"
[storage]
bucket = "from-file"
"#,
        );

        let settings = temp_env::with_vars(
            [
                (BUCKET_ENV, Some("from-env")),
                (STATE_KEY_ENV, Some("custom_key")),
                (EXCLUDED_LANGUAGES_ENV, Some(" rus , ,jpn")),
            ],
            || Settings::load(&path),
        )
        .unwrap();

        assert_eq!(settings.storage.bucket.as_deref(), Some("from-env"));
        assert_eq!(settings.storage.key, "custom_key");
        assert_eq!(settings.filter.excluded_languages, vec!["rus", "jpn"]);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut settings = Settings::default();
        settings.storage.bucket = Some("kept".to_string());

        temp_env::with_var(BUCKET_ENV, Some("   "), || settings.apply_env());

        assert_eq!(settings.storage.bucket.as_deref(), Some("kept"));
    }

    #[test]
    fn validate_requires_bucket_for_s3() {
        let settings = Settings::default();
        let result = settings.validate();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "storage.bucket"
        ));
    }

    #[test]
    fn file_scheme_does_not_need_bucket() {
        let mut settings = Settings::default();
        settings.storage.scheme = StorageScheme::File;

        settings.validate().unwrap();
        assert_eq!(
            settings.state_path().unwrap().to_string(),
            "file://state/github_trending_all_daily"
        );
    }

    #[test]
    fn validate_rejects_bad_language_code() {
        let mut settings = Settings::default();
        settings.storage.bucket = Some("b".to_string());
        settings.filter.excluded_languages = vec!["chinese".to_string()];

        let result = settings.validate();
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "filter.excluded-languages"
        ));
    }

    #[test]
    fn validate_rejects_confidence_out_of_range() {
        let mut settings = Settings::default();
        settings.storage.bucket = Some("b".to_string());
        settings.filter.min_confidence = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_feed_link() {
        let mut settings = Settings::default();
        settings.storage.bucket = Some("b".to_string());
        settings.feed.link = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn excluded_languages_are_normalized() {
        let mut settings = Settings::default();
        settings.filter.excluded_languages = vec!["CMN".to_string(), "kor".to_string()];

        let codes = settings.excluded_languages().unwrap();

        assert!(codes.contains(&LanguageCode::parse("cmn").unwrap()));
        assert!(codes.contains(&LanguageCode::parse("kor").unwrap()));
    }
}
