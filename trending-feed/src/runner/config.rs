//! Runner configuration.

use crate::config::{ConfigError, Settings};
use crate::feed::FeedSettings;
use crate::language::LanguageCode;
use crate::source::Period;
use crate::storage::StoragePath;
use std::collections::HashSet;

/// Resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Location of the seen-set; feeds are stored beside it.
    state_path: StoragePath,
    /// Trending window to fetch.
    period: Period,
    /// Trending category (`all` for every language).
    category: String,
    /// Description languages to drop.
    excluded_languages: HashSet<LanguageCode>,
    /// Feed header.
    feed: FeedSettings,
    /// Whether to skip persistence.
    dry_run: bool,
}

impl RunnerConfig {
    /// Creates a configuration with the default feed header.
    pub fn new(
        state_path: StoragePath,
        period: Period,
        category: impl Into<String>,
        excluded_languages: HashSet<LanguageCode>,
    ) -> Self {
        Self {
            state_path,
            period,
            category: category.into(),
            excluded_languages,
            feed: FeedSettings::default(),
            dry_run: false,
        }
    }

    /// Resolves a configuration from validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the settings fail validation.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::new(
            settings.state_path()?,
            settings.source.period,
            settings.source.category.trim(),
            settings.excluded_languages()?,
        )
        .with_feed(settings.feed.clone()))
    }

    /// Sets the feed header.
    pub fn with_feed(mut self, feed: FeedSettings) -> Self {
        self.feed = feed;
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Returns the seen-set location.
    pub fn state_path(&self) -> &StoragePath {
        &self.state_path
    }

    /// Returns the trending window.
    pub fn period(&self) -> Period {
        self.period
    }

    /// Returns the trending category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the excluded description languages.
    pub fn excluded_languages(&self) -> &HashSet<LanguageCode> {
        &self.excluded_languages
    }

    /// Returns the feed header.
    pub fn feed(&self) -> &FeedSettings {
        &self.feed
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}
