//! Trending candidate sources.

mod error;
mod github;

pub use error::{ParsePeriodError, SourceError};
pub use github::{parse_trending_page, GithubTrending};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trending window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Today.
    #[default]
    Daily,
    /// This week.
    Weekly,
    /// This month.
    Monthly,
}

impl Period {
    /// Value of the `since` query parameter.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "today" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

/// A user credited on a trending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    /// Login shown on the avatar.
    pub display_name: String,
    /// Profile URL.
    pub url: String,
}

/// An entry as reported by the trending source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RawCandidate {
    /// Project identifier as rendered by the source (may contain spacing).
    pub name: String,

    /// Primary programming language. Empty when not reported.
    pub language: String,

    /// Free-text description. Empty when not provided.
    pub description: String,

    /// Canonical project URL.
    pub url: String,

    /// Credited contributors, most prominent first.
    pub contributors: Vec<Contributor>,
}

/// Returns today's trending candidates.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetches candidates for `period` in `category` (`all` for every language).
    async fn fetch(&self, period: Period, category: &str)
        -> Result<Vec<RawCandidate>, SourceError>;
}
