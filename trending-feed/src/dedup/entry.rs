//! Entries that survived filtering.

use crate::source::RawCandidate;
use serde::Serialize;

/// Author placeholder used when the source credits nobody.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// A candidate that is both unseen and not in an excluded language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredEntry {
    /// Normalized identifier, also the seen-set key.
    pub name: String,
    /// Programming language label, possibly empty.
    pub language: String,
    /// Description, possibly empty.
    pub description: String,
    /// Project URL.
    pub url: String,
    /// First credited contributor, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    /// Profile URL of the author, or [`UNKNOWN_AUTHOR`].
    pub author_url: String,
}

impl FilteredEntry {
    /// Builds an entry from a candidate whose identifier is already normalized.
    pub(crate) fn from_candidate(name: String, candidate: RawCandidate) -> Self {
        let (author, author_url) = candidate
            .contributors
            .into_iter()
            .next()
            .map(|c| (c.display_name, c.url))
            .unwrap_or_else(|| (UNKNOWN_AUTHOR.to_string(), UNKNOWN_AUTHOR.to_string()));

        Self {
            name,
            language: candidate.language.trim().to_string(),
            description: candidate.description.trim().to_string(),
            url: candidate.url.trim().to_string(),
            author,
            author_url,
        }
    }
}
