//! Dedup and language filtering of trending candidates.
//!
//! A candidate is accepted when its normalized identifier has not been seen
//! (by earlier runs or earlier in this batch) and its description is not
//! written in an excluded language.

mod entry;
mod seen_set;

pub use entry::{FilteredEntry, UNKNOWN_AUTHOR};
pub use seen_set::SeenSet;

use crate::language::{LanguageClassifier, LanguageCode};
use crate::source::RawCandidate;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Result of filtering one batch.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Accepted entries, in source order.
    pub accepted: Vec<FilteredEntry>,

    /// Prior seen-set plus every accepted identifier.
    pub seen: SeenSet,

    /// Candidates dropped because they were already seen.
    pub skipped_seen: usize,

    /// Candidates dropped because of their description's language.
    pub skipped_language: usize,

    /// Candidates dropped because their identifier was blank.
    pub skipped_invalid: usize,
}

/// Strips all whitespace from a source identifier.
///
/// The trending page renders `owner / repo` with varying spacing, so the
/// dedup key must not depend on it.
#[must_use]
pub fn normalize_identifier(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Splits `candidates` into new entries and the updated seen-set.
///
/// The seen-set is updated as entries are accepted, so an identifier
/// repeated within one batch is accepted at most once. Candidates dropped
/// for their language are not recorded and may be accepted by a later run.
pub fn filter_candidates(
    prior: SeenSet,
    candidates: Vec<RawCandidate>,
    excluded: &HashSet<LanguageCode>,
    classifier: &dyn LanguageClassifier,
) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        seen: prior,
        ..FilterOutcome::default()
    };

    for candidate in candidates {
        let name = normalize_identifier(&candidate.name);
        if name.is_empty() {
            warn!(url = %candidate.url, "Skipping candidate without identifier");
            outcome.skipped_invalid += 1;
            continue;
        }

        if outcome.seen.contains(&name) {
            debug!(name = %name, "Already reported");
            outcome.skipped_seen += 1;
            continue;
        }

        if let Some(code) = classifier.detect(&candidate.description) {
            if excluded.contains(&code) {
                debug!(name = %name, language = %code, "Excluded language");
                outcome.skipped_language += 1;
                continue;
            }
        }

        outcome.seen.insert(&name);
        outcome
            .accepted
            .push(FilteredEntry::from_candidate(name, candidate));
    }

    outcome
}
