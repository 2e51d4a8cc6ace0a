//! Run summary types.

use crate::dedup::FilterOutcome;
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of candidates returned by the source.
    pub candidates_fetched: usize,

    /// Number of candidates published in the feeds.
    pub accepted: usize,

    /// Number of candidates skipped because they were reported before.
    pub skipped_seen: usize,

    /// Number of candidates skipped because of their description's language.
    pub skipped_language: usize,

    /// Number of candidates skipped because they had no identifier.
    pub skipped_invalid: usize,

    /// Size of the seen-set after the run.
    pub seen_total: usize,

    /// Storage paths written, in write order.
    pub written: Vec<String>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Records the filtering counts of a batch.
    pub fn record_filter(&mut self, fetched: usize, outcome: &FilterOutcome) {
        self.candidates_fetched = fetched;
        self.accepted = outcome.accepted.len();
        self.skipped_seen = outcome.skipped_seen;
        self.skipped_language = outcome.skipped_language;
        self.skipped_invalid = outcome.skipped_invalid;
        self.seen_total = outcome.seen.len();
    }

    /// Returns true if the run produced no new feed items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted == 0
    }
}
