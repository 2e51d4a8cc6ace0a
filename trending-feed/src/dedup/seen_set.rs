//! Persisted set of already reported identifiers.

use std::collections::HashSet;

/// Identifiers reported by earlier runs, in discovery order.
///
/// Membership is all that matters; the order is kept only so the stored
/// blob stays append-only across runs. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl SeenSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the newline-delimited stored form.
    ///
    /// Blank lines are skipped and repeated identifiers keep their first
    /// position.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut set = Self::new();
        for line in text.lines() {
            set.insert(line.trim());
        }
        set
    }

    /// Parses a stored blob, replacing invalid UTF-8.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// Adds an identifier. Returns `false` if it was already present or blank.
    pub fn insert(&mut self, id: &str) -> bool {
        if id.is_empty() || self.members.contains(id) {
            return false;
        }
        self.members.insert(id.to_string());
        self.order.push(id.to_string());
        true
    }

    /// Returns true if `id` has been seen.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Number of identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no identifier has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Newline-delimited stored form.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.order.join("\n")
    }
}

impl<'a> FromIterator<&'a str> for SeenSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
