//! Natural-language identification of candidate descriptions.

mod trigram;

pub use trigram::WhatlangClassifier;

use std::fmt;

/// An ISO 639-3 language code, always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parses a three-letter ISO 639-3 code, case-insensitively.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(code.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps free text to the language it is written in.
pub trait LanguageClassifier: Send + Sync {
    /// Detects the language of `text`.
    ///
    /// Returns `None` when the text is empty or the language cannot be
    /// determined; callers treat that as "not excluded".
    fn detect(&self, text: &str) -> Option<LanguageCode>;
}
