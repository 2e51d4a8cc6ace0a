//! Candidate source error types.

use thiserror::Error;

/// Errors that can occur while fetching trending candidates.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed or returned an error status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The trending URL could not be built.
    #[error("Invalid trending URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A CSS selector failed to compile.
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A trending row lacked a required element.
    #[error("Trending row {row} has no {field}")]
    MissingField { row: usize, field: &'static str },
}

/// Unknown trending period name.
#[derive(Debug, Error)]
#[error("Unknown trending period '{0}', expected daily, weekly or monthly")]
pub struct ParsePeriodError(pub String);
