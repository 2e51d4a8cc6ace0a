//! Feed rendering error types.

use thiserror::Error;

/// Errors that can occur while rendering a feed document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required feed or item field is empty.
    #[error("Feed {location} is missing required field '{field}'")]
    MissingField {
        location: String,
        field: &'static str,
    },

    /// A link is not an absolute URL.
    #[error("Feed {location} has invalid link '{link}': {source}")]
    InvalidLink {
        location: String,
        link: String,
        #[source]
        source: url::ParseError,
    },

    /// The XML writer failed.
    #[error("XML serialization failed: {0}")]
    Xml(String),
}

impl RenderError {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}
