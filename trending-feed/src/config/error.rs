//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting holds an unusable value.
    #[error("Invalid setting '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// Missing required file.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
