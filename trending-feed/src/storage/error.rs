//! State store error types.

use thiserror::Error;

/// Boxed backend error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while reading or writing stored objects.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage path could not be parsed.
    #[error("Invalid storage path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// The store does not handle this path's scheme.
    #[error("Store '{store}' cannot handle path '{path}'")]
    UnsupportedScheme { store: &'static str, path: String },

    /// Reading an object failed for a reason other than "not found".
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: BoxError,
    },

    /// Writing an object failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: BoxError,
    },
}

impl StoreError {
    pub(crate) fn read(path: impl ToString, source: impl Into<BoxError>) -> Self {
        Self::Read {
            path: path.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: impl ToString, source: impl Into<BoxError>) -> Self {
        Self::Write {
            path: path.to_string(),
            source: source.into(),
        }
    }
}
