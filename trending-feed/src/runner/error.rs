//! Runner error types.

use crate::storage::StoreError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings could not be loaded or are invalid.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The trending source failed.
    #[error(transparent)]
    Source(#[from] crate::source::SourceError),

    /// Loading the prior seen-set failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A feed document could not be rendered.
    #[error(transparent)]
    Render(#[from] crate::feed::RenderError),

    /// One or more artifacts could not be written. The others were attempted.
    #[error(
        "Failed to persist {} of {attempted} artifacts: {}",
        .failures.len(),
        join_failures(.failures)
    )]
    Persist {
        attempted: usize,
        failures: Vec<StoreError>,
    },
}

fn join_failures(failures: &[StoreError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
