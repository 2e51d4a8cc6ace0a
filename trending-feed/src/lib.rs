#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod dedup;
pub mod feed;
pub mod language;
pub mod runner;
pub mod source;
pub mod storage;
pub mod summary;

pub use config::{ConfigError, Settings, DEFAULT_SETTINGS_FILE};
pub use dedup::{filter_candidates, normalize_identifier, FilterOutcome, FilteredEntry, SeenSet};
pub use feed::{assemble, derive_title, render, FeedFormat, FeedModel, FeedSettings, RenderError};
pub use language::{LanguageClassifier, LanguageCode, WhatlangClassifier};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use source::{CandidateSource, Contributor, GithubTrending, Period, RawCandidate, SourceError};
pub use storage::{FilesystemStore, MemoryStore, S3Store, StateStore, StoragePath, StoreError};
pub use summary::RunSummary;
