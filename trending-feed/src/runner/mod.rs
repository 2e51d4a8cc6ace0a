//! Orchestrates one feed run.
//!
//! The run is a single linear pipeline: load the seen-set, fetch candidates,
//! filter, assemble and render both feeds, then persist. Nothing is written
//! before every document has been rendered.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::config::Settings;
use crate::dedup::{filter_candidates, SeenSet};
use crate::feed::{assemble, render, FeedFormat};
use crate::language::{LanguageClassifier, WhatlangClassifier};
use crate::source::{CandidateSource, GithubTrending};
use crate::storage::{
    FilesystemStore, S3Store, StateStore, StoragePath, StorageScheme, SEEN_SET_CONTENT_TYPE,
};
use crate::summary::RunSummary;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument::WithSubscriber;
use tracing::{error, info, Dispatch};

/// One object to write at the end of a run.
struct Artifact {
    path: StoragePath,
    body: Vec<u8>,
    content_type: &'static str,
}

/// Runs the fetch, filter, render and persist pipeline.
pub struct Runner {
    config: RunnerConfig,
    source: Box<dyn CandidateSource>,
    store: Arc<dyn StateStore>,
    classifier: Box<dyn LanguageClassifier>,
    dispatch: Option<Dispatch>,
}

impl Runner {
    /// Builds a runner from explicit collaborators.
    pub fn new(
        config: RunnerConfig,
        source: Box<dyn CandidateSource>,
        store: Arc<dyn StateStore>,
        classifier: Box<dyn LanguageClassifier>,
    ) -> Self {
        Self {
            config,
            source,
            store,
            classifier,
            dispatch: None,
        }
    }

    /// Builds a runner with the production collaborators described by `settings`.
    ///
    /// When `dispatch` is given, collaborator setup already logs to it, and so
    /// does every later run.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the settings are invalid or the HTTP client
    /// cannot be built.
    pub async fn from_settings(
        settings: &Settings,
        dry_run: bool,
        dispatch: Option<Dispatch>,
    ) -> Result<Self, RunnerError> {
        let build = Self::build(settings, dry_run);
        let runner = match &dispatch {
            Some(dispatch) => build.with_subscriber(dispatch.clone()).await?,
            None => build.await?,
        };
        Ok(Self { dispatch, ..runner })
    }

    async fn build(settings: &Settings, dry_run: bool) -> Result<Self, RunnerError> {
        let config = RunnerConfig::from_settings(settings)?.with_dry_run(dry_run);
        info!(
            path = %config.state_path(),
            period = %config.period(),
            category = config.category(),
            dry_run,
            "Resolved run configuration"
        );

        let source = GithubTrending::new(
            &settings.source.base_url,
            &settings.source.user_agent,
            Duration::from_secs(settings.source.timeout_secs),
        )?;

        let store: Arc<dyn StateStore> = match settings.storage.scheme {
            StorageScheme::S3 => {
                info!(public_read = settings.storage.public_read, "Using S3 state store");
                Arc::new(S3Store::from_env(settings.storage.public_read).await)
            }
            StorageScheme::File => {
                let store = FilesystemStore::new(&settings.storage.root);
                info!(root = %store.root().display(), "Using filesystem state store");
                Arc::new(store)
            }
        };

        let classifier =
            WhatlangClassifier::new().with_min_confidence(settings.filter.min_confidence);

        Ok(Self::new(
            config,
            Box::new(source),
            store,
            Box::new(classifier),
        ))
    }

    /// Routes this runner's logs to `dispatch` instead of the caller's default.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Executes a run stamped with the current time.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        self.run_at(Utc::now()).await
    }

    /// Executes a run stamped with `run_time`.
    pub async fn run_at(&self, run_time: DateTime<Utc>) -> Result<RunSummary, RunnerError> {
        let pipeline = self.pipeline(run_time);
        match &self.dispatch {
            Some(dispatch) => pipeline.with_subscriber(dispatch.clone()).await,
            None => pipeline.await,
        }
    }

    async fn pipeline(&self, run_time: DateTime<Utc>) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        let state_path = self.config.state_path();

        info!(path = %state_path, "Loading seen-set");
        let prior = match self.store.get(state_path).await? {
            Some(bytes) => SeenSet::from_bytes(&bytes),
            None => {
                info!(path = %state_path, "No seen-set yet, starting empty");
                SeenSet::new()
            }
        };
        info!(count = prior.len(), "Loaded seen-set");

        let candidates = self
            .source
            .fetch(self.config.period(), self.config.category())
            .await?;
        let fetched = candidates.len();

        let outcome = filter_candidates(
            prior,
            candidates,
            self.config.excluded_languages(),
            self.classifier.as_ref(),
        );
        summary.record_filter(fetched, &outcome);
        info!(
            fetched,
            accepted = summary.accepted,
            skipped_seen = summary.skipped_seen,
            skipped_language = summary.skipped_language,
            skipped_invalid = summary.skipped_invalid,
            "Filtered candidates"
        );
        if summary.is_empty() {
            info!("No new projects, feeds will be empty");
        }

        let model = assemble(&outcome.accepted, self.config.feed(), run_time);
        let mut artifacts = Vec::with_capacity(FeedFormat::ALL.len() + 1);
        for format in FeedFormat::ALL {
            artifacts.push(Artifact {
                path: state_path.with_suffix(format.suffix()),
                body: render(&model, format)?.into_bytes(),
                content_type: format.content_type(),
            });
        }
        artifacts.push(Artifact {
            path: state_path.clone(),
            body: outcome.seen.serialize().into_bytes(),
            content_type: SEEN_SET_CONTENT_TYPE,
        });

        if self.config.dry_run() {
            for artifact in &artifacts {
                info!(path = %artifact.path, bytes = artifact.body.len(), "Dry run, not writing");
            }
            return Ok(summary);
        }

        self.persist(artifacts, &mut summary).await?;
        Ok(summary)
    }

    /// Writes every artifact, even after a failure, then reports all failures.
    async fn persist(
        &self,
        artifacts: Vec<Artifact>,
        summary: &mut RunSummary,
    ) -> Result<(), RunnerError> {
        let attempted = artifacts.len();
        let mut failures = Vec::new();

        for artifact in artifacts {
            match self
                .store
                .put(&artifact.path, artifact.body, artifact.content_type)
                .await
            {
                Ok(()) => {
                    info!(path = %artifact.path, "Wrote artifact");
                    summary.written.push(artifact.path.to_string());
                }
                Err(e) => {
                    error!(path = %artifact.path, error = %e, "Failed to write artifact");
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(RunnerError::Persist {
                attempted,
                failures,
            })
        }
    }
}
