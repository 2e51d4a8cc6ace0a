use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use tracing::span::{Attributes, Id, Record};
use tracing::{Dispatch, Event, Metadata, Subscriber};

use trending_feed::storage::{StorageScheme, SEEN_SET_CONTENT_TYPE};
use trending_feed::{
    CandidateSource, Contributor, FeedSettings, LanguageClassifier, LanguageCode, MemoryStore,
    Period, RawCandidate, Runner, RunnerConfig, RunnerError, Settings, SourceError, StateStore,
    StoragePath, StoreError,
};

const STATE_PATH: &str = "s3://feeds/github_trending_all_daily";

/// Returns the same batch on every fetch.
struct ScriptedSource(Vec<RawCandidate>);

#[async_trait]
impl CandidateSource for ScriptedSource {
    async fn fetch(&self, _: Period, _: &str) -> Result<Vec<RawCandidate>, SourceError> {
        Ok(self.0.clone())
    }
}

/// Always fails, like an unreachable trending page.
struct FailingSource;

#[async_trait]
impl CandidateSource for FailingSource {
    async fn fetch(&self, _: Period, _: &str) -> Result<Vec<RawCandidate>, SourceError> {
        Err(SourceError::MissingField {
            row: 0,
            field: "project link",
        })
    }
}

/// Answers from a description table; unknown text is "no match".
struct TableClassifier(HashMap<String, LanguageCode>);

impl TableClassifier {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(text, code)| (text.to_string(), LanguageCode::parse(code).unwrap()))
                .collect(),
        )
    }
}

impl LanguageClassifier for TableClassifier {
    fn detect(&self, text: &str) -> Option<LanguageCode> {
        self.0.get(text).cloned()
    }
}

/// Memory store that can fail reads, or writes whose key ends with a suffix.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_write_suffix: Option<&'static str>,
    puts: AtomicUsize,
}

#[async_trait]
impl StateStore for FlakyStore {
    async fn get(&self, path: &StoragePath) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Read {
                path: path.to_string(),
                source: "access denied".into(),
            });
        }
        self.inner.get(path).await
    }

    async fn put(
        &self,
        path: &StoragePath,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if let Some(suffix) = self.fail_write_suffix {
            if path.key.ends_with(suffix) {
                return Err(StoreError::Write {
                    path: path.to_string(),
                    source: "slow down".into(),
                });
            }
        }
        self.inner.put(path, body, content_type).await
    }
}

/// Subscriber that only counts events.
#[derive(Clone, Default)]
struct EventCounter(Arc<AtomicUsize>);

impl EventCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Subscriber for EventCounter {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, _: &Event<'_>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}

fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 6, 0, 0).unwrap()
}

fn state_path() -> StoragePath {
    StoragePath::parse(STATE_PATH).unwrap()
}

fn candidate(name: &str, language: &str, description: &str) -> RawCandidate {
    RawCandidate {
        name: name.to_string(),
        language: language.to_string(),
        description: description.to_string(),
        url: format!("https://github.com/{}", name.replace(' ', "")),
        contributors: Vec::new(),
    }
}

fn todays_batch() -> Vec<RawCandidate> {
    let mut rocket = candidate("acme / rocket", "Rust", "A fast launcher");
    rocket.contributors.push(Contributor {
        display_name: "mona".to_string(),
        url: "https://github.com/mona".to_string(),
    });
    vec![
        rocket,
        candidate("zh / notes", "Python", "中文学习笔记"),
        candidate("dot / files", "", ""),
        candidate("ko / guide", "", "한국어 가이드"),
    ]
}

fn classifier() -> TableClassifier {
    TableClassifier::new(&[
        ("A fast launcher", "eng"),
        ("中文学习笔记", "cmn"),
        ("한국어 가이드", "kor"),
        ("hello", "eng"),
    ])
}

fn config() -> RunnerConfig {
    let excluded: HashSet<LanguageCode> = ["cmn", "kor"]
        .iter()
        .filter_map(|code| LanguageCode::parse(code))
        .collect();
    RunnerConfig::new(state_path(), Period::Daily, "all", excluded)
}

fn runner(config: RunnerConfig, batch: Vec<RawCandidate>, store: Arc<dyn StateStore>) -> Runner {
    Runner::new(
        config,
        Box::new(ScriptedSource(batch)),
        store,
        Box::new(classifier()),
    )
}

#[tokio::test]
async fn first_run_accepts_every_allowed_candidate() {
    let store = Arc::new(MemoryStore::new());
    let runner = runner(config(), todays_batch(), store.clone());

    let summary = runner.run_at(run_time()).await.unwrap();

    assert_eq!(summary.candidates_fetched, 4);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.skipped_language, 2);
    assert_eq!(summary.skipped_seen, 0);
    assert_eq!(
        summary.written,
        [
            format!("{STATE_PATH}.atom"),
            format!("{STATE_PATH}.rss"),
            STATE_PATH.to_string(),
        ]
    );

    assert_eq!(
        store.text(&state_path()).unwrap(),
        "acme/rocket\ndot/files"
    );

    let atom = store.text(&state_path().with_suffix(".atom")).unwrap();
    assert!(atom.contains("<title>A fast launcher [Rust]</title>"));
    assert!(atom.contains("<title>dot/files</title>"));
    assert!(atom.contains("<name>mona</name>"));
    assert!(!atom.contains("中文学习笔记"));

    let rss = store.text(&state_path().with_suffix(".rss")).unwrap();
    assert!(rss.contains("<title>A fast launcher [Rust]</title>"));
    assert!(rss.contains("<dc:creator>unknown</dc:creator>"));
}

#[tokio::test]
async fn artifacts_carry_their_content_types() {
    let store = Arc::new(MemoryStore::new());
    runner(config(), todays_batch(), store.clone())
        .run_at(run_time())
        .await
        .unwrap();

    let content_type = |suffix: &str| {
        store
            .object(&state_path().with_suffix(suffix))
            .unwrap()
            .content_type
    };
    assert_eq!(content_type(".atom"), "application/atom+xml");
    assert_eq!(content_type(".rss"), "application/rss+xml");
    assert_eq!(content_type(""), SEEN_SET_CONTENT_TYPE);
}

#[tokio::test]
async fn second_run_over_same_batch_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let runner = runner(config(), todays_batch(), store.clone());

    runner.run_at(run_time()).await.unwrap();
    let seen_after_first = store.text(&state_path()).unwrap();

    let second = runner.run_at(run_time()).await.unwrap();

    assert_eq!(second.accepted, 0);
    assert_eq!(second.skipped_seen, 2);
    assert_eq!(store.text(&state_path()).unwrap(), seen_after_first);
    let atom = store.text(&state_path().with_suffix(".atom")).unwrap();
    assert!(!atom.contains("<entry>"));
}

#[tokio::test]
async fn repeated_identifiers_never_duplicate_the_seen_set() {
    let store = Arc::new(MemoryStore::new());
    let batch = vec![
        candidate("a / one", "C", ""),
        candidate("a/one", "C", ""),
        candidate("a / two", "", ""),
        candidate("a /two", "", ""),
    ];
    let runner = runner(config(), batch, store.clone());

    for _ in 0..3 {
        runner.run_at(run_time()).await.unwrap();
    }

    let seen = store.text(&state_path()).unwrap();
    let lines: Vec<&str> = seen.lines().collect();
    let unique: HashSet<&str> = lines.iter().copied().collect();
    assert_eq!(lines, ["a/one", "a/two"]);
    assert_eq!(unique.len(), lines.len());
}

#[tokio::test]
async fn prior_state_filters_out_reported_projects() {
    let store = Arc::new(MemoryStore::new());
    store.insert(state_path(), "proj-a", SEEN_SET_CONTENT_TYPE);
    let batch = vec![candidate("proj- a", "Go", ""), candidate("proj-b", "", "hello")];

    let summary = runner(config(), batch, store.clone())
        .run_at(run_time())
        .await
        .unwrap();

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.skipped_seen, 1);
    assert_eq!(store.text(&state_path()).unwrap(), "proj-a\nproj-b");

    let rss = store.text(&state_path().with_suffix(".rss")).unwrap();
    assert!(rss.contains("<title>hello</title>"));
    assert!(!rss.contains("proj-a"));
}

#[tokio::test]
async fn legacy_seen_set_with_blank_lines_is_repaired() {
    let store = Arc::new(MemoryStore::new());
    store.insert(state_path(), "\nacme/rocket\n\nacme/rocket", SEEN_SET_CONTENT_TYPE);

    runner(config(), todays_batch(), store.clone())
        .run_at(run_time())
        .await
        .unwrap();

    assert_eq!(
        store.text(&state_path()).unwrap(),
        "acme/rocket\ndot/files"
    );
}

#[tokio::test]
async fn source_failure_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let runner = Runner::new(
        config(),
        Box::new(FailingSource),
        store.clone(),
        Box::new(classifier()),
    );

    let result = runner.run_at(run_time()).await;

    assert!(matches!(result, Err(RunnerError::Source(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn unreadable_state_aborts_before_any_write() {
    let store = Arc::new(FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    });

    let result = runner(config(), todays_batch(), store.clone())
        .run_at(run_time())
        .await;

    assert!(matches!(result, Err(RunnerError::Store(StoreError::Read { .. }))));
    assert_eq!(store.puts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn render_failure_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let config = config().with_feed(FeedSettings {
        link: String::new(),
        ..FeedSettings::default()
    });

    let result = runner(config, todays_batch(), store.clone())
        .run_at(run_time())
        .await;

    assert!(matches!(result, Err(RunnerError::Render(_))));
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_write_does_not_stop_the_others() {
    let store = Arc::new(FlakyStore {
        fail_write_suffix: Some(".atom"),
        ..FlakyStore::default()
    });

    let result = runner(config(), todays_batch(), store.clone())
        .run_at(run_time())
        .await;

    match result {
        Err(RunnerError::Persist {
            attempted,
            failures,
        }) => {
            assert_eq!(attempted, 3);
            assert_eq!(failures.len(), 1);
            assert!(matches!(failures[0], StoreError::Write { .. }));
        }
        other => panic!("expected a persistence failure, got {other:?}"),
    }
    assert_eq!(store.puts.load(Ordering::SeqCst), 3);
    assert!(store.inner.object(&state_path().with_suffix(".rss")).is_some());
    assert!(store.inner.object(&state_path()).is_some());
    assert!(store.inner.object(&state_path().with_suffix(".atom")).is_none());
}

#[tokio::test]
async fn dry_run_renders_but_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let runner = runner(config().with_dry_run(true), todays_batch(), store.clone())
        .with_dispatch(tracing::Dispatch::none());

    let summary = runner.run_at(run_time()).await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.accepted, 2);
    assert!(summary.written.is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn runner_setup_logs_to_the_given_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.scheme = StorageScheme::File;
    settings.storage.root = dir.path().to_path_buf();
    let counter = EventCounter::default();

    let runner = Runner::from_settings(&settings, true, Some(Dispatch::new(counter.clone())))
        .await
        .unwrap();

    assert!(counter.count() >= 2, "setup logged {} events", counter.count());
    assert!(runner.config().dry_run());
    assert_eq!(runner.config().state_path().scheme, StorageScheme::File);
}

#[tokio::test]
async fn runner_setup_without_dispatch_still_builds() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.storage.scheme = StorageScheme::File;
    settings.storage.root = dir.path().to_path_buf();

    let runner = Runner::from_settings(&settings, false, None).await.unwrap();

    assert!(!runner.config().dry_run());
}
