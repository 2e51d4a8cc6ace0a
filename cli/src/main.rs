//! CLI for the trending feed job.
//!
//! Meant to be invoked once per day by a scheduler. Fetches the GitHub
//! trending list, publishes new projects as Atom and RSS feeds and records
//! them so they are not reported again.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{dispatcher, error, Dispatch};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trending_feed::{
    Period, RunSummary, Runner, RunnerError, Settings, DEFAULT_SETTINGS_FILE,
};

/// Trending Feed - Publish newly trending GitHub projects as Atom and RSS feeds.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the settings file [default: trending-feed.toml if present].
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage bucket (overrides the settings file).
    #[arg(long, env = "S3_BUCKET")]
    bucket: Option<String>,

    /// Trending window: daily, weekly or monthly.
    #[arg(long)]
    period: Option<Period>,

    /// Trending category, e.g. "rust", or "all".
    #[arg(long)]
    category: Option<String>,

    /// Run the whole pipeline without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A second install attempt only fails if a provider is already set.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let dispatch = build_dispatch();
    let args = Args::parse();
    let json = args.json;

    match run(args, dispatch.clone()).await {
        Ok(summary) => {
            print_summary(&summary, json);
            ExitCode::from(0)
        }
        Err(e) => {
            dispatcher::with_default(&dispatch, || error!(error = %e, "Run failed"));
            match e {
                RunnerError::Persist { .. } => ExitCode::from(1),
                _ => ExitCode::from(2),
            }
        }
    }
}

/// Builds the log subscriber handed to the runner.
///
/// The subscriber is not installed globally; the runner scopes its pipeline
/// to it. Output is compact single-line formatting, filtered by `RUST_LOG`
/// (defaults to "info").
fn build_dispatch() -> Dispatch {
    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
    Dispatch::new(subscriber)
}

/// Main execution logic.
async fn run(args: Args, dispatch: Dispatch) -> Result<RunSummary, RunnerError> {
    let mut settings = dispatcher::with_default(&dispatch, || load_settings(args.config.as_deref()))?;

    if let Some(bucket) = args.bucket {
        settings.storage.bucket = Some(bucket);
    }
    if let Some(period) = args.period {
        settings.source.period = period;
    }
    if let Some(category) = args.category {
        settings.source.category = category;
    }

    let runner = Runner::from_settings(&settings, args.dry_run, Some(dispatch)).await?;
    runner.run().await
}

fn load_settings(path: Option<&Path>) -> Result<Settings, trending_feed::ConfigError> {
    match path {
        Some(path) => Settings::load(path),
        None => Settings::load_or_default(Path::new(DEFAULT_SETTINGS_FILE)),
    }
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary, json: bool) {
    if json {
        match serde_json::to_string_pretty(summary) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("Failed to serialize summary: {e}"),
        }
        return;
    }

    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Candidates fetched: {}", summary.candidates_fetched);
    println!("  New projects: {}", summary.accepted);
    println!("  Skipped (already reported): {}", summary.skipped_seen);
    println!("  Skipped (excluded language): {}", summary.skipped_language);
    println!("  Skipped (no identifier): {}", summary.skipped_invalid);
    println!("  Seen-set size: {}", summary.seen_total);

    if !summary.dry_run {
        for path in &summary.written {
            println!("  Wrote: {path}");
        }
    }
}
