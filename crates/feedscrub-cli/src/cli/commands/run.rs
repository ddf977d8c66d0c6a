//! `feedscrub run` – fetch, filter and save every feed.

use anyhow::Result;
use feedscrub_core::config::{FailurePolicy, FeedConfig};
use feedscrub_core::dispatcher::{Dispatcher, FeedOutcome};
use feedscrub_core::fetcher::CurlFetcher;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Command-line overrides for a run; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub jobs: Option<usize>,
    pub target: Option<String>,
    pub timeout: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub on_error: Option<FailurePolicy>,
    pub quiet: bool,
}

impl RunOptions {
    pub fn apply(&self, cfg: &mut FeedConfig) {
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent = jobs.max(1);
        }
        if let Some(target) = &self.target {
            cfg.remove_target = target.clone();
        }
        if let Some(secs) = self.timeout {
            cfg.fetch_timeout_secs = Some(secs);
        }
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = Some(dir.clone());
        }
        if let Some(policy) = self.on_error {
            cfg.on_feed_error = policy;
        }
    }
}

/// Runs every feed in `urls` (or the configured list when empty).
///
/// Ctrl-C cancels feeds still waiting for a slot; feeds in flight finish and
/// the run then fails.
pub async fn run_feeds(cfg: &FeedConfig, urls: Vec<String>, quiet: bool) -> Result<()> {
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
    let res = run_feeds_with(cfg, urls, quiet, cancel).await;
    watcher.abort();
    res
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("interrupted; cancelling pending feeds");
            eprintln!("Interrupted, waiting for feeds in flight...");
            cancel.cancel();
        }
        Err(e) => tracing::debug!(error = %e, "could not listen for Ctrl-C"),
    }
}

async fn run_feeds_with(
    cfg: &FeedConfig,
    urls: Vec<String>,
    quiet: bool,
    cancel: CancellationToken,
) -> Result<()> {
    let urls = if urls.is_empty() {
        cfg.feed_urls.clone()
    } else {
        urls
    };
    if urls.is_empty() {
        println!("No feeds configured.");
        return Ok(());
    }

    let fetcher = Arc::new(CurlFetcher::from_config(cfg));
    let dispatcher = Dispatcher::from_config(cfg, fetcher, std::env::current_dir()?)
        .with_echo(!quiet)
        .with_cancel_token(cancel);

    let summary = dispatcher.run(&urls).await?;

    for outcome in summary.skipped() {
        if let FeedOutcome::Skipped { url, reason } = outcome {
            eprintln!("skipped {}: {}", url, reason);
        }
    }
    tracing::info!(
        "run completed: {} written, {} skipped",
        summary.written_count(),
        summary.skipped_count()
    );
    Ok(())
}
