//! Feed dispatcher.
//!
//! Fans out one task per feed URL, bounds how many run their pipeline at once
//! with a [`PermitPool`], and joins every task before returning. The first
//! fatal error cancels feeds still waiting for a permit and becomes the run's
//! result once all tasks have been joined.

mod permit;
mod pipeline;
mod summary;


pub use permit::{FeedPermit, PermitPool};
pub use summary::{FeedOutcome, RunSummary};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::{FailurePolicy, FeedConfig};
use crate::error::FeedError;
use crate::fetcher::Fetch;

use self::pipeline::PipelineContext;

/// Runs feed pipelines with bounded concurrency.
pub struct Dispatcher {
    fetcher: Arc<dyn Fetch>,
    pool: PermitPool,
    remove_target: String,
    output_dir: PathBuf,
    policy: FailurePolicy,
    echo: bool,
    cancel: CancellationToken,
}

impl Dispatcher {
    /// Dispatcher writing into `output_dir` with slots from `pool`. Nothing is
    /// removed from feed bodies until a target is set.
    pub fn new(fetcher: Arc<dyn Fetch>, pool: PermitPool, output_dir: PathBuf) -> Self {
        Self {
            fetcher,
            pool,
            remove_target: String::new(),
            output_dir,
            policy: FailurePolicy::default(),
            echo: false,
            cancel: CancellationToken::new(),
        }
    }

    /// Dispatcher configured from `cfg`; `output_dir` is used when the config
    /// does not name one.
    pub fn from_config(cfg: &FeedConfig, fetcher: Arc<dyn Fetch>, output_dir: PathBuf) -> Self {
        Self::new(
            fetcher,
            PermitPool::new(cfg.max_concurrent),
            cfg.output_dir.clone().unwrap_or(output_dir),
        )
        .with_remove_target(cfg.remove_target.clone())
        .with_policy(cfg.on_feed_error)
    }

    pub fn with_remove_target(mut self, target: impl Into<String>) -> Self {
        self.remove_target = target.into();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Print each filtered feed and a separator line to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Use `token` as the parent cancellation signal for runs. Cancelling it
    /// makes every feed still waiting for a permit fail with
    /// [`FeedError::Cancelled`].
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn pool(&self) -> &PermitPool {
        &self.pool
    }

    /// Runs every URL, stamping output files with the current Unix time.
    pub async fn run(&self, urls: &[String]) -> Result<RunSummary, FeedError> {
        self.run_at(urls, unix_now()).await
    }

    /// Runs every URL, stamping output files with `timestamp`.
    ///
    /// Returns after all spawned tasks have completed, successfully or not.
    pub async fn run_at(&self, urls: &[String], timestamp: u64) -> Result<RunSummary, FeedError> {
        let ctx = Arc::new(PipelineContext {
            fetcher: Arc::clone(&self.fetcher),
            remove_target: self.remove_target.clone(),
            output_dir: self.output_dir.clone(),
            policy: self.policy,
            echo: self.echo,
            timestamp,
        });
        let cancel = self.cancel.child_token();

        tracing::info!(
            feeds = urls.len(),
            max_concurrent = self.pool.size(),
            timestamp,
            "starting feed run"
        );

        let mut join_set = JoinSet::new();
        for url in urls {
            let ctx = Arc::clone(&ctx);
            let pool = self.pool.clone();
            let cancel = cancel.clone();
            let url = url.clone();
            join_set.spawn(async move {
                let _permit = pool.acquire(&cancel).await?;
                tracing::debug!(url = %url, in_use = pool.in_use(), "permit acquired");
                pipeline::run_feed(&ctx, &url).await
            });
        }

        let mut summary = RunSummary::default();
        let mut first_err: Option<FeedError> = None;
        while let Some(res) = join_set.join_next().await {
            match res.map_err(FeedError::from).and_then(|r| r) {
                Ok(outcome) => summary.push(outcome),
                Err(e) if first_err.is_none() => {
                    tracing::error!(error = %e, "fatal feed error; cancelling pending feeds");
                    cancel.cancel();
                    first_err = Some(e);
                }
                Err(e) => tracing::debug!(error = %e, "feed failed after cancellation"),
            }
        }

        if let Some(e) = first_err {
            return Err(e);
        }
        tracing::info!(
            written = summary.written_count(),
            skipped = summary.skipped_count(),
            "feed run completed"
        );
        Ok(summary)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
