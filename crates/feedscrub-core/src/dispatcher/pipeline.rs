//! Per-feed pipeline: fetch → filter → name → write.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::FailurePolicy;
use crate::error::FeedError;
use crate::fetcher::Fetch;
use crate::filter;
use crate::storage;
use crate::url_model;

use super::summary::FeedOutcome;

/// Separator printed after each echoed feed.
pub(super) const SEPARATOR: &str =
    "-------------------------------------------------------------------------------------";

/// Settings shared by every feed task of one run.
pub(super) struct PipelineContext {
    pub(super) fetcher: Arc<dyn Fetch>,
    pub(super) remove_target: String,
    pub(super) output_dir: PathBuf,
    pub(super) policy: FailurePolicy,
    pub(super) echo: bool,
    pub(super) timestamp: u64,
}

/// How a recoverable stage error is resolved under the failure policy.
enum Recovered<T> {
    Continue(T),
    Skip(String),
}

fn recover<T>(
    policy: FailurePolicy,
    url: &str,
    stage: &'static str,
    err: FeedError,
    fallback: T,
) -> Result<Recovered<T>, FeedError> {
    match policy {
        FailurePolicy::Swallow => {
            tracing::warn!(url, stage, error = %err, "ignoring feed error");
            Ok(Recovered::Continue(fallback))
        }
        FailurePolicy::Skip => {
            tracing::warn!(url, stage, error = %err, "skipping feed");
            Ok(Recovered::Skip(err.to_string()))
        }
        FailurePolicy::Abort => Err(err),
    }
}

/// Writes `text` and the separator as one block so feeds never interleave.
fn echo_to<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    writeln!(out, "{}", text)?;
    writeln!(out, "{}", SEPARATOR)?;
    out.flush()
}

fn echo(url: &str, text: &str) {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = echo_to(&mut out, text) {
        tracing::debug!(url, error = %e, "could not echo feed to stdout");
    }
}

/// Runs the pipeline for `url`. The caller holds a permit for the duration.
///
/// Write failures are always returned as errors; fetch and naming failures
/// follow `ctx.policy`.
pub(super) async fn run_feed(ctx: &PipelineContext, url: &str) -> Result<FeedOutcome, FeedError> {
    let fetched = {
        let fetcher = Arc::clone(&ctx.fetcher);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || fetcher.fetch(&url)).await?
    };

    let body = match fetched {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            // An error page still counts as content when errors are swallowed.
            let fallback = e
                .response_body()
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default();
            match recover(ctx.policy, url, "fetch", e, fallback)? {
                Recovered::Continue(content) => content,
                Recovered::Skip(reason) => {
                    return Ok(FeedOutcome::Skipped {
                        url: url.to_string(),
                        reason,
                    })
                }
            }
        }
    };

    let filtered = filter::remove_substring(&body, &ctx.remove_target);
    if ctx.echo {
        echo(url, &filtered);
    }

    let name = match url_model::build_filename(url, ctx.timestamp) {
        Ok(name) => name,
        Err(e) => match recover(ctx.policy, url, "filename", e, String::new())? {
            Recovered::Continue(empty) => empty,
            Recovered::Skip(reason) => {
                return Ok(FeedOutcome::Skipped {
                    url: url.to_string(),
                    reason,
                })
            }
        },
    };

    let path = ctx.output_dir.join(&name);
    storage::write_file(&path, &filtered).await?;
    tracing::info!(url, path = %path.display(), bytes = filtered.len(), "wrote feed");

    Ok(FeedOutcome::Written {
        url: url.to_string(),
        path,
        bytes: filtered.len(),
    })
}
