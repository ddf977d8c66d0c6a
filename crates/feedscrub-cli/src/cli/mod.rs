//! CLI for feedscrub.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use feedscrub_core::config::{self, FailurePolicy, FeedConfig};
use std::path::{Path, PathBuf};

use commands::{run_completions, run_config, run_feeds, RunOptions};

/// Top-level CLI for feedscrub.
#[derive(Debug, Parser)]
#[command(name = "feedscrub")]
#[command(about = "Fetch RSS feeds concurrently, strip a substring, save each feed to a file", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/feedscrub/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// How to treat a feed that cannot be fetched or named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnError {
    /// Continue with empty content or an empty filename.
    Swallow,
    /// Leave the feed out and continue.
    Skip,
    /// Stop the run with an error.
    Abort,
}

impl From<OnError> for FailurePolicy {
    fn from(v: OnError) -> Self {
        match v {
            OnError::Swallow => FailurePolicy::Swallow,
            OnError::Skip => FailurePolicy::Skip,
            OnError::Abort => FailurePolicy::Abort,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every feed, remove the target substring, and write one file per feed.
    Run {
        /// Feed URLs to fetch instead of the configured list.
        urls: Vec<String>,
        /// Run up to N feeds concurrently (default from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
        /// Substring to remove from every feed.
        #[arg(long, value_name = "TEXT")]
        target: Option<String>,
        /// Per-feed transfer timeout in seconds (0 disables).
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Directory to write output files to (default: current directory).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
        /// What to do when a feed cannot be fetched or named.
        #[arg(long, value_enum, value_name = "POLICY")]
        on_error: Option<OnError>,
        /// Do not print filtered feeds to stdout.
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the config file path and the effective configuration.
    Config,

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn load_config(path: Option<&Path>) -> Result<(PathBuf, FeedConfig)> {
    match path {
        Some(p) => Ok((p.to_path_buf(), config::load_from_path(p)?)),
        None => Ok((config::config_path()?, config::load_or_init()?)),
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run {
                urls,
                jobs,
                target,
                timeout,
                output_dir,
                on_error,
                quiet,
            } => {
                let (_, mut cfg) = load_config(cli.config.as_deref())?;
                let opts = RunOptions {
                    jobs,
                    target,
                    timeout,
                    output_dir,
                    on_error: on_error.map(FailurePolicy::from),
                    quiet,
                };
                opts.apply(&mut cfg);
                tracing::debug!("effective config: {:?}", cfg);
                run_feeds(&cfg, urls, opts.quiet).await?;
            }
            CliCommand::Config => {
                let (path, cfg) = load_config(cli.config.as_deref())?;
                run_config(&path, &cfg)?;
            }
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}
