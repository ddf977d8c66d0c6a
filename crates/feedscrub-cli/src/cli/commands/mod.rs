//! CLI command handlers, one file per command.

mod completions;
mod config;
mod run;

pub use completions::run_completions;
pub use config::run_config;
pub use run::{run_feeds, RunOptions};
