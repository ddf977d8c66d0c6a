//! `feedscrub config` – show where the config lives and what it resolves to.

use anyhow::Result;
use feedscrub_core::config::{self, FeedConfig};
use std::path::Path;

pub fn run_config(path: &Path, cfg: &FeedConfig) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", config::to_toml(cfg)?);
    Ok(())
}
