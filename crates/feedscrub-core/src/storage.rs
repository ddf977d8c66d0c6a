//! Output file writing.
//!
//! Each feed is written to its own file in one call; existing files are
//! truncated, never appended to.

use crate::error::FeedError;
use std::path::Path;

/// Creates (or truncates) `path` and writes `content` to it.
pub async fn write_file(path: &Path, content: &str) -> Result<(), FeedError> {
    tokio::fs::write(path, content.as_bytes())
        .await
        .map_err(|source| FeedError::Io {
            path: path.to_path_buf(),
            source,
        })
}
