//! URL modeling and output filename derivation.
//!
//! Output files are named after the URL with its scheme stripped and the
//! remaining `/`-separated segments joined by `-`, suffixed with the run's
//! Unix timestamp.

mod path;

pub use path::joined_segments;

use crate::error::FeedError;

/// Extension appended to every output file.
const OUTPUT_EXTENSION: &str = "txt";

/// Derives the output filename for `url` at `timestamp` (Unix seconds).
///
/// # Examples
///
/// - `build_filename("https://news.example.com/rss/topics/top.xml", 1000)` →
///   `"news.example.com-rss-topics-top.xml_1000.txt"`
/// - `build_filename("nouri", 1000)` → `FeedError::Format`
pub fn build_filename(url: &str, timestamp: u64) -> Result<String, FeedError> {
    let joined = joined_segments(url).ok_or_else(|| FeedError::Format {
        url: url.to_string(),
    })?;
    Ok(format!("{}_{}.{}", joined, timestamp, OUTPUT_EXTENSION))
}
