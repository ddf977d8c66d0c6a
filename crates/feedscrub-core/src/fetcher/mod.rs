//! Feed fetching.
//!
//! A [`Fetch`] implementation turns a feed URL into the raw response body.
//! Implementations are blocking; the dispatcher runs them on tokio's blocking
//! pool so a slow feed never stalls the runtime.

mod http;

pub use http::CurlFetcher;

use crate::error::FeedError;

/// Fetches the raw body of a feed.
pub trait Fetch: Send + Sync + 'static {
    /// Performs a single GET for `url` and returns the whole body.
    ///
    /// Must not send anything if `url` does not parse.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError>;
}

/// Validates `url` before any request is made.
pub fn parse_feed_url(url: &str) -> Result<url::Url, FeedError> {
    url::Url::parse(url).map_err(|source| FeedError::Parse {
        url: url.to_string(),
        source,
    })
}
