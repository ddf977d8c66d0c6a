//! libcurl-backed GET fetcher.

use std::time::Duration;

use super::{parse_feed_url, Fetch};
use crate::config::FeedConfig;
use crate::error::FeedError;

/// Plain GET via libcurl: redirects followed, no custom headers, no retry.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Option<Duration>,
}

impl CurlFetcher {
    pub fn new(connect_timeout: Duration, timeout: Option<Duration>) -> Self {
        Self {
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Self {
        Self::new(cfg.connect_timeout(), cfg.fetch_timeout())
    }

    fn get(&self, url: &str) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(t) = self.timeout {
            easy.timeout(t)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let parsed = parse_feed_url(url)?;
        let (status, body) = self.get(parsed.as_str()).map_err(|source| FeedError::Fetch {
            url: url.to_string(),
            source,
        })?;
        if !(200..300).contains(&status) {
            return Err(FeedError::Http {
                url: url.to_string(),
                status,
                body,
            });
        }
        tracing::debug!(url, bytes = body.len(), "fetched feed");
        Ok(body)
    }
}
