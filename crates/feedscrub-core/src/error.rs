//! Error type shared by the fetch, name, write and dispatch stages.

use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a single feed pipeline stage or by the dispatcher.
///
/// Which variants are fatal for a run is decided by the dispatcher and the
/// configured [`FailurePolicy`](crate::config::FailurePolicy); write failures
/// and cancelled acquisitions always are.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Feed URL is not well-formed; no request was sent.
    #[error("failed to parse url {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport failure while fetching (DNS, connect, TLS, body read).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Server answered with a non-2xx status. `body` is the error page as received.
    #[error("GET {url} returned HTTP {status}")]
    Http {
        url: String,
        status: u32,
        body: Vec<u8>,
    },

    /// Filesystem failure while creating or writing an output file.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output filename could not be derived from the URL.
    #[error("failed to create filename from {url}")]
    Format { url: String },

    /// Permit acquisition was interrupted before a slot became free.
    #[error("failed to acquire permit: cancelled")]
    Cancelled,

    /// A feed task panicked or was aborted before signalling completion.
    #[error("feed task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl FeedError {
    /// True for errors raised while fetching (parse, transport, status).
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            FeedError::Parse { .. } | FeedError::Fetch { .. } | FeedError::Http { .. }
        )
    }

    /// Body that came back with the error, if the server answered at all.
    pub fn response_body(&self) -> Option<&[u8]> {
        match self {
            FeedError::Http { body, .. } => Some(body),
            _ => None,
        }
    }
}
