pub mod config;
pub mod error;
pub mod logging;

pub mod dispatcher;
pub mod fetcher;
pub mod filter;
pub mod storage;
pub mod url_model;

pub use error::FeedError;
