//! Error types for the fetch stage and startup configuration.
//!
//! Fetch errors are always non-fatal: they turn into a placeholder line for
//! the affected source. Config errors are fatal and abort before the
//! terminal session starts.

use thiserror::Error;

/// Why a single source produced no articles.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("source reported status {0:?}")]
    Status(String),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("source returned no articles")]
    NoArticles,
}

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("make a file with your api key at {path}: {source}")]
    MissingKeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("api key file {0} is empty")]
    EmptyKey(String),

    #[error("invalid source {spec:?}: {reason}")]
    InvalidSource { spec: String, reason: String },
}
