//! Concurrent multi-source headline fetching.
//!
//! This module issues one HTTP GET per configured [`Source`] and merges the
//! results, preserving which outcome belongs to which source.
//!
//! # Architecture
//!
//! - [`FetchSource`]: Core trait, one request per source, no retries
//! - [`HttpFetcher`]: `reqwest` implementation that decodes the JSON envelope
//! - [`fetch_all`]: Fans out over all sources with bounded parallelism and
//!   collects `(Source, FetchOutcome)` pairs in completion order
//!
//! A failing source never cancels or delays its siblings: each request is
//! awaited independently and its error is folded into a
//! [`FetchOutcome::Failed`].

use crate::error::FetchError;
use crate::models::{Article, Envelope, FetchOutcome, Source};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Default number of sources fetched at the same time.
pub const DEFAULT_WORKERS: usize = 3;

/// Trait for querying a single news source.
///
/// Implementors perform exactly one attempt. This abstraction lets the
/// coordinator be driven by the real HTTP client or by test doubles.
pub trait FetchSource {
    /// Fetch the article list for `source`.
    ///
    /// # Returns
    ///
    /// The decoded articles, or the reason the source is unusable.
    async fn fetch(&self, source: &Source) -> Result<Vec<Article>, FetchError>;
}

/// HTTP implementation of [`FetchSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FetchSource for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(source = %source.name))]
    async fn fetch(&self, source: &Source) -> Result<Vec<Article>, FetchError> {
        let t0 = Instant::now();
        // The provider reports failures in the body, so the HTTP status is not checked.
        let body = self.client.get(&source.url).send().await?.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            preview = %truncate_for_log(&body, 200),
            "Received response body"
        );
        parse_envelope(&body)
    }
}

/// Decode a provider response body into its article list.
///
/// # Errors
///
/// - [`FetchError::Decode`] if the body is not a JSON envelope, or the
///   envelope says `"ok"` but carries no `articles` field
/// - [`FetchError::Status`] if `status` is anything other than `"ok"`
pub fn parse_envelope(body: &str) -> Result<Vec<Article>, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.status != "ok" {
        return Err(FetchError::Status(envelope.status));
    }
    envelope
        .articles
        .ok_or_else(|| <serde_json::Error as serde::de::Error>::missing_field("articles").into())
}

/// Fetch every source concurrently and pair each outcome with its source.
///
/// At most `workers` requests are in flight at once. Results arrive in
/// completion order, so callers must not rely on them matching `sources`
/// order; each pair carries its own [`Source`].
///
/// # Returns
///
/// Exactly `sources.len()` pairs.
#[instrument(level = "info", skip_all, fields(sources = sources.len(), workers = workers))]
pub async fn fetch_all<F>(fetcher: &F, sources: &[Source], workers: usize) -> Vec<(Source, FetchOutcome)>
where
    F: FetchSource,
{
    let t0 = Instant::now();
    let outcomes: Vec<(Source, FetchOutcome)> = stream::iter(sources.iter().cloned())
        .map(|source| async move {
            let result = fetcher.fetch(&source).await;
            match &result {
                Ok(articles) => {
                    info!(source = %source.name, count = articles.len(), "Fetched headlines")
                }
                Err(e) => warn!(source = %source.name, error = %e, "Source fetch failed"),
            }
            (source, FetchOutcome::from(result))
        })
        .buffer_unordered(workers.max(1))
        .collect()
        .await;

    let failed = outcomes.iter().filter(|(_, o)| o.is_empty()).count();
    info!(
        total = outcomes.len(),
        failed,
        elapsed_ms = t0.elapsed().as_millis(),
        "Completed source fetches"
    );
    outcomes
}
