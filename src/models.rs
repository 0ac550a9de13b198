//! Data models for news sources, fetched articles, and per-source outcomes.
//!
//! This module defines the core data structures shared by the fetch stage and
//! the animation stage:
//! - [`Source`]: A configured news provider (display name + query URL)
//! - [`Article`]: A single headline with an optional description
//! - [`Envelope`]: The JSON body returned by the provider API
//! - [`FetchOutcome`]: The result of querying one [`Source`]

use crate::error::FetchError;
use serde::Deserialize;

/// A configured news provider.
///
/// Sources are built once at startup from the command line and never
/// change afterwards. The `name` is what a failure placeholder line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Display name of the provider (e.g. `"hacker-news"`).
    pub name: String,
    /// Fully-formed query URL, credentials included.
    pub url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A headline as received from the network.
///
/// A missing or `null` description means the line has no dimmed phase.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// Optional short summary rendered dimmed after the title.
    #[serde(default)]
    pub description: Option<String>,
}

impl Article {
    #[cfg(test)]
    pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: title.into(),
            description: description.map(str::to_string),
        }
    }
}

/// The JSON envelope returned by the provider.
///
/// ```json
/// { "status": "ok", "articles": [ { "title": "...", "description": null } ] }
/// ```
///
/// Only `status` is required to decode; `articles` is checked once the
/// status is known to be `"ok"`.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
}

/// The result of querying one [`Source`].
///
/// A failed fetch carries the reason so it can be logged, but downstream
/// code only cares whether there are articles to show.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A non-empty, ordered list of articles.
    Articles(Vec<Article>),
    /// The source produced nothing usable.
    Failed(FetchError),
}

impl FetchOutcome {
    /// Articles to display; empty when the fetch failed.
    pub fn articles(&self) -> &[Article] {
        match self {
            FetchOutcome::Articles(articles) => articles,
            FetchOutcome::Failed(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.articles().is_empty()
    }
}

impl From<Result<Vec<Article>, FetchError>> for FetchOutcome {
    fn from(result: Result<Vec<Article>, FetchError>) -> Self {
        match result {
            Ok(articles) if !articles.is_empty() => FetchOutcome::Articles(articles),
            Ok(_) => FetchOutcome::Failed(FetchError::NoArticles),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_null_description() {
        let json = r#"{
            "status": "ok",
            "articles": [
                {"title": "First", "description": "Summary"},
                {"title": "Second", "description": null},
                {"title": "Third"}
            ]
        }"#;

        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.status, "ok");
        let articles = envelope.articles.unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].description.as_deref(), Some("Summary"));
        assert_eq!(articles[1].description, None);
        assert_eq!(articles[2].description, None);
    }

    #[test]
    fn test_envelope_error_status_without_articles() {
        let envelope: Envelope = serde_json::from_str(r#"{"status":"error"}"#).unwrap();
        assert_eq!(envelope.status, "error");
        assert!(envelope.articles.is_none());
    }

    #[test]
    fn test_outcome_from_empty_ok_is_failure() {
        let outcome = FetchOutcome::from(Ok(vec![]));
        assert!(outcome.is_empty());
        assert!(matches!(outcome, FetchOutcome::Failed(FetchError::NoArticles)));
    }

    #[test]
    fn test_outcome_articles_preserve_order() {
        let outcome = FetchOutcome::from(Ok(vec![
            Article::new("a", None),
            Article::new("b", Some("desc")),
        ]));
        let titles: Vec<&str> = outcome.articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_failed_outcome_has_no_articles() {
        let outcome = FetchOutcome::Failed(FetchError::Status("error".to_string()));
        assert!(outcome.articles().is_empty());
    }
}
