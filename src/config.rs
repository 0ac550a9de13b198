//! API key loading and source construction.
//!
//! The key lives in a plain text file (first line only) unless it is passed
//! on the command line. Provider sources get `source={id}&apikey={key}`
//! appended to the base URL's query; custom sources are taken
//! verbatim from `name=url` pairs.

use crate::error::ConfigError;
use crate::models::Source;
use std::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// Read the API key from the first line of `path`.
///
/// # Errors
///
/// - [`ConfigError::MissingKeyFile`] if the file cannot be read
/// - [`ConfigError::EmptyKey`] if the first line is blank
#[instrument(level = "info", skip_all, fields(path = %path))]
pub fn read_api_key(path: &str) -> Result<String, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::MissingKeyFile {
        path: path.to_string(),
        source,
    })?;
    let key = contents.lines().next().unwrap_or("").trim_end_matches('\r');
    if key.trim().is_empty() {
        return Err(ConfigError::EmptyKey(path.to_string()));
    }
    info!("Loaded API key");
    Ok(key.to_string())
}

/// Build one [`Source`] per provider id, named after the id.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSource`] if `base_url` does not parse.
pub fn build_sources(base_url: &str, ids: &[String], api_key: &str) -> Result<Vec<Source>, ConfigError> {
    ids.iter()
        .map(|id| {
            let mut url = Url::parse(base_url).map_err(|e| ConfigError::InvalidSource {
                spec: id.clone(),
                reason: e.to_string(),
            })?;
            url.query_pairs_mut()
                .append_pair("source", id)
                .append_pair("apikey", api_key);
            debug!(source = %id, "Configured provider source");
            Ok(Source::new(id.as_str(), url.as_str()))
        })
        .collect()
}

/// Parse a `name=url` pair into a [`Source`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSource`] when the `=` is missing, the name
/// is empty, or the URL does not parse.
pub fn parse_custom_source(spec: &str) -> Result<Source, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSource {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };
    let (name, url) = spec.split_once('=').ok_or_else(|| invalid("expected NAME=URL"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    let url = Url::parse(url.trim()).map_err(|e| invalid(&e.to_string()))?;
    Ok(Source::new(name, url.as_str()))
}
