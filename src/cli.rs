//! Command-line interface definitions for Ticker News.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials can also be provided via environment variables.

use crate::fetch::DEFAULT_WORKERS;
use crate::ticker::DEFAULT_FRAME_MULTIPLIER;
use clap::Parser;

/// Command-line arguments for the Ticker News application.
///
/// # Examples
///
/// ```sh
/// # Default providers, key read from ./newsapi
/// ticker_news
///
/// # Pick providers and pass the key directly
/// ticker_news --source hacker-news --source bbc-news --api-key YOUR_KEY
///
/// # Local mirrors only, no key needed
/// ticker_news --no-default-sources --custom-source hn=http://localhost:3000/hn
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// File whose first line is the news API key
    #[arg(long, default_value = "./newsapi")]
    pub api_key_file: String,

    /// News API key (overrides --api-key-file)
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the article endpoint
    #[arg(long, default_value = "https://newsapi.org/v1/articles")]
    pub base_url: String,

    /// Provider id to query (repeatable)
    #[arg(
        short,
        long = "source",
        default_values_t = [
            "associated-press".to_string(),
            "hacker-news".to_string(),
            "the-new-york-times".to_string(),
        ]
    )]
    pub sources: Vec<String>,

    /// Skip provider ids entirely and only use --custom-source entries
    #[arg(long)]
    pub no_default_sources: bool,

    /// Extra source queried verbatim, as NAME=URL (repeatable)
    #[arg(long = "custom-source", value_name = "NAME=URL")]
    pub custom_sources: Vec<String>,

    /// Maximum number of sources fetched at once
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Frames per terminal column before the ticker stops
    #[arg(long, default_value_t = DEFAULT_FRAME_MULTIPLIER)]
    pub frame_multiplier: u32,

    /// Milliseconds to sleep between frames
    #[arg(long, default_value_t = 1)]
    pub frame_delay_ms: u64,

    /// Stop as soon as every headline is fully typed
    #[arg(long)]
    pub until_done: bool,

    /// Where to write logs (the terminal is busy with the ticker)
    #[arg(long, default_value = "ticker_news.log")]
    pub log_file: String,
}

impl Cli {
    /// Provider ids to query, honoring `--no-default-sources`.
    pub fn provider_ids(&self) -> &[String] {
        if self.no_default_sources {
            &[]
        } else {
            &self.sources
        }
    }
}
