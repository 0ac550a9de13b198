//! # Ticker News
//!
//! A terminal news ticker that fetches headlines from several news sources at
//! once and types each one onto the screen character by character, followed
//! by its description in a dimmed style.
//!
//! ## Usage
//!
//! ```sh
//! echo "YOUR_NEWSAPI_KEY" > ./newsapi
//! ticker_news
//! ```
//!
//! ## Architecture
//!
//! The application runs two stages:
//! 1. **Fetching**: Query every source concurrently (3 at a time by default);
//!    each result keeps its source so failures can be labeled
//! 2. **Animating**: One typewriter line per headline, all advanced by a
//!    single frame loop that flushes the terminal once per frame
//!
//! The ticker then waits for any key before restoring the terminal.

use clap::Parser;
use std::error::Error;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod animator;
mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod surface;
mod term;
mod ticker;
mod utils;

use cli::Cli;
use config::{build_sources, parse_custom_source, read_api_key};
use error::ConfigError;
use fetch::{HttpFetcher, fetch_all};
use models::Source;
use surface::TerminalSurface;
use term::{TerminalSession, wait_for_key};
use ticker::{FrameBudget, TickerLoop, compose_lines};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let _log_guard = init_tracing(&args.log_file);

    let start_time = Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "ticker_news starting up");

    // A missing key is fatal before the terminal is touched.
    let sources = match configured_sources(&args) {
        Ok(sources) => sources,
        Err(e) => {
            error!(error = %e, "Startup configuration failed");
            return Err(e.into());
        }
    };
    info!(count = sources.len(), workers = args.workers, "Configured sources");

    let session = TerminalSession::start()?;
    let size = session.size()?;
    info!(columns = size.0, rows = size.1, "Viewport size");
    let mut surface = TerminalSurface::new(io::stdout(), size);

    let fetcher = HttpFetcher::new();
    let outcomes = fetch_all(&fetcher, &sources, args.workers).await;

    let lines = compose_lines(&outcomes, &mut surface, &mut rand::rng());
    let budget = FrameBudget::from_viewport(size.0, args.frame_multiplier, args.until_done);
    let mut ticker = TickerLoop::new(lines, budget, Duration::from_millis(args.frame_delay_ms));
    ticker.run(&mut surface).await?;

    tokio::task::spawn_blocking(wait_for_key).await??;
    drop(session);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Send logs to `log_file`, since the ticker owns the terminal.
///
/// The returned guard must stay alive until exit so buffered lines get written.
fn init_tracing(log_file: &str) -> WorkerGuard {
    let path = Path::new(log_file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ticker_news.log".into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
    guard
}

/// Provider sources (which need the API key) followed by custom sources.
#[instrument(level = "info", skip_all)]
fn configured_sources(args: &Cli) -> Result<Vec<Source>, ConfigError> {
    let mut sources = Vec::new();

    let ids = args.provider_ids();
    if !ids.is_empty() {
        let key = match &args.api_key {
            Some(key) => key.clone(),
            None => read_api_key(&args.api_key_file)?,
        };
        sources.extend(build_sources(&args.base_url, ids, &key)?);
    }

    for spec in &args.custom_sources {
        sources.push(parse_custom_source(spec)?);
    }
    Ok(sources)
}
