//! # Jugantor RSS
//!
//! A single-shot converter that fetches Jugantor's latest-news JSON feed and
//! republishes it as a standards-compliant RSS 2.0 document. The publisher
//! sits behind bot detection, so the fetch is routed through a
//! browser-emulation proxy (FlareSolverr-style command endpoint).
//!
//! ## Usage
//!
//! ```sh
//! jugantor_rss --proxy-url http://localhost:8191/v1 -o rss.xml
//! ```
//!
//! Run it from cron or a systemd timer; each run is independent, holds no
//! state, and fully overwrites the output file.
//!
//! ## Architecture
//!
//! A strictly sequential pipeline:
//! 1. **Fetch**: ask the proxy to load the news endpoint in a real browser,
//!    then dig the JSON item list out of its response envelope
//! 2. **Render**: map each item to an RSS `<item>` fragment and wrap the
//!    fragments in the channel envelope
//! 3. **Write**: persist the document, UTF-8, full overwrite
//!
//! Any fatal fetch error aborts the run before the write, leaving the
//! previous feed file untouched.

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod error;
mod feed;
mod fetcher;
mod models;
mod utils;

use cli::Cli;
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("jugantor_rss starting up");

    let args = Cli::parse();
    debug!(?args.proxy_url, ?args.target_url, ?args.output, "Parsed CLI arguments");

    // Early check: fail before the browser-emulation round trip if the
    // output location cannot be written anyway.
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output,
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    // ---- Fetch ----
    let client = reqwest::Client::new();
    let items = match fetcher::fetch_news_items(
        &client,
        &args.proxy_url,
        &args.target_url,
        args.max_timeout_ms,
    )
    .await
    {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "Fetch failed; leaving previous output untouched");
            return Err(e.into());
        }
    };
    info!(count = items.len(), "Fetched news items");

    // ---- Render ----
    let document = feed::render_feed(&items, Utc::now());
    debug!(bytes = document.len(), "Rendered RSS document");

    // ---- Write ----
    info!(path = %args.output, "Writing RSS feed");
    if let Err(e) = tokio::fs::write(&args.output, &document).await {
        error!(path = %args.output, error = %e, "Failed writing RSS feed");
        return Err(e.into());
    }
    info!(path = %args.output, bytes = document.len(), "Wrote RSS feed");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
