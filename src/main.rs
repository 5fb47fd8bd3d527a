//! # Review Scraper
//!
//! Collects publicly rendered product reviews from G2, Capterra and
//! TrustRadius, filters them by date, and writes every record to a single
//! JSON file.
//!
//! ## Usage
//!
//! ```sh
//! review_scraper --company "Zoom" --start 2023-01-01 --end 2024-12-31 --output zoom.json
//! ```
//!
//! ## Architecture
//!
//! Each requested site runs the same pipeline in turn:
//! 1. **Locate**: search the site for the company, or use the given URL
//! 2. **Paginate**: fetch listing pages until one has no review cards
//! 3. **Extract**: pull review fields out of each card, dropping reviews
//!    dated outside the requested range
//!
//! A site that fails is logged and skipped. Progress and errors go to
//! stderr; the JSON file only ever holds review records.

use clap::Parser;
use itertools::Itertools;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod dates;
mod models;
mod outputs;
mod scrapers;
mod utils;

use api::HttpFetcher;
use cli::Cli;
use models::DateBoundary;
use outputs::json;

#[tokio::main]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let settings = config::load_settings(args.config.as_deref())
        .await?
        .with_overrides(args.delay_ms, args.timeout_secs, args.max_pages);
    let boundary = DateBoundary::new(args.start, args.end);
    let sources = args.source.sources();
    info!(company = %args.company, ?sources, ?boundary, "review_scraper starting up");

    let report = scrapers::run_sources(&sources, &args.company, &boundary, &settings, |_| {
        HttpFetcher::new(&settings)
    })
    .await;

    json::write_reviews(&report.reviews, &args.output).await?;

    let elapsed = start_time.elapsed();
    info!(
        reviews = report.reviews.len(),
        failed_sources = report.failures.len(),
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    if args.strict && !report.failures.is_empty() {
        let failed = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.source, f.error))
            .join("; ");
        warn!(%failed, "Exiting with failure status (--strict)");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
