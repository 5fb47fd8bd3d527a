//! Command-line interface definitions.
//!
//! Date bounds are validated at parse time with the same format list used to
//! read review dates, so a typo is reported instead of silently ignored.

use crate::dates::parse_date;
use crate::models::Source;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

/// Which sites to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceChoice {
    G2,
    Capterra,
    Trustradius,
    All,
}

impl SourceChoice {
    /// Sources to run, in order.
    pub fn sources(&self) -> Vec<Source> {
        match self {
            SourceChoice::G2 => vec![Source::G2],
            SourceChoice::Capterra => vec![Source::Capterra],
            SourceChoice::Trustradius => vec![Source::Trustradius],
            SourceChoice::All => Source::ALL.to_vec(),
        }
    }
}

/// Scrape SaaS reviews from G2, Capterra and TrustRadius.
///
/// # Examples
///
/// ```sh
/// review_scraper --company "Zoom" --start 2023-01-01 --end 2024-12-31 --output zoom.json
/// review_scraper --source capterra --company https://www.capterra.com/p/12345/Zoom/reviews/
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Company name, or a direct review listing URL
    #[arg(long)]
    pub company: String,

    /// Inclusive lower date bound (e.g. 2024-01-01, "March 5, 2024")
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Inclusive upper date bound
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// Site to scrape
    #[arg(long, value_enum, default_value_t = SourceChoice::All)]
    pub source: SourceChoice,

    /// Output JSON file
    #[arg(long, default_value = "reviews_output.json")]
    pub output: String,

    /// Optional path to a YAML settings file
    #[arg(short, long, env = "REVIEW_SCRAPER_CONFIG")]
    pub config: Option<String>,

    /// Pause between listing pages, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum listing pages per source
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Exit with status 1 if any source failed
    #[arg(long)]
    pub strict: bool,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("unrecognized date {s:?} (try YYYY-MM-DD)"))
}
