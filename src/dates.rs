//! Free-text date parsing and range filtering.
//!
//! Review sites print dates in a handful of layouts. [`parse_date`] tries a
//! fixed list of them in order and falls back to ISO-8601 timestamps.
//! Filtering is fail-open: a date that cannot be parsed is always kept.

use crate::models::DateBoundary;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Calendar layouts tried in order; the first successful parse wins.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d-%m-%Y", "%d %B %Y", "%B %d, %Y", "%b %d, %Y"];

/// Naive timestamp layouts accepted by the ISO-8601 fallback.
const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-bearing timestamp layouts that RFC 3339 does not cover
/// (minute precision, or offsets without a colon). A trailing `Z` is
/// rewritten to `+00:00` before these are tried.
const ISO_OFFSET_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

/// Parse a date string using the known review-site layouts.
///
/// Returns `None` when nothing matches.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_date("March 5, 2024"), NaiveDate::from_ymd_opt(2024, 3, 5));
/// assert_eq!(parse_date("last week"), None);
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| parse_iso_datetime(text))
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Some(date) = parse_iso_basic_date(text) {
        return Some(date);
    }

    let with_offset = match text.strip_suffix(['Z', 'z']) {
        Some(head) => format!("{head}+00:00"),
        None => text.to_string(),
    };
    ISO_OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&with_offset, fmt).ok())
        .map(|dt| dt.date_naive())
        .or_else(|| {
            ISO_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// ISO-8601 basic calendar date, `YYYYMMDD`.
fn parse_iso_basic_date(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = text[..4].parse().ok()?;
    let month = text[4..6].parse().ok()?;
    let day = text[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Outcome of running a raw date through the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateVerdict {
    /// Keep the record; carries the value for the `date` field.
    Keep(String),
    /// Parsed successfully but falls outside the boundary.
    Drop(NaiveDate),
}

/// Normalize `raw` and decide whether it passes `boundary`.
///
/// Parsed dates are rendered as `YYYY-MM-DD`. Unparseable (or empty) text is
/// kept verbatim and never filtered out.
pub fn filter_date(raw: &str, boundary: &DateBoundary) -> DateVerdict {
    match parse_date(raw) {
        Some(date) if boundary.contains(date) => DateVerdict::Keep(date.format("%Y-%m-%d").to_string()),
        Some(date) => DateVerdict::Drop(date),
        None => {
            if !raw.is_empty() {
                debug!(raw, "Unparseable review date; keeping record");
            }
            DateVerdict::Keep(raw.to_string())
        }
    }
}
