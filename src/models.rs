//! Data models shared by every review source.
//!
//! - [`Source`]: which review site a record came from
//! - [`ReviewRecord`]: one extracted review, as written to the output file
//! - [`DateBoundary`]: optional inclusive date range used to filter reviews

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A review-aggregation site that can be scraped.
///
/// Serialized in lowercase: `"g2"`, `"capterra"`, `"trustradius"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    G2,
    Capterra,
    Trustradius,
}

impl Source {
    /// All sources, in the order they run for `--source all`.
    pub const ALL: [Source; 3] = [Source::G2, Source::Capterra, Source::Trustradius];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::G2 => "g2",
            Source::Capterra => "capterra",
            Source::Trustradius => "trustradius",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single review pulled out of a listing page.
///
/// Every field except `source` may be empty when the page markup did not
/// contain it. No identity key exists: the same review scraped twice shows
/// up twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// Review headline.
    pub title: String,
    /// Review body text.
    pub review: String,
    /// `YYYY-MM-DD` when the date could be parsed, otherwise the raw text.
    pub date: String,
    /// Rating exactly as displayed; not normalized.
    pub rating: String,
    /// Reviewer name as displayed.
    pub reviewer: String,
    /// Site that produced this record.
    pub source: Source,
}

/// Inclusive date range. A missing endpoint imposes no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBoundary {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateBoundary {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// `true` iff `start <= date <= end`, skipping absent endpoints.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if self.start.is_some_and(|start| date < start) {
            return false;
        }
        if self.end.is_some_and(|end| date > end) {
            return false;
        }
        true
    }
}
