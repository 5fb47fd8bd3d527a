//! Review-card discovery and field extraction.
//!
//! A [`Strategy`] is an ordered list of compiled selectors; lookups try each
//! one in turn and stop at the first that matches. Site tables are compiled
//! once per pipeline into [`SiteSelectors`].

use crate::dates::{DateVerdict, filter_date};
use crate::models::{DateBoundary, ReviewRecord, Source};
use crate::scrapers::sites::{FieldSelectors, SiteConfig};
use itertools::Itertools;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::debug;

/// Ordered fallback lookup: the first selector with a match wins.
#[derive(Debug, Clone)]
pub struct Strategy {
    selectors: Vec<Selector>,
}

impl Strategy {
    pub fn compile(selectors: &[&str]) -> Result<Self, Box<dyn Error>> {
        let selectors = selectors
            .iter()
            .map(|s| Selector::parse(s).map_err(|e| format!("invalid selector {s:?}: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { selectors })
    }

    /// First element under `scope` matched by the earliest matching selector.
    pub fn find_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.selectors.iter().find_map(|sel| scope.select(sel).next())
    }

    /// All elements of `document` matched by the earliest selector that
    /// matches at least one. Results from different selectors are never merged.
    pub fn select_all<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .map(|sel| document.select(sel).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
struct FieldStrategies {
    title: Strategy,
    review: Strategy,
    date: Strategy,
    rating: Strategy,
    reviewer: Strategy,
}

impl FieldStrategies {
    fn compile(fields: &FieldSelectors) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            title: Strategy::compile(fields.title)?,
            review: Strategy::compile(fields.review)?,
            date: Strategy::compile(fields.date)?,
            rating: Strategy::compile(fields.rating)?,
            reviewer: Strategy::compile(fields.reviewer)?,
        })
    }
}

/// Raw field values pulled from one card, before date filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub title: String,
    pub review: String,
    pub date: String,
    pub rating: String,
    pub reviewer: String,
}

/// Result of extracting one listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// Cards found and extracted, including ones later dropped by date.
    pub extracted: usize,
    /// Records that passed the date filter, in card order.
    pub records: Vec<ReviewRecord>,
}

/// Compiled selectors for one site.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub source: Source,
    pub search_link: Selector,
    cards: Strategy,
    fields: FieldStrategies,
}

impl SiteSelectors {
    pub fn compile(site: &SiteConfig) -> Result<Self, Box<dyn Error>> {
        let search_link =
            Selector::parse(site.search_link).map_err(|e| format!("invalid selector {:?}: {e}", site.search_link))?;
        Ok(Self {
            source: site.source,
            search_link,
            cards: Strategy::compile(site.cards)?,
            fields: FieldStrategies::compile(&site.fields)?,
        })
    }

    /// Review cards on a parsed listing page.
    pub fn cards<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.cards.select_all(document)
    }

    /// Pull the five fields out of one card. Missing fields become empty.
    pub fn extract_card(&self, card: ElementRef<'_>) -> CardFields {
        let f = &self.fields;
        let text = |strategy: &Strategy, sep: &str| {
            strategy
                .find_in(card)
                .map(|el| element_text(el, sep))
                .unwrap_or_default()
        };

        let date = f
            .date
            .find_in(card)
            .map(|el| match el.value().attr("datetime") {
                Some(dt) if !dt.is_empty() => dt.to_string(),
                _ => element_text(el, ""),
            })
            .unwrap_or_default();

        CardFields {
            title: text(&f.title, ""),
            review: text(&f.review, " "),
            date,
            rating: text(&f.rating, ""),
            reviewer: text(&f.reviewer, ""),
        }
    }

    /// Extract every card on `html` and apply the date filter.
    pub fn extract_page(&self, html: &str, boundary: &DateBoundary) -> PageExtraction {
        let document = Html::parse_document(html);
        let cards = self.cards(&document);

        let mut page = PageExtraction {
            extracted: cards.len(),
            records: Vec::with_capacity(cards.len()),
        };
        for card in cards {
            let fields = self.extract_card(card);
            match filter_date(&fields.date, boundary) {
                DateVerdict::Keep(date) => page.records.push(ReviewRecord {
                    title: fields.title,
                    review: fields.review,
                    date,
                    rating: fields.rating,
                    reviewer: fields.reviewer,
                    source: self.source,
                }),
                DateVerdict::Drop(date) => {
                    debug!(source = %self.source, %date, "Review outside date range; skipping");
                }
            }
        }
        page
    }
}

/// Whitespace-stripped text nodes of `el`, non-empty ones joined by `sep`.
fn element_text(el: ElementRef<'_>, sep: &str) -> String {
    el.text().map(str::trim).filter(|t| !t.is_empty()).join(sep)
}
