//! Walk a listing URL page by page.
//!
//! Pages are numbered from 1. The walk stops at the first page that:
//! - answers with anything other than `200`,
//! - has no review cards under any card strategy,
//! - or would exceed the configured page cap.
//!
//! Cards dropped by the date filter still count as extracted, so a page full
//! of out-of-range reviews does not end the walk.

use crate::api::FetchAsync;
use crate::models::DateBoundary;
use crate::scrapers::extract::{PageExtraction, SiteSelectors};
use crate::scrapers::sites::PageParam;
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// One successfully fetched and extracted listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub number: u32,
    pub url: String,
    pub extraction: PageExtraction,
}

/// Sequential, non-restartable cursor over a listing's pages.
pub struct Paginator<'a, F> {
    fetcher: &'a F,
    selectors: &'a SiteSelectors,
    boundary: DateBoundary,
    listing_url: String,
    page_param: PageParam,
    delay: Duration,
    max_pages: Option<u32>,
    next: u32,
    done: bool,
}

impl<'a, F: FetchAsync> Paginator<'a, F> {
    pub fn new(
        fetcher: &'a F,
        selectors: &'a SiteSelectors,
        listing_url: impl Into<String>,
        page_param: PageParam,
        boundary: DateBoundary,
    ) -> Self {
        Self {
            fetcher,
            selectors,
            boundary,
            listing_url: listing_url.into(),
            page_param,
            delay: Duration::ZERO,
            max_pages: None,
            next: 1,
            done: false,
        }
    }

    /// Pause inserted after each page that lets the walk continue.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetch and extract the next page, or `None` once the walk has ended.
    ///
    /// Transport errors are returned as `Err` and end the walk.
    #[instrument(level = "debug", skip(self), fields(source = %self.selectors.source, page = self.next))]
    pub async fn next_page(&mut self) -> Result<Option<ListingPage>, Box<dyn Error>> {
        if self.done {
            return Ok(None);
        }
        if self.max_pages.is_some_and(|max| self.next > max) {
            info!(max_pages = ?self.max_pages, "Reached page cap");
            self.done = true;
            return Ok(None);
        }

        let url = self.page_param.page_url(&self.listing_url, self.next);
        info!(url = %url, "Fetching");
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        if !page.is_success() {
            info!(status = page.status, %url, "Non-success response; stopping");
            self.done = true;
            return Ok(None);
        }

        let extraction = self.selectors.extract_page(&page.body, &self.boundary);
        if extraction.extracted == 0 {
            debug!(%url, "No review cards found; stopping");
            self.done = true;
            return Ok(None);
        }

        let listing = ListingPage {
            number: self.next,
            url,
            extraction,
        };
        self.next += 1;
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        Ok(Some(listing))
    }
}
