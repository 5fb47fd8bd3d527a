//! In-memory fetcher and HTML builders shared by the scraper tests.

use crate::api::{FetchAsync, FetchedPage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Serves canned pages by exact URL and records every request.
///
/// Unknown URLs answer `404` with an empty body. A failing stub returns a
/// transport error for every request.
#[derive(Debug, Default)]
pub struct StubFetcher {
    pages: HashMap<String, FetchedPage>,
    fail: bool,
    requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        let page = FetchedPage {
            status: 200,
            body: body.into(),
        };
        self.pages.insert(url.into(), page);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl FetchAsync for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, Box<dyn Error>> {
        self.requested.borrow_mut().push(url.to_string());
        if self.fail {
            return Err(format!("connection refused: {url}").into());
        }
        Ok(self.pages.get(url).cloned().unwrap_or(FetchedPage {
            status: 404,
            body: String::new(),
        }))
    }
}

/// A G2-style review card with a machine-readable date.
pub fn g2_card(title: &str, date: &str) -> String {
    format!(
        r#"<div itemprop="review">
             <h3>{title}</h3>
             <p>Body of {title}</p>
             <time datetime="{date}">{date}</time>
             <span data-qa="rating">5</span>
             <span data-qa="reviewer-name">Reviewer {title}</span>
           </div>"#
    )
}

/// Wrap cards in a minimal listing page.
pub fn g2_page(cards: &[String]) -> String {
    format!("<html><body><main>{}</main></body></html>", cards.concat())
}

/// Counts `ERROR`-level events seen by the subscriber it is layered onto.
#[derive(Debug, Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
