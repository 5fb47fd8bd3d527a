//! HTTP access for the scrapers.
//!
//! The pipeline only talks to the network through the [`FetchAsync`] trait,
//! so tests can swap the real client for canned pages:
//! - [`FetchAsync`]: fetch one URL, returning status and body
//! - [`HttpFetcher`]: `reqwest` client with a browser User-Agent, a request
//!   timeout and a cookie store that lives as long as the fetcher
//!
//! A non-success status is data, not an error. Only transport failures
//! (DNS, connect, timeout, body read) come back as `Err`.

use crate::config::ScrapeSettings;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::error::Error;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// A fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl FetchedPage {
    /// Only a plain `200 OK` counts as success.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Trait for fetching a page over HTTP.
pub trait FetchAsync {
    /// GET `url` and return its status and body.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, Box<dyn Error>>;
}

/// Real HTTP client used by one source pipeline.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client configured from `settings`.
    pub fn new(settings: &ScrapeSettings) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchAsync for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<FetchedPage, Box<dyn Error>> {
        let t0 = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u128, error = %e, "Request failed");
                return Err(e.into());
            }
        };
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Fetched page"
        );
        Ok(FetchedPage { status, body })
    }
}
