//! Resolve a company name (or a direct URL) to a site's review listing URL.

use crate::api::FetchAsync;
use crate::scrapers::extract::SiteSelectors;
use crate::scrapers::sites::SiteConfig;
use crate::utils::{company_slug, looks_like_url, search_query, truncate_for_log};
use scraper::Html;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Find the listing URL for `company_or_url` on `site`.
///
/// URLs are returned with trailing slashes trimmed and no request made.
/// Names go through the site's search page; when no usable result link is
/// found the slug-based fallback URL is returned unverified.
///
/// # Arguments
///
/// * `fetcher` - Page fetcher used for the search request
/// * `site` - Static description of the target site
/// * `selectors` - Compiled selectors for `site`; only the search link is used
/// * `company_or_url` - Company name, or a listing URL starting with `http(s)://`
///
/// # Returns
///
/// The absolute listing URL. Transport errors from the search request are
/// returned as `Err`; a search page without a result is not an error.
#[instrument(level = "info", skip(fetcher, site, selectors), fields(source = %site.source))]
pub async fn resolve<F: FetchAsync>(
    fetcher: &F,
    site: &SiteConfig,
    selectors: &SiteSelectors,
    company_or_url: &str,
) -> Result<String, Box<dyn Error>> {
    if looks_like_url(company_or_url) {
        return Ok(company_or_url.trim_end_matches('/').to_string());
    }

    let search_url = site.search_url_for(&search_query(company_or_url));
    info!(url = %search_url, "Fetching");
    let page = fetcher.fetch(&search_url).await?;

    if let Some(href) = first_result_href(selectors, &page.body) {
        match Url::parse(site.base_url).and_then(|base| base.join(&href)) {
            Ok(resolved) => {
                info!(listing_url = %resolved, "Resolved product from search");
                return Ok(resolved.to_string());
            }
            Err(e) => warn!(%href, error = %e, "Search result link is not a usable URL"),
        }
    }

    let fallback = site.fallback_url_for(&company_slug(company_or_url));
    warn!(
        status = page.status,
        listing_url = %fallback,
        "No usable search result link; guessing listing URL from slug"
    );
    debug!(body_preview = %truncate_for_log(&page.body, 300), "Search page");
    Ok(fallback)
}

fn first_result_href(selectors: &SiteSelectors, body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    document
        .select(&selectors.search_link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}
