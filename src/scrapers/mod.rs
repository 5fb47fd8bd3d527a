//! Review-site scraping pipeline.
//!
//! Every site runs the same pipeline, driven by its [`sites::SiteConfig`]:
//!
//! 1. **Locate**: turn a company name or URL into a listing URL ([`locator`])
//! 2. **Paginate**: fetch listing pages until one is empty ([`paginator`])
//! 3. **Extract**: pull review cards and filter them by date ([`extract`])
//!
//! [`run_sources`] runs the pipeline for several sites in order. A failing
//! site is logged and skipped; the others still run.
//!
//! # Supported Sources
//!
//! | Source | Search | Pagination |
//! |--------|--------|------------|
//! | G2 | `/search?q=` | `?page=N` |
//! | Capterra | `/search?q=` | `?page=N` |
//! | TrustRadius | `/search?query=` | `/reviews?page=N` |

pub mod extract;
pub mod locator;
pub mod paginator;
pub mod sites;

#[cfg(test)]
pub(crate) mod test_support;

use crate::api::FetchAsync;
use crate::config::ScrapeSettings;
use crate::models::{DateBoundary, ReviewRecord, Source};
use extract::SiteSelectors;
use paginator::Paginator;
use sites::SiteConfig;
use std::error::Error;
use tracing::{error, info, instrument};

/// Run the full pipeline for one site.
///
/// Records come back in page order, then card order, all tagged with the
/// site's [`Source`].
///
/// # Arguments
///
/// * `fetcher` - Page fetcher shared by the search and listing requests
/// * `site` - The site to scrape
/// * `company` - Company name or direct listing URL
/// * `boundary` - Inclusive date range; unparseable dates always pass
/// * `settings` - Page delay and page cap
///
/// # Returns
///
/// Every kept record for the site, or the first error raised while
/// compiling selectors, locating the listing, or fetching a page.
#[instrument(level = "info", skip(fetcher, site, settings), fields(source = %site.source))]
pub async fn scrape_source<F: FetchAsync>(
    fetcher: &F,
    site: &SiteConfig,
    company: &str,
    boundary: &DateBoundary,
    settings: &ScrapeSettings,
) -> Result<Vec<ReviewRecord>, Box<dyn Error>> {
    let selectors = SiteSelectors::compile(site)?;
    let listing_url = locator::resolve(fetcher, site, &selectors, company).await?;

    let mut paginator = Paginator::new(fetcher, &selectors, listing_url, site.page_param, *boundary)
        .with_delay(settings.delay())
        .with_max_pages(settings.max_pages);

    let mut reviews = Vec::new();
    while let Some(page) = paginator.next_page().await? {
        info!(
            page = page.number,
            url = %page.url,
            extracted = page.extraction.extracted,
            kept = page.extraction.records.len(),
            "Processed listing page"
        );
        reviews.extend(page.extraction.records);
    }
    Ok(reviews)
}

/// A source whose pipeline raised an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: Source,
    pub error: String,
}

/// Combined outcome of [`run_sources`].
#[derive(Debug, Default)]
pub struct RunReport {
    /// Records from all successful sources, in run order.
    pub reviews: Vec<ReviewRecord>,
    pub failures: Vec<SourceFailure>,
}

/// Run each source's pipeline in order and merge the results.
///
/// `make_fetcher` is called once per source so every pipeline gets its own
/// client (and cookie jar). Any error, whether building the client or
/// scraping, is logged and recorded in [`RunReport::failures`].
///
/// # Arguments
///
/// * `sources` - Sites to scrape, in run order
/// * `company` - Company name or direct listing URL, passed to every site
/// * `boundary` - Inclusive date range applied to every record
/// * `settings` - Shared scrape settings
/// * `make_fetcher` - Builds the fetcher for one source
///
/// # Returns
///
/// A [`RunReport`] holding the merged records and one [`SourceFailure`] per
/// failed source. This never fails as a whole.
#[instrument(level = "info", skip(boundary, settings, make_fetcher))]
pub async fn run_sources<F, M>(
    sources: &[Source],
    company: &str,
    boundary: &DateBoundary,
    settings: &ScrapeSettings,
    make_fetcher: M,
) -> RunReport
where
    F: FetchAsync,
    M: Fn(Source) -> Result<F, Box<dyn Error>>,
{
    let mut report = RunReport::default();

    for &source in sources {
        let site = SiteConfig::for_source(source);
        let result = match make_fetcher(source) {
            Ok(fetcher) => scrape_source(&fetcher, site, company, boundary, settings).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(reviews) => {
                info!(%source, count = reviews.len(), "Found reviews");
                report.reviews.extend(reviews);
            }
            Err(e) => {
                error!(%source, error = %e, "Error scraping source");
                report.failures.push(SourceFailure {
                    source,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use super::test_support::{ErrorCounter, StubFetcher, g2_card, g2_page};
    use tracing_subscriber::layer::SubscriberExt;

    fn quick_settings() -> ScrapeSettings {
        ScrapeSettings {
            delay_ms: 0,
            ..ScrapeSettings::default()
        }
    }

    fn capterra_card(n: usize) -> String {
        format!(r#"<div class="c-review"><h3>Capterra {n}</h3><p>Body</p><span class="reviewer-name">C{n}</span></div>"#)
    }

    fn trustradius_card(n: usize) -> String {
        format!(r#"<div class="review-card"><h4>TR {n}</h4><div class="review-body">Body</div><time>Jan 0{n}, 2024</time></div>"#)
    }

    #[tokio::test]
    async fn test_single_source_end_to_end() {
        let fetcher = StubFetcher::new()
            .page(
                "https://www.g2.com/search?q=Acme",
                r#"<a data-qa="product-card-link" href="/products/acme/reviews">Acme</a>"#,
            )
            .page(
                "https://www.g2.com/products/acme/reviews?page=1",
                g2_page(&[g2_card("first", "2024-02-01"), g2_card("second", "2024-02-02")]),
            )
            .page("https://www.g2.com/products/acme/reviews?page=2", g2_page(&[]));
        let boundary = DateBoundary::new(NaiveDate::from_ymd_opt(2024, 1, 1), NaiveDate::from_ymd_opt(2024, 12, 31));

        let reviews = scrape_source(&fetcher, &sites::G2, "Acme", &boundary, &quick_settings())
            .await
            .unwrap();

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].title, "first");
        assert_eq!(reviews[1].title, "second");
        assert_eq!(reviews[0].reviewer, "Reviewer first");
        assert_eq!(reviews[0].rating, "5");
        assert_eq!(reviews[1].date, "2024-02-02");
        assert!(reviews.iter().all(|r| r.source == Source::G2));
    }

    #[tokio::test]
    async fn test_unparseable_date_survives_filter() {
        let fetcher = StubFetcher::new().page(
            "https://example.test/acme?page=1",
            g2_page(&[g2_card("dated", "2010-01-01"), g2_card("mystery", "garbage")]),
        );
        let boundary = DateBoundary::new(NaiveDate::from_ymd_opt(2024, 1, 1), None);

        let reviews = scrape_source(&fetcher, &sites::G2, "https://example.test/acme/", &boundary, &quick_settings())
            .await
            .unwrap();

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].title, "mystery");
        assert_eq!(reviews[0].date, "garbage");
    }

    #[tokio::test]
    async fn test_run_sources_isolates_failures() {
        let company = "https://example.test/acme";
        let capterra_page = format!(
            "<html><body>{}</body></html>",
            (1..=3).map(capterra_card).collect::<String>()
        );
        let trustradius_page = format!(
            "<html><body>{}</body></html>",
            (1..=5).map(trustradius_card).collect::<String>()
        );

        let errors = ErrorCounter::default();
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(errors.clone()));

        let report = run_sources(
            &Source::ALL,
            company,
            &DateBoundary::default(),
            &quick_settings(),
            |source| {
                Ok(match source {
                    Source::G2 => StubFetcher::new().failing(),
                    Source::Capterra => StubFetcher::new().page(format!("{company}?page=1"), capterra_page.clone()),
                    Source::Trustradius => {
                        StubFetcher::new().page(format!("{company}/reviews?page=1"), trustradius_page.clone())
                    }
                })
            },
        )
        .await;

        assert_eq!(report.reviews.len(), 8);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].source, Source::G2);
        assert_eq!(errors.count(), 1);
        assert!(report.reviews[..3].iter().all(|r| r.source == Source::Capterra));
        assert!(report.reviews[3..].iter().all(|r| r.source == Source::Trustradius));
        assert_eq!(report.reviews[3].date, "2024-01-01");
    }

    #[tokio::test]
    async fn test_run_sources_reports_fetcher_build_error() {
        let report = run_sources(
            &[Source::Capterra],
            "Acme",
            &DateBoundary::default(),
            &quick_settings(),
            |_| -> Result<StubFetcher, Box<dyn Error>> { Err("no client".into()) },
        )
        .await;

        assert!(report.reviews.is_empty());
        assert_eq!(
            report.failures,
            vec![SourceFailure {
                source: Source::Capterra,
                error: "no client".to_string()
            }]
        );
    }
}
