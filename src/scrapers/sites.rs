//! Per-site configuration tables.
//!
//! Each supported site is described entirely by data: where to search, how to
//! guess a product URL, how pages are numbered, and which CSS selectors find
//! review cards and their fields. Lists of selectors are tried in order and
//! the first one that matches wins.

use crate::models::Source;
use url::Url;

/// How a listing page number is appended to the listing URL.
///
/// The page number always lands in the query string, ahead of any
/// `#fragment`, so it reaches the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageParam {
    /// `?page=N`, or `&page=N` when the URL already has a query string.
    Query,
    /// Like [`PageParam::Query`], but first appends `/reviews` when the
    /// listing URL does not already contain it.
    ReviewsPath,
}

impl PageParam {
    /// URL of page `page` (1-based) of `listing_url`.
    pub fn page_url(&self, listing_url: &str, page: u32) -> String {
        let Ok(mut url) = Url::parse(listing_url) else {
            return self.splice_page(listing_url, page);
        };
        if *self == PageParam::ReviewsPath && !url.path().contains("/reviews") {
            let path = format!("{}/reviews", url.path().trim_end_matches('/'));
            url.set_path(&path);
        }
        url.query_pairs_mut().append_pair("page", &page.to_string());
        url.to_string()
    }

    /// String-level fallback for inputs `Url` cannot parse.
    fn splice_page(&self, listing_url: &str, page: u32) -> String {
        let (head, fragment) = match listing_url.split_once('#') {
            Some((head, fragment)) => (head, Some(fragment)),
            None => (listing_url, None),
        };
        let mut base = match self {
            PageParam::ReviewsPath if !head.contains("/reviews") => format!("{head}/reviews"),
            _ => head.to_string(),
        };
        let sep = if base.contains('?') { '&' } else { '?' };
        base.push_str(&format!("{sep}page={page}"));
        if let Some(fragment) = fragment {
            base.push('#');
            base.push_str(fragment);
        }
        base
    }
}

/// Ordered selectors for each field of a review card.
#[derive(Debug, Clone, Copy)]
pub struct FieldSelectors {
    pub title: &'static [&'static str],
    pub review: &'static [&'static str],
    pub date: &'static [&'static str],
    pub rating: &'static [&'static str],
    pub reviewer: &'static [&'static str],
}

/// Static description of one review site.
#[derive(Debug, Clone, Copy)]
pub struct SiteConfig {
    pub source: Source,
    /// Origin used to resolve search-result links.
    pub base_url: &'static str,
    /// Search endpoint; `{q}` is replaced by the encoded company name.
    pub search_url: &'static str,
    /// Selector for the first product link on the search results page.
    pub search_link: &'static str,
    /// Guessed listing URL; `{slug}` is replaced by the company slug.
    pub fallback_url: &'static str,
    pub page_param: PageParam,
    /// Card strategies; each entry may itself be a selector group.
    pub cards: &'static [&'static str],
    pub fields: FieldSelectors,
}

impl SiteConfig {
    pub fn for_source(source: Source) -> &'static SiteConfig {
        match source {
            Source::G2 => &G2,
            Source::Capterra => &CAPTERRA,
            Source::Trustradius => &TRUSTRADIUS,
        }
    }

    pub fn search_url_for(&self, query: &str) -> String {
        self.search_url.replace("{q}", query)
    }

    pub fn fallback_url_for(&self, slug: &str) -> String {
        self.fallback_url.replace("{slug}", slug)
    }
}

pub static G2: SiteConfig = SiteConfig {
    source: Source::G2,
    base_url: "https://www.g2.com",
    search_url: "https://www.g2.com/search?q={q}",
    search_link: r#"a[data-qa="product-card-link"][href]"#,
    fallback_url: "https://www.g2.com/products/{slug}/reviews",
    page_param: PageParam::Query,
    cards: &[
        r#"div[itemprop="review"]"#,
        r#"div.g2-review, div.review-card, div[class*="review"]"#,
    ],
    fields: FieldSelectors {
        title: &["h2, h3, h4"],
        review: &["p"],
        date: &["time, span.date"],
        rating: &[r#"[data-qa="rating"]"#],
        reviewer: &[r#"[data-qa="reviewer-name"]"#, "strong"],
    },
};

pub static CAPTERRA: SiteConfig = SiteConfig {
    source: Source::Capterra,
    base_url: "https://www.capterra.com",
    search_url: "https://www.capterra.com/search?q={q}",
    search_link: r#"a[data-qa="product-name"][href]"#,
    fallback_url: "https://www.capterra.com/p/{slug}/#reviews",
    page_param: PageParam::Query,
    cards: &["div.c-review", "div.review, li.review"],
    fields: FieldSelectors {
        title: &["h3, h4"],
        review: &["p"],
        date: &["time, span"],
        rating: &[".rating"],
        reviewer: &[".reviewer-name", "strong"],
    },
};

pub static TRUSTRADIUS: SiteConfig = SiteConfig {
    source: Source::Trustradius,
    base_url: "https://www.trustradius.com",
    search_url: "https://www.trustradius.com/search?query={q}",
    search_link: "a.search-result-link[href]",
    fallback_url: "https://www.trustradius.com/products/{slug}/reviews",
    page_param: PageParam::ReviewsPath,
    cards: &["div.review-card, article.review"],
    fields: FieldSelectors {
        title: &["h3, h4"],
        review: &["div.review-body", "p"],
        date: &["time"],
        rating: &[".rating"],
        reviewer: &[".user-name", "strong"],
    },
};
