//! Catalogue walker
//!
//! Enumerates every book detail URL of the catalogue, following the pager from
//! the root listing page until a page has no "next" link. Listing pages are
//! fetched lazily: the next one is requested only once every URL of the current
//! page has been handed out.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::selectors::listing;
use crate::{ParseError, ScraperError};
use reqwest::Client;
use scraper::Html;
use std::collections::VecDeque;
use url::Url;

/// Links extracted from one listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    /// Book detail URLs, in document order
    pub book_urls: Vec<Url>,

    /// The following listing page, if any
    pub next_page: Option<Url>,
}

/// Parses a listing page
///
/// Relative links are resolved against `page_url`. Duplicated book links are
/// kept as they are.
///
/// # Example
///
/// ```
/// use shelf_ripple::crawler::parse_listing;
/// use url::Url;
///
/// let html = r#"<html><body><ol class="row">
///     <li><article class="product_pod"><h3><a href="a/index.html">A</a></h3></article></li>
/// </ol>
/// <ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul></body></html>"#;
/// let page_url = Url::parse("http://books.toscrape.com/catalogue/page-1.html").unwrap();
///
/// let page = parse_listing(html, &page_url).unwrap();
/// assert_eq!(page.book_urls[0].as_str(), "http://books.toscrape.com/catalogue/a/index.html");
/// assert_eq!(page.next_page.unwrap().as_str(), "http://books.toscrape.com/catalogue/page-2.html");
/// ```
pub fn parse_listing(html: &str, page_url: &Url) -> Result<ListingPage, ParseError> {
    let document = Html::parse_document(html);

    if document.select(&listing::PRODUCT_GRID).next().is_none() {
        return Err(ParseError::new(
            page_url.as_str(),
            "missing product grid on listing page",
        ));
    }

    let book_urls = document
        .select(&listing::BOOK_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| resolve(page_url, href))
        .collect::<Result<Vec<_>, _>>()?;

    let next_page = document
        .select(&listing::NEXT_PAGE)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| resolve(page_url, href))
        .transpose()?;

    Ok(ListingPage {
        book_urls,
        next_page,
    })
}

fn resolve(page_url: &Url, href: &str) -> Result<Url, ParseError> {
    page_url.join(href.trim()).map_err(|e| {
        ParseError::new(
            page_url.as_str(),
            format!("unresolvable link '{}': {}", href, e),
        )
    })
}

/// Lazy walk over the book detail URLs of a catalogue
///
/// The walker holds the cursor of a single walk; create a new one to start over
/// from the root.
pub struct CatalogueWalker<'a> {
    client: &'a Client,
    next_page: Option<Url>,
    pending: VecDeque<Url>,
    pages_visited: usize,
    failed: bool,
}

impl<'a> CatalogueWalker<'a> {
    /// Creates a walker starting at the catalogue root listing page
    pub fn new(client: &'a Client, root: Url) -> Self {
        Self {
            client,
            next_page: Some(root),
            pending: VecDeque::new(),
            pages_visited: 0,
            failed: false,
        }
    }

    /// Number of listing pages fetched so far
    pub fn pages_visited(&self) -> usize {
        self.pages_visited
    }

    /// Returns the next book detail URL
    ///
    /// Yields `None` once the last listing page is exhausted. A fetch or parse
    /// failure on a listing page is yielded once, after which the walk is over.
    pub async fn next_url(&mut self) -> Option<Result<Url, ScraperError>> {
        loop {
            if let Some(url) = self.pending.pop_front() {
                return Some(Ok(url));
            }

            if self.failed {
                return None;
            }

            let page_url = self.next_page.take()?;
            if let Err(e) = self.load_page(&page_url).await {
                self.failed = true;
                return Some(Err(e));
            }
        }
    }

    async fn load_page(&mut self, page_url: &Url) -> Result<(), ScraperError> {
        let html = fetch_page(self.client, page_url).await?;
        let page = parse_listing(&html, page_url)?;

        self.pages_visited += 1;
        tracing::info!(
            "Catalogue page {}: found {} books",
            self.pages_visited,
            page.book_urls.len()
        );

        self.pending.extend(page.book_urls);
        self.next_page = page.next_page;
        Ok(())
    }
}
