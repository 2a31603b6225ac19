//! Listing page fetcher and pagination discovery.

use crate::error::ScrapeError;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static PAGES_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.pages").unwrap());
static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*$").unwrap());

/// One fetched and parsed page of the blog index.
#[derive(Debug)]
pub struct ListingPage {
    /// Page URL, used as the base for relative document links.
    pub url: Url,
    pub(crate) document: Html,
}

impl ListingPage {
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(body),
        }
    }

    /// Total number of listing pages, read from the `span.pages` indicator.
    ///
    /// By default only the last character of the indicator is read, so
    /// "Page 1 of 12" yields 2. With `full_number` the whole trailing number
    /// is used instead.
    pub fn page_count(&self, full_number: bool) -> Result<usize, ScrapeError> {
        let indicator = self
            .document
            .select(&PAGES_SELECTOR)
            .next()
            .ok_or_else(|| ScrapeError::markup("no span.pages pagination indicator"))?;
        let text = indicator.text().collect::<String>();
        let text = text.trim();
        debug!(indicator = %text, "Read pagination indicator");

        let trailing = TRAILING_NUMBER
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str());

        if full_number {
            return trailing
                .and_then(|digits| digits.parse::<usize>().ok())
                .ok_or_else(|| ScrapeError::markup(format!("no page number in indicator '{text}'")));
        }

        if let Some(digits) = trailing.filter(|d| d.len() > 1) {
            warn!(
                indicator = %text,
                digits,
                "Pagination indicator has a multi-digit page count; only the last digit is used (pass --full-page-count to read all of it)"
            );
        }
        text.chars()
            .last()
            .and_then(|c| c.to_digit(10))
            .map(|d| d as usize)
            .ok_or_else(|| {
                ScrapeError::markup(format!("pagination indicator '{text}' does not end in a digit"))
            })
    }
}

/// Substitute a 1-based page number into the listing URL template.
pub fn listing_page_url(template: &str, page: usize) -> Result<Url, ScrapeError> {
    let raw = template.replace("{}", &page.to_string());
    Url::parse(&raw).map_err(|e| ScrapeError::config("listing-url", format!("'{raw}': {e}")))
}

/// Fetch and parse one listing page. No retry: a failure here ends the run.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `template` - Listing URL with a `{}` page placeholder
/// * `page` - 1-based page number
///
/// # Returns
///
/// The parsed [`ListingPage`], keyed by the URL that was requested.
///
/// # Errors
///
/// - [`ScrapeError::Configuration`] if the substituted URL does not parse
/// - [`ScrapeError::Network`] on a connection failure or a non-2xx status
#[instrument(level = "info", skip(client, template))]
pub async fn fetch_listing_page(
    client: &Client,
    template: &str,
    page: usize,
) -> Result<ListingPage, ScrapeError> {
    let url = listing_page_url(template, page)?;
    info!(%url, "Fetching listing page");

    let network = |source: reqwest::Error| ScrapeError::Network {
        url: url.to_string(),
        source,
    };
    let body = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(network)?
        .text()
        .await
        .map_err(network)?;

    info!(bytes = body.len(), "Fetched listing page");
    Ok(ListingPage::parse(url, &body))
}
