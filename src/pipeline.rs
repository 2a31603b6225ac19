//! Pipeline driver: pages → posts → filter → download → metadata row.
//!
//! Everything runs in sequence. Page N+1 is not fetched until every post on
//! page N has been written, and each post's download finishes before the
//! next post is looked at.

use crate::download::{FetchDocument, HttpFetcher, MAX_ATTEMPTS, RetryFetch, download_document};
use crate::error::ScrapeError;
use crate::models::{RunSummary, ScrapeConfig};
use crate::outputs::layout::{destination_dir, ensure_dir};
use crate::outputs::metadata::append_row;
use crate::scrapers::{ListingPage, fetch_listing_page};
use reqwest::Client;
use tracing::{debug, info, instrument};

/// Drives a single scrape run over the listing.
#[derive(Debug)]
pub struct Pipeline<F> {
    config: ScrapeConfig,
    client: Client,
    fetcher: F,
}

impl Pipeline<RetryFetch<HttpFetcher>> {
    /// Pipeline with the HTTP document fetcher and the standard retry budget.
    pub fn new(config: ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScrapeError::config("http-client", e.to_string()))?;
        let fetcher = RetryFetch::new(HttpFetcher::new(client.clone()), MAX_ATTEMPTS);
        Ok(Self::with_fetcher(config, client, fetcher))
    }
}

impl<F: FetchDocument> Pipeline<F> {
    pub fn with_fetcher(config: ScrapeConfig, client: Client, fetcher: F) -> Self {
        Self {
            config,
            client,
            fetcher,
        }
    }

    /// Walk every listing page once, in order.
    ///
    /// Page 1 is fetched to discover the page count and then reused as the
    /// first page processed.
    ///
    /// # Returns
    ///
    /// Counters for pages, posts seen, posts in range and download outcomes.
    ///
    /// # Errors
    ///
    /// Stops at the first fatal error:
    /// - [`ScrapeError::Network`] when a listing page cannot be fetched
    /// - [`ScrapeError::MarkupShape`] when a page's structure is unexpected
    /// - [`ScrapeError::Io`] or [`ScrapeError::Csv`] when output cannot be written
    ///
    /// A download that exhausts its retries is not an error; it is counted as failed.
    #[instrument(level = "info", skip_all, fields(listing_url = %self.config.listing_url))]
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let template = &self.config.listing_url;
        info!("Scraping page 1 for paging");
        let first = fetch_listing_page(&self.client, template, 1).await?;
        let page_count = first.page_count(self.config.full_page_count)?;
        info!(page_count, "Found pages");

        let mut summary = RunSummary::default();
        let mut first = Some(first);
        for page_no in 1..=page_count {
            let page = match first.take() {
                Some(page) => page,
                None => fetch_listing_page(&self.client, template, page_no).await?,
            };
            info!(page_no, url = %page.url, "Scraping page for data");
            self.process_page(&page, &mut summary).await?;
            summary.pages += 1;
        }

        Ok(summary)
    }

    async fn process_page(
        &self,
        page: &ListingPage,
        summary: &mut RunSummary,
    ) -> Result<(), ScrapeError> {
        for post in page.posts()? {
            let post = post?;
            summary.posts_seen += 1;

            if !self.config.range.contains(post.publication_date) {
                info!(title = %post.title, date = %post.date_text, "Not between start and end date; skipping");
                continue;
            }
            info!(title = %post.title, date = %post.date_text, "Between start and end date; processing");
            summary.included += 1;

            let dir = destination_dir(&self.config.output_root, &post);
            ensure_dir(&dir).await?;

            let href = page.document_href(post.position)?;
            let outcome = download_document(&self.fetcher, &page.url, &href, &dir).await?;
            debug!(?outcome, "Download finished");
            summary.record(&outcome);

            append_row(&dir, &post, &outcome).await?;
        }
        Ok(())
    }
}
