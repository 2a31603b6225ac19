//! Document download with bounded retry.
//!
//! # Architecture
//!
//! - [`FetchDocument`]: core trait, retrieve one URL into a file
//! - [`HttpFetcher`]: streams the response body to disk with `reqwest`
//! - [`RetryFetch`]: decorator that repeats transient failures
//! - [`download_document`]: applies the link policy and maps the result to a
//!   [`DownloadOutcome`]
//!
//! # Retry Strategy
//!
//! - 10 attempts in total
//! - 30 second timeout per attempt
//! - No delay between attempts
//! - Only connection-level failures are retried; anything else propagates

use crate::error::ScrapeError;
use crate::models::DownloadOutcome;
use crate::outputs::DOCUMENT_FILE;
use futures::StreamExt;
use reqwest::Client;
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

pub const MAX_ATTEMPTS: usize = 10;
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);
pub const CHUNK_SIZE: usize = 1024;

/// Links containing this marker run client-side and cannot be downloaded.
pub const SCRIPT_LINK_MARKER: &str = "javascript";

/// Trait for retrieving a document into a local file.
pub trait FetchDocument {
    /// Write the body at `url` to `dest`, replacing any existing file.
    ///
    /// Returns the final URL after redirects.
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<Url, ScrapeError>;
}

/// Streams documents over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self::with_timeout(client, ATTEMPT_TIMEOUT)
    }

    pub fn with_timeout(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

/// Sort a `reqwest` failure into retried and fatal errors.
fn classify(url: &Url, e: reqwest::Error) -> ScrapeError {
    if e.is_connect() || e.is_timeout() || e.is_request() || e.is_body() {
        ScrapeError::TransientDownload {
            url: url.to_string(),
            reason: e.to_string(),
        }
    } else {
        ScrapeError::Network {
            url: url.to_string(),
            source: e,
        }
    }
}

impl FetchDocument for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<Url, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Document request returned a non-success status; saving body anyway");
        }
        let resolved = response.url().clone();

        let mut file = File::create(dest).await?;
        let mut body = response.bytes_stream();
        let mut written = 0usize;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| classify(url, e))?;
            for piece in chunk.chunks(CHUNK_SIZE) {
                file.write_all(piece).await?;
                written += piece.len();
            }
        }
        file.flush().await?;

        debug!(bytes = written, dest = %dest.display(), "Wrote document body");
        Ok(resolved)
    }
}

/// Wrapper that repeats an inner [`FetchDocument`] on transient failures.
///
/// There is no backoff: a failed attempt is followed immediately by the next.
/// After `max_attempts` transient failures the last error is returned.
pub struct RetryFetch<T> {
    inner: T,
    max_attempts: usize,
}

impl<T: FetchDocument> RetryFetch<T> {
    pub fn new(inner: T, max_attempts: usize) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
        }
    }

    #[cfg(test)]
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl<T: FetchDocument> FetchDocument for RetryFetch<T> {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<Url, ScrapeError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            match self.inner.fetch(url, dest).await {
                Ok(resolved) => return Ok(resolved),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    info!(
                        attempt,
                        max = self.max_attempts,
                        error = %e,
                        "Connection error; retrying download"
                    );
                }
                Err(e) => {
                    if e.is_transient() {
                        error!(
                            attempt,
                            max = self.max_attempts,
                            elapsed_ms_total = total_t0.elapsed().as_millis(),
                            error = %e,
                            "Failed to download; retries exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

/// Download the document behind `href` into `dir`.
///
/// Script links are skipped without any request. A relative `href` is resolved
/// against `base`. Exhausting the retry budget yields
/// [`DownloadOutcome::Failed`] rather than an error.
///
/// # Arguments
///
/// * `fetcher` - Retrieval strategy, normally a [`RetryFetch`] over [`HttpFetcher`]
/// * `base` - URL of the listing page the link was found on
/// * `href` - Raw `href` attribute of the report link
/// * `dir` - Dated directory that receives [`DOCUMENT_FILE`]
///
/// # Returns
///
/// The [`DownloadOutcome`] whose link fields complete the post's metadata row.
///
/// # Errors
///
/// - [`ScrapeError::MarkupShape`] if `href` cannot be joined onto `base`
/// - [`ScrapeError::Network`] for non-transient request failures
/// - [`ScrapeError::Io`] if the document file cannot be written
#[instrument(level = "info", skip(fetcher, base, dir))]
pub async fn download_document<F: FetchDocument>(
    fetcher: &F,
    base: &Url,
    href: &str,
    dir: &Path,
) -> Result<DownloadOutcome, ScrapeError> {
    if href.contains(SCRIPT_LINK_MARKER) {
        info!("Script link; not downloadable, skipping");
        return Ok(DownloadOutcome::Skipped);
    }

    let url = base
        .join(href)
        .map_err(|e| ScrapeError::markup(format!("unusable document link '{href}': {e}")))?;
    let dest = dir.join(DOCUMENT_FILE);

    match fetcher.fetch(&url, &dest).await {
        Ok(resolved) => {
            info!(web_href = %href, redirect_href = %resolved, dest = %dest.display(), "Downloaded document");
            Ok(DownloadOutcome::Downloaded {
                href: href.to_string(),
                resolved_url: resolved.to_string(),
            })
        }
        Err(e) if e.is_transient() => Ok(DownloadOutcome::Failed {
            href: href.to_string(),
        }),
        Err(e) => Err(e),
    }
}
