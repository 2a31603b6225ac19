//! Error taxonomy for the scraper.
//!
//! Every fallible component returns [`ScrapeError`]. Only the document
//! download path recovers locally (see [`crate::download`]); every other
//! variant propagates to `main` and ends the run.

use thiserror::Error;

/// Errors raised while scraping the listing and persisting its posts.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A CLI value (date, URL template) could not be interpreted.
    #[error("invalid configuration for {field}: {reason}")]
    Configuration { field: &'static str, reason: String },

    /// An HTTP request failed in a way that is not retried.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A connection-level failure while retrieving a document.
    #[error("transient download failure for {url}: {reason}")]
    TransientDownload { url: String, reason: String },

    /// The listing markup is missing an element the extractor relies on.
    #[error("unexpected listing markup: {0}")]
    MarkupShape(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Whether the download loop should try again after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::TransientDownload { .. })
    }

    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        ScrapeError::Configuration {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn markup(reason: impl Into<String>) -> Self {
        ScrapeError::MarkupShape(reason.into())
    }
}
