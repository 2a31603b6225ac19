//! Data models shared across the pipeline.
//!
//! - [`PostRecord`]: metadata extracted from one post on a listing page
//! - [`DownloadOutcome`]: what happened when the post's document was fetched
//! - [`ScrapeConfig`]: validated run configuration built from the CLI
//! - [`RunSummary`]: counters reported when the run completes

use crate::filter::DateRange;
use chrono::{Datelike, NaiveDate};
use std::path::PathBuf;

/// Metadata for a single post, as extracted from a listing page.
///
/// The document link fields are not part of the record itself; they are
/// carried by the [`DownloadOutcome`] and appended when the row is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    /// Zero-based position of the post on its page. This is the only key
    /// linking the post block to its excerpt block.
    pub position: usize,
    /// Heading text with the ticker suffix removed, trimmed.
    pub title: String,
    /// Parenthesized ticker suffix, e.g. `"(TSLA)"`, or empty.
    pub ticker: String,
    /// Date as rendered on the page: `"<day> <Mon> <year>"`.
    pub date_text: String,
    /// Parsed publication date.
    pub publication_date: NaiveDate,
}

impl PostRecord {
    /// Path components `YYYY`, `MM`, `DD` for this post's destination directory.
    pub fn date_components(&self) -> [String; 3] {
        let d = self.publication_date;
        [
            format!("{:04}", d.year()),
            format!("{:02}", d.month()),
            format!("{:02}", d.day()),
        ]
    }
}

/// Result of attempting to retrieve a post's linked document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The document was written to disk. `resolved_url` is the URL after redirects.
    Downloaded { href: String, resolved_url: String },
    /// The link is client-side only and was never requested.
    Skipped,
    /// Every attempt failed with a transient error.
    Failed { href: String },
}

impl DownloadOutcome {
    /// Trailing CSV fields for this outcome, in column order.
    ///
    /// A failed download keeps the source href but has no document link field.
    pub fn link_fields(&self) -> Vec<&str> {
        match self {
            DownloadOutcome::Downloaded { href, resolved_url } => {
                vec![href.as_str(), resolved_url.as_str()]
            }
            DownloadOutcome::Skipped => vec![""],
            DownloadOutcome::Failed { href } => vec![href.as_str()],
        }
    }
}

/// Validated configuration for a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Root of the `YYYY/MM/DD` tree; logs go to `<output_root>/logs`.
    pub output_root: PathBuf,
    /// Listing URL with a `{}` placeholder for the 1-based page number.
    pub listing_url: String,
    pub range: DateRange,
    /// Parse the whole trailing number of the pagination indicator instead
    /// of its last character.
    pub full_page_count: bool,
    pub verbose: bool,
}

/// Counters accumulated by the pipeline driver.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub posts_seen: usize,
    pub included: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::Skipped => self.skipped += 1,
            DownloadOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
