//! Date range filtering for listing posts.
//!
//! The range is open at both ends: a post published exactly on `from` or
//! exactly on `to` is excluded.

use crate::error::ScrapeError;
use chrono::NaiveDate;
use tracing::debug;

/// Format accepted for `--from` / `--to`.
pub const CLI_DATE_FORMAT: &str = "%m/%d/%Y";
/// Format of the date assembled from a post's day, month and year elements.
pub const POST_DATE_FORMAT: &str = "%d %b %Y";

pub const DEFAULT_FROM: &str = "05/20/2000";
pub const DEFAULT_TO: &str = "05/20/2100";

/// Exclusive date range used as the sole inclusion filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Build a range from two `MM/DD/YYYY` strings.
    pub fn parse(from: &str, to: &str) -> Result<Self, ScrapeError> {
        Ok(Self {
            from: parse_cli_date("from", from)?,
            to: parse_cli_date("to", to)?,
        })
    }

    /// `true` iff `from < date < to`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let inside = self.from < date && date < self.to;
        debug!(%date, from = %self.from, to = %self.to, inside, "Checked post date against range");
        inside
    }
}

impl Default for DateRange {
    fn default() -> Self {
        // Both constants are valid dates in CLI_DATE_FORMAT.
        Self {
            from: NaiveDate::from_ymd_opt(2000, 5, 20).unwrap_or(NaiveDate::MIN),
            to: NaiveDate::from_ymd_opt(2100, 5, 20).unwrap_or(NaiveDate::MAX),
        }
    }
}

fn parse_cli_date(field: &'static str, value: &str) -> Result<NaiveDate, ScrapeError> {
    NaiveDate::parse_from_str(value.trim(), CLI_DATE_FORMAT)
        .map_err(|e| ScrapeError::config(field, format!("expected MM/DD/YYYY, got '{value}' ({e})")))
}

/// Parse a post date assembled as `"<day> <Mon> <year>"`.
pub fn parse_post_date(text: &str) -> Result<NaiveDate, ScrapeError> {
    NaiveDate::parse_from_str(text, POST_DATE_FORMAT)
        .map_err(|e| ScrapeError::markup(format!("unparsable post date '{text}': {e}")))
}
