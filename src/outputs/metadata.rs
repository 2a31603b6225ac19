//! Per-day CSV metadata sink.
//!
//! Rows are appended to `<dir>/metadata.csv` with every field quoted. There is
//! no header row and no deduplication: running twice over the same listing
//! appends the same rows twice.

use crate::error::ScrapeError;
use crate::models::{DownloadOutcome, PostRecord};
use crate::outputs::METADATA_FILE;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Fields of one metadata row, in column order.
///
/// Columns: title, ticker, date, source href, resolved document URL. The
/// trailing link fields depend on the download outcome, so a row has 4 or 5
/// fields.
pub fn row_fields<'a>(post: &'a PostRecord, outcome: &'a DownloadOutcome) -> Vec<&'a str> {
    let mut fields = vec![post.title.as_str(), post.ticker.as_str(), post.date_text.as_str()];
    fields.extend(outcome.link_fields());
    fields
}

fn encode_row(fields: &[&str]) -> Result<Vec<u8>, ScrapeError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(vec![]);
    wtr.write_record(fields)?;
    wtr.into_inner()
        .map_err(|e| ScrapeError::Io(std::io::Error::other(e.to_string())))
}

/// Append one row for `post` to the `metadata.csv` in `dir`.
///
/// The file is created on first use and never truncated, so a rerun adds
/// duplicate rows.
///
/// # Arguments
///
/// * `dir` - Existing dated directory for the post
/// * `post` - Supplies title, ticker and date text
/// * `outcome` - Supplies the trailing link fields
///
/// # Returns
///
/// Path of the metadata file written to.
///
/// # Errors
///
/// - [`ScrapeError::Csv`] if the row cannot be encoded
/// - [`ScrapeError::Io`] if the file cannot be opened or written
#[instrument(level = "debug", skip_all, fields(dir = %dir.display(), position = post.position))]
pub async fn append_row(
    dir: &Path,
    post: &PostRecord,
    outcome: &DownloadOutcome,
) -> Result<PathBuf, ScrapeError> {
    let path = dir.join(METADATA_FILE);
    let fields = row_fields(post, outcome);
    let bytes = encode_row(&fields)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await?;
    file.write_all(&bytes).await?;
    file.flush().await?;

    debug!(path = %path.display(), row = ?fields, "Added row to metadata file");
    Ok(path)
}
