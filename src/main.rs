//! # Kerrisdale Scraper
//!
//! Walks a paginated blog listing and downloads the research report linked
//! from every post published inside a date range. Each report is stored with
//! a per-day CSV row describing the post.
//!
//! ## Usage
//!
//! ```sh
//! kerrisdale_scraper -o ./download -f 01/01/2019 -t 12/31/2019 -v
//! ```
//!
//! ## Architecture
//!
//! A single sequential pass:
//! 1. **Paging**: fetch page 1 and read the total page count
//! 2. **Extraction**: pull title, ticker and date out of each post block
//! 3. **Filtering**: keep posts strictly between `--from` and `--to`
//! 4. **Download**: fetch the linked report, retrying dropped connections
//! 5. **Output**: append the post's row to `<root>/YYYY/MM/DD/metadata.csv`

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};

mod cli;
mod download;
mod error;
mod filter;
mod logging;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use logging::LogConfig;
use pipeline::Pipeline;
use utils::ensure_writable_dir;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    let cli_args = format!("{args:?}");
    let output_root = args.output_root();

    // Before validation, so rejected flags and an unwritable root are logged.
    let _log_guard = logging::init(&LogConfig::new(output_root.join("logs"), args.verbose))?;
    info!(args = %cli_args, "CLI args");

    if let Err(e) = ensure_writable_dir(&output_root).await {
        error!(error = %e, output_root = %output_root.display(), "Output folder is not writable");
        return Err(e.into());
    }
    let config = args.into_config()?;

    let start_time = std::time::Instant::now();
    info!(from = %config.range.from, to = %config.range.to, "Date range");
    debug!(output_root = %config.output_root.display(), listing_url = %config.listing_url, "Resolved configuration");

    let pipeline = Pipeline::new(config)?;
    match pipeline.run().await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                pages = summary.pages,
                posts_seen = summary.posts_seen,
                included = summary.included,
                downloaded = summary.downloaded,
                skipped = summary.skipped,
                failed = summary.failed,
                secs = elapsed.as_secs(),
                "Scrape complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Scrape aborted");
            Err(e.into())
        }
    }
}
