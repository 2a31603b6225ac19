//! Command-line interface definitions.
//!
//! Flags are parsed with `clap` and validated into a [`ScrapeConfig`] by
//! [`Cli::into_config`].

use crate::error::ScrapeError;
use crate::filter::{DEFAULT_FROM, DEFAULT_TO, DateRange};
use crate::models::ScrapeConfig;
use crate::scrapers::listing_page_url;
use crate::utils::executable_dir;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::error;

pub const DEFAULT_LISTING_URL: &str = "https://www.kerrisdalecap.com/blog/page/{}/";

/// Command-line arguments for the scraper.
///
/// # Examples
///
/// ```sh
/// # Everything, into ./download next to the binary
/// kerrisdale_scraper
///
/// # Posts strictly between two dates, verbose logging
/// kerrisdale_scraper -o /data/reports -f 01/01/2019 -t 12/31/2019 -v
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output folder; relative paths are resolved against the executable's directory
    #[arg(short, long, default_value = "download")]
    pub output: String,

    /// Only posts published after this date (MM/DD/YYYY)
    #[arg(short, long, default_value = DEFAULT_FROM)]
    pub from: String,

    /// Only posts published before this date (MM/DD/YYYY)
    #[arg(short, long, default_value = DEFAULT_TO)]
    pub to: String,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Listing URL template; `{}` is replaced by the page number
    #[arg(long, env = "SCRAPER_LISTING_URL", default_value = DEFAULT_LISTING_URL)]
    pub listing_url: String,

    /// Read the whole page count from the pagination indicator instead of its last digit
    #[arg(long)]
    pub full_page_count: bool,
}

impl Cli {
    /// Output root, resolved next to the executable.
    ///
    /// Independent of the other flags, so logging can be installed before
    /// they are validated.
    pub fn output_root(&self) -> PathBuf {
        self.output_root_in(&executable_dir())
    }

    /// Output root with a relative `--output` resolved against `base`.
    pub fn output_root_in(&self, base: &Path) -> PathBuf {
        base.join(&self.output)
    }

    /// Validate the arguments, resolving the output folder next to the executable.
    pub fn into_config(self) -> Result<ScrapeConfig, ScrapeError> {
        let base = executable_dir();
        self.into_config_in(&base)
    }

    /// Validate the arguments, resolving a relative output folder against `base`.
    ///
    /// A rejected value is logged at error level before it is returned.
    pub fn into_config_in(self, base: &Path) -> Result<ScrapeConfig, ScrapeError> {
        self.validate(base)
            .inspect_err(|e| error!(error = %e, "Invalid configuration; aborting"))
    }

    fn validate(self, base: &Path) -> Result<ScrapeConfig, ScrapeError> {
        let range = DateRange::parse(&self.from, &self.to)?;

        if !self.listing_url.contains("{}") {
            return Err(ScrapeError::config(
                "listing-url",
                format!("'{}' has no {{}} page placeholder", self.listing_url),
            ));
        }
        listing_page_url(&self.listing_url, 1)?;

        Ok(ScrapeConfig {
            output_root: self.output_root_in(base),
            listing_url: self.listing_url,
            range,
            full_page_count: self.full_page_count,
            verbose: self.verbose,
        })
    }
}
