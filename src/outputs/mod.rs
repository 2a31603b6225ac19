//! Filesystem outputs for matching posts.
//!
//! # Submodules
//!
//! - [`layout`]: resolves and creates the dated destination directory
//! - [`metadata`]: appends the post's row to the per-day `metadata.csv`
//!
//! # Output Structure
//!
//! ```text
//! output_root/
//! ├── logs/
//! │   └── 160526_scraper.log
//! └── 2019/
//!     └── 03/
//!         └── 05/
//!             ├── article.pdf
//!             └── metadata.csv
//! ```

pub mod layout;
pub mod metadata;

/// File name of the downloaded document inside a destination directory.
pub const DOCUMENT_FILE: &str = "article.pdf";
/// File name of the per-day metadata log.
pub const METADATA_FILE: &str = "metadata.csv";
