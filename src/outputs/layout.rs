//! Dated destination directories: `<root>/<YYYY>/<MM>/<DD>`.

use crate::models::PostRecord;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Destination directory for a post, derived from its publication date.
pub fn destination_dir(root: &Path, post: &PostRecord) -> PathBuf {
    let [year, month, day] = post.date_components();
    root.join(year).join(month).join(day)
}

/// Create `dir` and any missing parents. Returns `true` if it did not exist.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub async fn ensure_dir(dir: &Path) -> std::io::Result<bool> {
    if fs::try_exists(dir).await? {
        debug!("Destination directory already exists");
        return Ok(false);
    }
    fs::create_dir_all(dir).await?;
    info!(dir = %dir.display(), "Folders created");
    Ok(true)
}
