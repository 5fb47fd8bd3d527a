//! JSON output for scraped reviews.
//!
//! All records from every source go into one pretty-printed UTF-8 JSON
//! array (two-space indentation, non-ASCII left unescaped).

use crate::models::ReviewRecord;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `reviews` to `path`, replacing any existing file.
///
/// Missing parent directories are created first.
///
/// # Arguments
///
/// * `reviews` - Records to serialize, in order
/// * `path` - Destination file
///
/// # Returns
///
/// `Ok(())` once the file is written.
///
/// # Errors
///
/// Returns an error if:
/// - Serialization fails
/// - The parent directory cannot be created
/// - The file cannot be written
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = reviews.len()))]
pub async fn write_reviews(reviews: &[ReviewRecord], path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(reviews)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create output dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(count = reviews.len(), path = %path.display(), "Wrote reviews");
    Ok(())
}
