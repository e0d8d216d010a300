//! Removal of the run's transient files

use std::path::Path;

use tracing::{info, warn};

use crate::errors::{CleanupError, CleanupResult};

/// Delete the downloaded archive and the extracted flat file
///
/// Both removals are attempted even if the first fails.
///
/// # Errors
///
/// Returns `CleanupError::Incomplete` listing every file that could not be
/// removed.
pub async fn cleanup(archive_path: &Path, flat_file_path: &Path) -> CleanupResult<()> {
    let mut failures = Vec::new();

    for path in [archive_path, flat_file_path] {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Could not remove {}: {}", path.display(), e);
            failures.push(format!("{}: {}", path.display(), e));
        }
    }

    if failures.is_empty() {
        info!("Temporary files cleaned up.");
        Ok(())
    } else {
        Err(CleanupError::Incomplete { failures })
    }
}

/// Delete a single transient file, logging instead of failing
pub async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed {}", path.display()),
        Err(e) => warn!("Could not remove {}: {}", path.display(), e),
    }
}
