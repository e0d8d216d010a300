//! Archive extraction
//!
//! Expands the downloaded zip into the working directory and locates the
//! flat-text report inside it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::errors::ArchiveResult;

/// Expand every entry of `archive_path` into `dest_dir`
///
/// Entries are processed in archive order and their names are returned in
/// that order. Entries whose names would land outside `dest_dir` are skipped
/// and left out of the result.
///
/// # Errors
///
/// Returns `ArchiveError` if the file is not a valid zip or an entry cannot
/// be written.
pub fn extract(archive_path: &Path, dest_dir: &Path) -> ArchiveResult<Vec<String>> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;
    fs::create_dir_all(dest_dir)?;

    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping unsafe archive entry: {}", entry.name());
            continue;
        };
        let out_path = dest_dir.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&out_path)?;
            let bytes = io::copy(&mut entry, &mut out)?;
            debug!("Extracted {} ({} bytes)", out_path.display(), bytes);
        }
        names.push(entry.name().to_string());
    }

    info!(
        "Extracted {} entries from {}",
        names.len(),
        archive_path.display()
    );
    Ok(names)
}

/// First entry name ending with `suffix`, compared case-insensitively
pub fn find_flat_file<'a>(names: &'a [String], suffix: &str) -> Option<&'a str> {
    let suffix = suffix.to_lowercase();
    names
        .iter()
        .map(String::as_str)
        .find(|name| name.to_lowercase().ends_with(&suffix))
}

/// Extract the archive and return the path of the embedded flat file
///
/// Returns `Ok(None)` when the archive holds no matching entry.
pub fn extract_flat_file(
    archive_path: &Path,
    dest_dir: &Path,
    suffix: &str,
) -> ArchiveResult<Option<PathBuf>> {
    let names = extract(archive_path, dest_dir)?;
    let flat_file = find_flat_file(&names, suffix).map(|name| dest_dir.join(name));

    match &flat_file {
        Some(path) => info!("Flat file extracted: {}", path.display()),
        None => info!("No flat file ({}) found inside the ZIP.", suffix),
    }
    Ok(flat_file)
}
