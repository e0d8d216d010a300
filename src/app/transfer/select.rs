//! Latest-archive selection
//!
//! The remote outbox can hold several days of archives. The run processes
//! only the most recently modified one. When two candidates share the exact
//! same modification time the greater file name wins, so the choice never
//! depends on the order in which the server happens to list the directory.

use std::cmp::Ordering;

use super::RemoteEntry;

/// Whether a remote file name qualifies as a candidate archive
pub fn is_candidate(name: &str, suffix: &str) -> bool {
    name.ends_with(suffix)
}

/// Pick the entry with the greatest modification time
///
/// Returns `None` for an empty listing.
pub fn select_latest(entries: &[RemoteEntry]) -> Option<&RemoteEntry> {
    entries.iter().max_by(|a, b| newer(a, b))
}

fn newer(a: &RemoteEntry, b: &RemoteEntry) -> Ordering {
    a.modified
        .cmp(&b.modified)
        .then_with(|| a.name.cmp(&b.name))
}
