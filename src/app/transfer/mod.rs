//! Remote file transfer
//!
//! The run opens one session to the provider's endpoint, lists the outbox,
//! picks the newest archive and downloads it into the working directory.
//! The session is closed on every path once it has been opened.
//!
//! The module is organized into:
//! - `sftp`: the SSH/SFTP implementation of [`Connector`]
//! - `select`: latest-archive selection

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::SftpSettings;
use crate::constants::remote;
use crate::errors::{TransferError, TransferResult};

pub mod select;
pub mod sftp;

pub use select::{is_candidate, select_latest};
pub use sftp::{SftpConnector, SftpSession};

/// A candidate archive in the remote directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// File name without directory
    pub name: String,
    /// Full remote path
    pub path: String,
    /// Modification time in seconds since the epoch (0 when unknown)
    pub modified: u64,
    /// Size in bytes, if the server reported it
    pub size: Option<u64>,
}

impl RemoteEntry {
    pub fn new(dir: &str, name: &str, modified: u64, size: Option<u64>) -> Self {
        Self {
            name: name.to_string(),
            path: format!("{}/{}", dir.trim_end_matches('/'), name),
            modified,
            size,
        }
    }

    /// Modification time rendered for logs
    pub fn modified_display(&self) -> String {
        chrono::DateTime::from_timestamp(self.modified as i64, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.modified.to_string())
    }
}

/// An open session on the remote endpoint
pub trait RemoteSession {
    /// List entries of `dir` whose names end with `suffix`
    fn list_candidates(&mut self, dir: &str, suffix: &str) -> TransferResult<Vec<RemoteEntry>>;

    /// Download `entry` into `dest_dir`, returning the local path
    fn download(&mut self, entry: &RemoteEntry, dest_dir: &Path) -> TransferResult<PathBuf>;

    /// Close the session; failures are logged, not returned
    fn close(self);
}

/// Opens sessions on the remote endpoint
pub trait Connector: Send + Sync + 'static {
    type Session: RemoteSession;

    fn connect(&self, settings: &SftpSettings) -> TransferResult<Self::Session>;
}

/// Result of the transfer step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The newest archive was downloaded
    Downloaded { archive: PathBuf, entry: RemoteEntry },
    /// The outbox held no candidate archive
    NoCandidates,
}

/// Connect, select the newest archive and download it
///
/// Blocks the calling thread for the whole exchange. The session is closed
/// before returning, whether the download succeeded or not.
///
/// # Errors
///
/// Returns `TransferError` if the connection, the listing or the download
/// fails.
pub fn fetch_latest<C: Connector>(
    connector: &C,
    settings: &SftpSettings,
    remote_dir: &str,
    dest_dir: &Path,
) -> TransferResult<FetchOutcome> {
    let mut session = connector.connect(settings)?;
    info!("Connected to SFTP successfully.");

    let outcome = download_newest(&mut session, remote_dir, dest_dir);
    session.close();
    debug!("SFTP session closed");

    outcome
}

fn download_newest<S: RemoteSession>(
    session: &mut S,
    remote_dir: &str,
    dest_dir: &Path,
) -> TransferResult<FetchOutcome> {
    let entries = session.list_candidates(remote_dir, remote::ARCHIVE_SUFFIX)?;
    debug!("Found {} candidate archives in {}", entries.len(), remote_dir);

    let Some(latest) = select_latest(&entries) else {
        info!("No zip files found in remote {} folder.", remote_dir);
        return Ok(FetchOutcome::NoCandidates);
    };
    info!(
        "Latest ZIP file detected: {} (modified {})",
        latest.name,
        latest.modified_display()
    );

    std::fs::create_dir_all(dest_dir)?;
    let archive = session.download(latest, dest_dir)?;
    info!("Downloaded ZIP to {}", archive.display());

    Ok(FetchOutcome::Downloaded {
        archive,
        entry: latest.clone(),
    })
}

/// Run [`fetch_latest`] on the blocking pool and wait for it
pub async fn fetch_latest_blocking<C: Connector>(
    connector: Arc<C>,
    settings: SftpSettings,
    remote_dir: String,
    dest_dir: PathBuf,
) -> TransferResult<FetchOutcome> {
    tokio::task::spawn_blocking(move || {
        fetch_latest(connector.as_ref(), &settings, &remote_dir, &dest_dir)
    })
    .await
    .map_err(|e| {
        warn!("Transfer task failed to complete: {}", e);
        TransferError::Worker {
            reason: e.to_string(),
        }
    })?
}
