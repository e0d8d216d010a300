//! SSH/SFTP implementation of the transfer traits
//!
//! Uses password authentication over a plain TCP connection. No timeouts are
//! configured beyond what libssh2 and the OS apply by default.

use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use ssh2::{Session, Sftp};
use tracing::{debug, warn};

use super::{is_candidate, Connector, RemoteEntry, RemoteSession};
use crate::config::SftpSettings;
use crate::errors::{TransferError, TransferResult};

/// Opens authenticated SFTP sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct SftpConnector;

/// An authenticated SFTP channel and the SSH session carrying it
pub struct SftpSession {
    session: Session,
    sftp: Sftp,
}

impl Connector for SftpConnector {
    type Session = SftpSession;

    fn connect(&self, settings: &SftpSettings) -> TransferResult<SftpSession> {
        let address = settings.address();
        debug!("Connecting to {}", address);

        let tcp = TcpStream::connect((settings.host.as_str(), settings.port)).map_err(
            |source| TransferError::Unreachable {
                address: address.clone(),
                source,
            },
        )?;

        let mut session = Session::new().map_err(|e| TransferError::Handshake {
            reason: e.to_string(),
        })?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| TransferError::Handshake {
            reason: e.to_string(),
        })?;

        session
            .userauth_password(&settings.username, &settings.password)
            .map_err(|e| TransferError::Authentication {
                username: settings.username.clone(),
                reason: e.to_string(),
            })?;
        if !session.authenticated() {
            return Err(TransferError::Authentication {
                username: settings.username.clone(),
                reason: "server did not accept the credentials".to_string(),
            });
        }

        let sftp = session.sftp().map_err(|e| TransferError::Handshake {
            reason: format!("SFTP subsystem unavailable: {}", e),
        })?;

        Ok(SftpSession { session, sftp })
    }
}

impl RemoteSession for SftpSession {
    fn list_candidates(&mut self, dir: &str, suffix: &str) -> TransferResult<Vec<RemoteEntry>> {
        let listing = self
            .sftp
            .readdir(Path::new(dir))
            .map_err(|e| TransferError::Listing {
                dir: dir.to_string(),
                reason: e.to_string(),
            })?;

        let entries = listing
            .into_iter()
            .filter(|(_, stat)| !stat.is_dir())
            .filter_map(|(path, stat)| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                is_candidate(&name, suffix)
                    .then(|| RemoteEntry::new(dir, &name, stat.mtime.unwrap_or(0), stat.size))
            })
            .collect();

        Ok(entries)
    }

    fn download(&mut self, entry: &RemoteEntry, dest_dir: &Path) -> TransferResult<PathBuf> {
        let local_path = dest_dir.join(&entry.name);
        let download_error = |reason: String| TransferError::Download {
            file: entry.name.clone(),
            reason,
        };

        let mut remote = self
            .sftp
            .open(Path::new(&entry.path))
            .map_err(|e| download_error(e.to_string()))?;
        let mut local = File::create(&local_path)?;

        match io::copy(&mut remote, &mut local) {
            Ok(bytes) => {
                debug!("Copied {} bytes from {}", bytes, entry.path);
                Ok(local_path)
            }
            Err(e) => {
                drop(local);
                if let Err(remove_err) = std::fs::remove_file(&local_path) {
                    warn!(
                        "Could not remove partial download {}: {}",
                        local_path.display(),
                        remove_err
                    );
                }
                Err(download_error(e.to_string()))
            }
        }
    }

    fn close(self) {
        let SftpSession { session, sftp } = self;
        drop(sftp);
        if let Err(e) = session.disconnect(None, "extract complete", None) {
            warn!("SFTP session did not close cleanly: {}", e);
        }
    }
}
