//! Error types for the waiting period extract
//!
//! One error enum per pipeline component, plus a top-level [`AppError`] that
//! can carry any of them. Display strings include the underlying cause because
//! they end up verbatim in the operator's failure email.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file not found
    #[error("Config file not found at {path}")]
    NotFound { path: PathBuf },

    /// Settings file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid settings format or missing required key
    #[error("Invalid configuration format (expected TOML with quoted string values): {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Required configuration field present but empty
    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    /// Required environment variable not set
    #[error("Missing environment variable {var}. Set it in the environment or the .env file")]
    MissingEnv { var: String },

    /// Environment variable does not hold a usable email address
    #[error("Invalid email address in {var}: {value}")]
    InvalidAddress { var: String, value: String },
}

/// Remote file transfer errors
#[derive(Error, Debug)]
pub enum TransferError {
    /// TCP connection could not be established
    #[error("SFTP Connection failed: could not reach {address}: {source}")]
    Unreachable {
        address: String,
        source: std::io::Error,
    },

    /// SSH protocol negotiation failed
    #[error("SFTP Connection failed: SSH handshake failed: {reason}")]
    Handshake { reason: String },

    /// Server rejected the credentials
    #[error("SFTP Connection failed: authentication failed for user {username}: {reason}")]
    Authentication { username: String, reason: String },

    /// Remote directory could not be listed
    #[error("Failed to list remote directory {dir}: {reason}")]
    Listing { dir: String, reason: String },

    /// Download of the selected archive failed
    #[error("Failed to download ZIP {file}: {reason}")]
    Download { file: String, reason: String },

    /// Local I/O error while storing the download
    #[error("Local file error during transfer: {0}")]
    Io(#[from] std::io::Error),

    /// Blocking transfer task did not complete
    #[error("Transfer task terminated unexpectedly: {reason}")]
    Worker { reason: String },
}

impl TransferError {
    /// Whether the failure happened before a session was established
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            TransferError::Unreachable { .. }
                | TransferError::Handshake { .. }
                | TransferError::Authentication { .. }
        )
    }
}

/// Archive extraction errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Archive is not a readable zip container
    #[error("Invalid ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error while expanding entries
    #[error("File I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat file parsing errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// Flat file could not be read
    #[error("Failed to read flat file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Spreadsheet writing errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Workbook construction or save failed
    #[error("Failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error around the output file
    #[error("File I/O error writing report: {0}")]
    Io(#[from] std::io::Error),
}

/// Temporary file cleanup errors
#[derive(Error, Debug)]
pub enum CleanupError {
    /// One or more transient files could not be removed
    #[error("Cleanup warning: {}", .failures.join("; "))]
    Incomplete { failures: Vec<String> },
}

/// Email notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Sender or receiver address rejected
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message could not be composed
    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP session failed
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Transfer(e) if e.is_connection_error() => "connection",
            AppError::Transfer(_) => "transfer",
            AppError::Archive(_) => "archive",
            AppError::Parse(_) => "parse",
            AppError::Report(_) => "report",
            AppError::Cleanup(_) => "cleanup",
            AppError::Notify(_) => "notify",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Transfer result type alias
pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// Archive result type alias
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Parse result type alias
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Report result type alias
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Cleanup result type alias
pub type CleanupResult<T> = std::result::Result<T, CleanupError>;

/// Notification result type alias
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let auth = TransferError::Authentication {
            username: "svc".to_string(),
            reason: "Authentication failed".to_string(),
        };
        assert!(auth.is_connection_error());
        assert_eq!(AppError::from(auth).category(), "connection");

        let download = TransferError::Download {
            file: "extract.zip".to_string(),
            reason: "no such file".to_string(),
        };
        assert!(!download.is_connection_error());
        assert_eq!(AppError::from(download).category(), "transfer");
    }

    #[test]
    fn test_transparent_display() {
        let cleanup = AppError::from(CleanupError::Incomplete {
            failures: vec!["a.zip: denied".to_string()],
        });
        assert_eq!(cleanup.category(), "cleanup");
        assert_eq!(cleanup.to_string(), "Cleanup warning: a.zip: denied");

        let missing = AppError::from(ConfigError::MissingField {
            field: "sftp.host".to_string(),
        });
        assert_eq!(
            missing.to_string(),
            "Missing required configuration field: sftp.host"
        );
    }

    #[test]
    fn test_messages_carry_cause() {
        let err = TransferError::Authentication {
            username: "svc".to_string(),
            reason: "Authentication failed (username/password)".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("svc"));
        assert!(text.contains("Authentication failed (username/password)"));

        let cleanup = CleanupError::Incomplete {
            failures: vec!["a: x".to_string(), "b: y".to_string()],
        };
        assert_eq!(cleanup.to_string(), "Cleanup warning: a: x; b: y");
    }
}
