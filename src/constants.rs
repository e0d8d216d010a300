//! Application constants for the waiting period extract
//!
//! This module centralizes all fixed names and values used throughout the
//! application, organized by functional domain.

/// Environment variable names for email credentials
pub mod env {
    /// Sender address, also used as the SMTP login
    pub const SMTP_USER: &str = "SMTP_USER";

    /// Single recipient of every notification
    pub const SMTP_RECEIVER: &str = "SMTP_RECEIVER";

    /// SMTP relay host name
    pub const SMTP_SERVER: &str = "SMTP_SERVER";

    /// SMTP login password
    pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
}

/// Remote file transfer endpoint constants
pub mod remote {
    /// Directory on the provider's server that holds the daily archives
    pub const OUTBOX_DIR: &str = "/outbox";

    /// Suffix of candidate archives in the outbox (matched case-sensitively)
    pub const ARCHIVE_SUFFIX: &str = ".zip";

    /// Port used when the settings file does not name one
    pub const DEFAULT_SFTP_PORT: u16 = 22;
}

/// Local file layout constants
pub mod files {
    /// Default settings file, relative to the current directory
    pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

    /// Secrets file looked up next to the settings file
    pub const ENV_FILE_NAME: &str = ".env";

    /// Working subdirectory created next to the settings file
    pub const WORK_DIR_NAME: &str = "extracts";

    /// Suffix of the flat-text report inside the archive (case-insensitive)
    pub const FLAT_FILE_SUFFIX: &str = ".txt";

    /// Name of the spreadsheet produced in the working directory
    pub const OUTPUT_WORKBOOK: &str = "Waiting_Period_Extract.xlsx";

    /// Default log file, relative to the current directory
    pub const DEFAULT_LOG_FILE: &str = "waiting_period_extract.log";
}

/// Spreadsheet sheet names, one per record shape
pub mod sheets {
    pub const BENEFICIARIES: &str = "beneficiaries_flatfile";
    pub const UNDERWRITING_RULES: &str = "underwriting_rules_flatfile";
}

/// Email notification constants
pub mod email {
    /// Submission port; the connection is upgraded with STARTTLS
    pub const SMTP_PORT: u16 = 587;

    /// Prefix shared by the subject line and both message bodies
    pub const HEADER: &str = "Waiting Period";
}
