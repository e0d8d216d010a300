//! Command-line argument parsing for the waiting period extract
//!
//! The tool performs a single run per invocation; every option has a
//! default so a scheduler can call it with no arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::constants::files;

/// Waiting period extract - daily SFTP pickup of the provider flat file
#[derive(Parser, Debug)]
#[command(
    name = "waiting_period_extract",
    version,
    about = "Fetch the latest waiting period extract and convert it to a workbook",
    long_about = "Downloads the newest archive from the provider's SFTP outbox, parses the fixed-width
beneficiary and underwriting rule records it contains, writes them to an Excel workbook and
emails the operator with the result."
)]
pub struct Cli {
    /// TOML settings file with the [sftp] section
    ///
    /// Replaces the older config.ini: keep the [sftp] keys but quote string
    /// values, e.g. host = "10.0.0.5". The port stays a bare number.
    #[arg(short, long, value_name = "FILE", default_value = files::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Secrets file with SMTP_* variables (default: .env next to the settings file)
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Log file, appended to on every run
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Leave the downloaded archive and extracted flat file in place
    #[arg(long)]
    pub keep_files: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
