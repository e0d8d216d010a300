//! Core application logic for the waiting period extract
//!
//! This module contains the pipeline stages: remote transfer, archive
//! extraction, record parsing, report writing, cleanup and notification,
//! plus the orchestration that runs them in order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use waiting_period_extract::app::{Pipeline, SftpConnector, SmtpNotifier};
//! use waiting_period_extract::config::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(Path::new("config.toml"), None).await?;
//! let notifier = SmtpNotifier::new(config.email.clone());
//! let outcome = Pipeline::new(config, SftpConnector, notifier).run().await;
//! std::process::exit(outcome.exit_code().into());
//! # }
//! ```

pub mod archive;
pub mod cleanup;
pub mod notify;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod transfer;

// Re-export main public API
pub use notify::{Notice, Notifier, SmtpNotifier};
pub use pipeline::{Pipeline, RunOptions, RunOutcome};
pub use records::{BeneficiaryRecord, ParsedRecords, UnderwritingRuleRecord};
pub use report::{ReportSummary, SheetSummary};
pub use transfer::{Connector, FetchOutcome, RemoteEntry, RemoteSession, SftpConnector};
