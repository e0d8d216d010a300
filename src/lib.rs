//! Waiting Period Extract Library
//!
//! Retrieves the provider's daily archive over SFTP, decodes the fixed-width
//! beneficiary and underwriting rule records of the flat file inside it, and
//! saves them as an Excel workbook, emailing the operator with the outcome.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
