//! Waiting period extract CLI application
//!
//! Runs the daily extract once and exits with 0 on success or when there is
//! nothing to process, 1 on any fatal error.

use std::process::ExitCode;

use tracing::{error, info};

use waiting_period_extract::app::{Pipeline, RunOptions, SftpConnector, SmtpNotifier};
use waiting_period_extract::cli::Cli;
use waiting_period_extract::config::AppConfig;
use waiting_period_extract::logging::{init_logging, log_file_or_default, LogSettings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse_args();

    let log_settings = LogSettings {
        log_file: log_file_or_default(cli.log_file.as_deref()),
        level: cli.log_level(),
    };
    // Held until return so buffered file output is flushed
    let _log_guard = match init_logging(&log_settings) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialise logging: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Waiting period extract v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    // Configuration errors end the run before any notification can be sent
    let config = match AppConfig::load(&cli.config, cli.env_file.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let notifier = SmtpNotifier::new(config.email.clone());
    let pipeline = Pipeline::new(config, SftpConnector, notifier).with_options(RunOptions {
        keep_files: cli.keep_files,
    });

    let outcome = pipeline.run().await;
    info!("Run finished: {}", outcome);
    ExitCode::from(outcome.exit_code())
}
