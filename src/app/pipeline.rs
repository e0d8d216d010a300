//! Run orchestration
//!
//! Drives one run through transfer, extraction, parsing, report writing and
//! cleanup, strictly in that order. Each stage boundary decides what a
//! failure means: fatal failures are logged, reported to the operator and
//! end the run; benign "nothing to do" conditions end it quietly.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::archive::extract_flat_file;
use crate::app::cleanup::{cleanup, remove_quietly};
use crate::app::notify::{notify_failure, notify_success, Notifier};
use crate::app::records::parse_file;
use crate::app::report::{write_report, ReportSummary};
use crate::app::transfer::{fetch_latest_blocking, Connector, FetchOutcome};
use crate::config::AppConfig;
use crate::constants::files;
use crate::errors::AppError;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Report produced and success notice sent
    Completed,
    /// No archive in the outbox, or no flat file in the archive
    NothingToDo,
    /// A fatal error was reported to the operator
    Failed,
}

impl RunOutcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed | RunOutcome::NothingToDo => 0,
            RunOutcome::Failed => 1,
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::NothingToDo => write!(f, "nothing to do"),
            RunOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// Behaviour switches for a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Leave the downloaded archive and flat file in place
    pub keep_files: bool,
}

/// One configured extract run
pub struct Pipeline<C: Connector, N: Notifier> {
    config: AppConfig,
    connector: Arc<C>,
    notifier: N,
    options: RunOptions,
}

impl<C: Connector, N: Notifier> Pipeline<C, N> {
    pub fn new(config: AppConfig, connector: C, notifier: N) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
            notifier,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Execute the run to a terminal outcome
    pub async fn run(&self) -> RunOutcome {
        let work_dir = &self.config.work_dir;

        let fetched = fetch_latest_blocking(
            Arc::clone(&self.connector),
            self.config.sftp.clone(),
            self.config.remote_dir.clone(),
            work_dir.clone(),
        )
        .await;
        let archive = match fetched {
            Ok(FetchOutcome::Downloaded { archive, .. }) => archive,
            Ok(FetchOutcome::NoCandidates) => return RunOutcome::NothingToDo,
            Err(e) => return self.fail(e.into(), &[]).await,
        };

        let flat_file = match extract_flat_file(&archive, work_dir, files::FLAT_FILE_SUFFIX) {
            Ok(Some(path)) => path,
            Ok(None) => {
                remove_quietly(&archive).await;
                return RunOutcome::NothingToDo;
            }
            Err(e) => return self.fail(e.into(), &[&archive]).await,
        };

        let parsed = match parse_file(&flat_file).await {
            Ok(parsed) => parsed,
            Err(e) => return self.fail(e.into(), &[&archive, &flat_file]).await,
        };

        let out_path = self.config.output_path();
        let summary =
            match write_report(&parsed.beneficiaries, &parsed.underwriting_rules, &out_path) {
                Ok(summary) => summary,
                Err(e) => return self.fail(e.into(), &[&archive, &flat_file]).await,
            };

        self.finish(&archive, &flat_file, &summary).await;
        RunOutcome::Completed
    }

    /// Clean up, then report success
    ///
    /// A cleanup failure is reported on its own and the success notice still
    /// follows, so the operator receives both.
    async fn finish(&self, archive: &Path, flat_file: &Path, summary: &ReportSummary) {
        if self.options.keep_files {
            info!(
                "Keeping {} and {}",
                archive.display(),
                flat_file.display()
            );
        } else if let Err(e) = cleanup(archive, flat_file).await {
            let err = AppError::from(e);
            warn!(category = err.category(), "{}", err);
            notify_failure(&self.notifier, err.to_string()).await;
        }

        info!("Process completed successfully: {}", summary);
        notify_success(&self.notifier).await;
    }

    async fn fail(&self, err: AppError, transient: &[&PathBuf]) -> RunOutcome {
        error!(category = err.category(), "{}", err);
        notify_failure(&self.notifier, err.to_string()).await;

        if !self.options.keep_files {
            for path in transient {
                remove_quietly(path).await;
            }
        }
        RunOutcome::Failed
    }
}
