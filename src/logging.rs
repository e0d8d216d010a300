//! Logging initialisation
//!
//! Every run writes the same timestamped, levelled trace to standard output
//! and to a plain-text log file. The file writer is non-blocking; the
//! returned [`WorkerGuard`] must be held until the process is about to exit
//! so buffered lines are flushed.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging settings derived from the command line
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Log file; its parent directory is created if needed
    pub log_file: PathBuf,
    /// Default level for this crate when `RUST_LOG` does not override it
    pub level: &'static str,
}

impl LogSettings {
    fn split_path(&self) -> (PathBuf, String) {
        let dir = match self.log_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name = self
            .log_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::constants::files::DEFAULT_LOG_FILE.to_string());
        (dir, name)
    }
}

/// Install the global subscriber with console and file layers
///
/// # Errors
///
/// Returns an I/O error if the log directory cannot be created or a
/// subscriber is already installed.
pub fn init_logging(settings: &LogSettings) -> std::io::Result<WorkerGuard> {
    let (dir, name) = settings.split_path();
    std::fs::create_dir_all(&dir)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(settings.level)));

    // No rotation: one file that grows across runs
    let file_appender = tracing_appender::rolling::never(&dir, &name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(guard)
}

fn default_directive(level: &str) -> String {
    format!("warn,waiting_period_extract={}", level)
}

/// Resolve the log file location, defaulting to the working directory
pub fn log_file_or_default(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(crate::constants::files::DEFAULT_LOG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path_with_directory() {
        let settings = LogSettings {
            log_file: PathBuf::from("/var/log/waiting/run.log"),
            level: "info",
        };
        let (dir, name) = settings.split_path();
        assert_eq!(dir, PathBuf::from("/var/log/waiting"));
        assert_eq!(name, "run.log");
    }

    #[test]
    fn test_split_path_bare_file_name() {
        let settings = LogSettings {
            log_file: PathBuf::from("waiting_period_extract.log"),
            level: "info",
        };
        let (dir, name) = settings.split_path();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "waiting_period_extract.log");
    }

    #[test]
    fn test_default_directive_targets_crate() {
        assert_eq!(
            default_directive("debug"),
            "warn,waiting_period_extract=debug"
        );
    }

    #[test]
    fn test_log_file_default() {
        assert_eq!(
            log_file_or_default(None),
            PathBuf::from("waiting_period_extract.log")
        );
        assert_eq!(
            log_file_or_default(Some(Path::new("/tmp/x.log"))),
            PathBuf::from("/tmp/x.log")
        );
    }
}
