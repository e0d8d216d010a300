//! Configuration management for the waiting period extract
//!
//! Connection settings come from a TOML settings file with an `[sftp]`
//! section; email credentials come from the environment, optionally seeded
//! from a `.env` file next to the settings file. Everything is resolved once
//! at startup into an immutable [`AppConfig`] that is passed to the pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use lettre::Address;
use serde::Deserialize;
use tracing::{debug, info};

use crate::constants::{env as env_constants, files, remote};
use crate::errors::{ConfigError, ConfigResult};

/// Fully resolved run configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Remote endpoint connection settings
    pub sftp: SftpSettings,
    /// Email transport settings
    pub email: EmailSettings,
    /// Remote directory holding the daily archives
    pub remote_dir: String,
    /// Local directory where downloads and outputs are staged
    pub work_dir: PathBuf,
}

/// Connection descriptor for the remote file-transfer endpoint
#[derive(Clone, Deserialize)]
pub struct SftpSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
}

fn default_port() -> u16 {
    remote::DEFAULT_SFTP_PORT
}

impl fmt::Debug for SftpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SftpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// On-disk layout of the settings file
#[derive(Debug, Deserialize)]
struct SettingsFile {
    sftp: SftpSettings,
}

/// Email transport credentials and addressing
#[derive(Clone)]
pub struct EmailSettings {
    /// Sender address, also the SMTP login
    pub sender: String,
    /// Single notification recipient
    pub receiver: String,
    /// SMTP relay host
    pub server: String,
    pub password: String,
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("server", &self.server)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl EmailSettings {
    /// Read email settings from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read email settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| -> ConfigResult<String> {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| ConfigError::MissingEnv {
                    var: var.to_string(),
                })
        };

        let settings = Self {
            sender: require(env_constants::SMTP_USER)?,
            receiver: require(env_constants::SMTP_RECEIVER)?,
            server: require(env_constants::SMTP_SERVER)?,
            password: require(env_constants::SMTP_PASSWORD)?,
        };

        for (var, value) in [
            (env_constants::SMTP_USER, &settings.sender),
            (env_constants::SMTP_RECEIVER, &settings.receiver),
        ] {
            if value.parse::<Address>().is_err() {
                return Err(ConfigError::InvalidAddress {
                    var: var.to_string(),
                    value: value.clone(),
                });
            }
        }

        Ok(settings)
    }
}

impl SftpSettings {
    /// Parse connection settings from settings file content
    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let file: SettingsFile = toml::from_str(content)?;
        let settings = file.sftp;

        if settings.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "sftp.host".to_string(),
            });
        }
        if settings.username.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "sftp.username".to_string(),
            });
        }

        Ok(settings)
    }

    /// Host and port in `host:port` form for logging and dialing
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load the complete configuration
    ///
    /// Seeds the environment from `env_file` (or `.env` next to the settings
    /// file) when present, then reads the settings file and the email
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the settings file is missing or malformed, or
    /// if any email variable is missing.
    pub async fn load(config_path: &Path, env_file: Option<&Path>) -> ConfigResult<Self> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound {
                path: config_path.to_path_buf(),
            });
        }

        let env_path = env_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config_dir(config_path).join(files::ENV_FILE_NAME));
        load_env_file(&env_path);

        let content =
            tokio::fs::read_to_string(config_path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source,
                })?;
        let sftp = SftpSettings::from_toml(&content)?;
        let email = EmailSettings::from_env()?;

        let config = Self {
            sftp,
            email,
            remote_dir: remote::OUTBOX_DIR.to_string(),
            work_dir: work_dir_for(config_path),
        };

        info!("Loaded configuration from: {}", config_path.display());
        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Path of the spreadsheet produced by a run
    pub fn output_path(&self) -> PathBuf {
        self.work_dir.join(files::OUTPUT_WORKBOOK)
    }
}

/// Working directory derived from the settings file location
pub fn work_dir_for(config_path: &Path) -> PathBuf {
    config_dir(config_path).join(files::WORK_DIR_NAME)
}

fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Seed the process environment from a dotenv file, if one exists
fn load_env_file(path: &Path) {
    if !path.exists() {
        debug!("No secrets file at {}", path.display());
        return;
    }
    match dotenv::from_path(path) {
        Ok(()) => debug!("Loaded secrets from {}", path.display()),
        Err(e) => debug!("Ignoring unreadable secrets file {}: {}", path.display(), e),
    }
}
