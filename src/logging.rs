//! Structured logging setup.
//!
//! Events always go to stderr, filtered by `RUST_LOG` (default
//! `hostbook=info`). When the config's `[log]` section is enabled they are
//! also appended, without ANSI colors, to `<dirpath>/hostbook.log`.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{expand_home, ConfigError, LogConfig};

/// File name written inside the configured log directory
pub const LOG_FILE_NAME: &str = "hostbook.log";

const DEFAULT_FILTER: &str = "hostbook=info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Build a subscriber for `log`; `None` logs to stderr only.
pub fn subscriber(
    log: Option<&LogConfig>,
) -> Result<impl Subscriber + Send + Sync + 'static, LoggingError> {
    let file_layer = match log.filter(|l| l.enable) {
        Some(log) => {
            let path = log_file_path(log)?;
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|source| LoggingError::Open {
                    path: path.clone(),
                    source,
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| LoggingError::Open {
                    path: path.clone(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer))
}

/// Location of the log file for an enabled `[log]` section.
pub fn log_file_path(log: &LogConfig) -> Result<PathBuf, ConfigError> {
    let dir = if log.dir.is_empty() { "." } else { log.dir.as_str() };
    Ok(expand_home(dir)?.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_path() {
        let log = LogConfig {
            enable: true,
            dir: "/var/log/hostbook".to_string(),
        };
        assert_eq!(
            log_file_path(&log).unwrap(),
            PathBuf::from("/var/log/hostbook/hostbook.log")
        );

        let log = LogConfig {
            enable: true,
            dir: String::new(),
        };
        assert_eq!(log_file_path(&log).unwrap(), PathBuf::from("./hostbook.log"));
    }

    #[test]
    fn test_enabled_log_creates_file() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("nested/logs");
        let log = LogConfig {
            enable: true,
            dir: log_dir.to_string_lossy().to_string(),
        };

        let subscriber = subscriber(Some(&log)).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "hostbook", "written to file");
        });

        let content = fs::read_to_string(log_dir.join(LOG_FILE_NAME)).unwrap();
        assert!(content.contains("written to file"));
    }

    #[test]
    fn test_disabled_log_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let log = LogConfig {
            enable: false,
            dir: dir.path().join("logs").to_string_lossy().to_string(),
        };

        subscriber(Some(&log)).unwrap();
        assert!(!dir.path().join("logs").exists());
    }
}
