//! Configuration errors

use std::fmt;
use std::path::PathBuf;

/// A target that failed validation, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTarget {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for InvalidTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server '{}': {}", self.name, self.reason)
    }
}

/// Errors from loading, including, importing or validating configuration.
///
/// All of them abort the load; no partial registry is produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Include '{name}' could not be read ({}): {source}", .path.display())]
    IncludeNotFound {
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Include '{name}' could not be parsed ({}): {source}", .path.display())]
    IncludeParse {
        name: String,
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read OpenSSH config {}: {source}", .path.display())]
    ForeignRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse OpenSSH config {}: {source}", .path.display())]
    ForeignParse {
        path: PathBuf,
        source: hostbook_sshconf::ParseError,
    },

    #[error("Invalid configuration: {}", join_invalid(.0))]
    Invalid(Vec<InvalidTarget>),

    #[error("Cannot expand '{0}': HOME environment variable not set")]
    HomeDirUnavailable(String),
}

impl ConfigError {
    /// Names of the targets that failed validation, sorted and de-duplicated.
    ///
    /// Empty for every variant other than [`ConfigError::Invalid`].
    pub fn invalid_names(&self) -> Vec<&str> {
        match self {
            ConfigError::Invalid(failures) => invalid_names(failures),
            _ => Vec::new(),
        }
    }
}

/// Distinct target names in a failure list, sorted.
pub fn invalid_names(failures: &[InvalidTarget]) -> Vec<&str> {
    let mut names: Vec<&str> = failures.iter().map(|f| f.name.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    names
}

fn join_invalid(failures: &[InvalidTarget]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
