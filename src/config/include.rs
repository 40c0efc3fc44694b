//! Include resolution
//!
//! An `[include.<name>]` entry names another document. Its `[common]` is
//! reduced against the including document's common, and its servers are
//! reduced against that combined scope before being merged into the
//! primary registry by the loader.
//!
//! Includes are followed one level deep: an included document's own
//! `[include]` table is ignored (with a warning), as is its `[log]`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::loader::{load_toml_file, LoadFailure};
use super::profile::{IncludeReference, Profile};
use super::reduce::reduce;
use super::registry::{ConfigOrigin, ConfigSource};

/// Servers contributed by one include, already reduced.
#[derive(Debug, Clone)]
pub struct ResolvedInclude {
    pub source: ConfigSource,
    pub servers: BTreeMap<String, Profile>,
}

/// Load the document behind `reference` and reduce its servers against
/// `common` (the including document's common scope).
pub fn resolve_include(
    name: &str,
    reference: &IncludeReference,
    common: &Profile,
) -> Result<ResolvedInclude, ConfigError> {
    let path = expand_home(&reference.path)?;

    let (included, bytes) = load_toml_file(&path).map_err(|failure| match failure {
        LoadFailure::Io(source) => ConfigError::IncludeNotFound {
            name: name.to_string(),
            path: path.clone(),
            source,
        },
        LoadFailure::Toml(source) => ConfigError::IncludeParse {
            name: name.to_string(),
            path: path.clone(),
            source,
        },
    })?;

    if !included.include.is_empty() {
        tracing::warn!(
            include = name,
            nested = ?included.include.keys().collect::<Vec<_>>(),
            "Nested includes are not followed"
        );
    }

    let sub_common = reduce(common, &included.common);
    let servers: BTreeMap<String, Profile> = included
        .servers
        .iter()
        .map(|(server, profile)| (server.clone(), reduce(&sub_common, profile)))
        .collect();

    tracing::debug!(
        include = name,
        path = %path.display(),
        servers = servers.len(),
        "Include resolved"
    );

    Ok(ResolvedInclude {
        source: ConfigSource::new(ConfigOrigin::Include, Some(name.to_string()), path, &bytes),
        servers,
    })
}

/// Replace a leading `~` with `$HOME`.
///
/// Only `~` and `~/...` are expanded; any other path is returned as-is.
pub fn expand_home(path: &str) -> Result<PathBuf, ConfigError> {
    if !has_home_prefix(path) {
        return Ok(PathBuf::from(path));
    }

    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ConfigError::HomeDirUnavailable(path.to_string()))?;
    Ok(expand_home_with(path, Path::new(&home)))
}

/// [`expand_home`] with an explicit home directory.
pub fn expand_home_with(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn has_home_prefix(path: &str) -> bool {
    path == "~" || path.starts_with("~/")
}
