//! Configuration loading from disk.
//!
//! Resolution order:
//! 1. Parse the primary document
//! 2. Reduce each `[server.*]` against the primary `[common]`
//! 3. Apply includes in ascending include-name order; their servers
//!    replace same-named entries (last applied wins)
//! 4. Validate; any failure aborts the load

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::include::{expand_home, resolve_include};
use super::profile::ScopeDocument;
use super::reduce::reduce;
use super::registry::{ConfigOrigin, ConfigSource, ResolvedRegistry};
use super::validate::validate;

/// Default primary config location, before `~` expansion
pub const DEFAULT_CONFIG_PATH: &str = "~/.hostbook.toml";

/// Why a document could not be loaded; callers map this onto the
/// [`ConfigError`] variant that fits their context.
#[derive(Debug)]
pub(crate) enum LoadFailure {
    Io(io::Error),
    Toml(toml::de::Error),
}

/// Get the default config file path (`~/.hostbook.toml`)
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    expand_home(DEFAULT_CONFIG_PATH)
}

/// Load, resolve and validate the configuration rooted at `path`.
pub fn load_config(path: &Path) -> Result<ResolvedRegistry, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let (document, bytes) = load_toml_file(path).map_err(|failure| match failure {
        LoadFailure::Io(source) => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
        LoadFailure::Toml(source) => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
    })?;

    tracing::debug!(
        path = %path.display(),
        servers = document.servers.len(),
        includes = document.include.len(),
        "Primary config parsed"
    );

    let mut registry = ResolvedRegistry::new(document.log.clone());
    let primary = registry.add_source(ConfigSource::new(
        ConfigOrigin::Primary,
        None,
        path.to_path_buf(),
        &bytes,
    ));

    for (name, profile) in &document.servers {
        registry.insert(name.clone(), reduce(&document.common, profile), primary);
    }

    for (include_name, reference) in &document.include {
        let included = resolve_include(include_name, reference, &document.common)?;
        let source = registry.add_source(included.source);

        for (name, profile) in included.servers {
            if let Some(previous) = registry.insert(name.clone(), profile, source) {
                let replaced = &registry.sources()[previous];
                tracing::warn!(
                    server = %name,
                    include = %include_name,
                    replaced = %replaced.path.display(),
                    "Server redefined by include; the include's definition wins"
                );
            }
        }
    }

    let failures = validate(&registry);
    if !failures.is_empty() {
        return Err(ConfigError::Invalid(failures));
    }

    tracing::info!(
        servers = registry.len(),
        sources = registry.sources().len(),
        "Configuration loaded"
    );

    Ok(registry)
}

/// Read and parse a TOML document, returning it with the raw bytes
/// (kept for the source digest).
pub(crate) fn load_toml_file(path: &Path) -> Result<(ScopeDocument, Vec<u8>), LoadFailure> {
    let bytes = fs::read(path).map_err(LoadFailure::Io)?;

    // A readable file that is not UTF-8 is malformed, not missing
    let contents = std::str::from_utf8(&bytes).map_err(|e| {
        LoadFailure::Toml(<toml::de::Error as serde::de::Error>::custom(format!(
            "invalid UTF-8: {}",
            e
        )))
    })?;

    let document = ScopeDocument::parse(contents).map_err(LoadFailure::Toml)?;
    Ok((document, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, "{}", content).unwrap();
        temp
    }

    #[test]
    fn test_common_reduction() {
        let temp = write_config(
            r#"
            [common]
            port = "22"

            [server.host1]
            addr = "host1"
            "#,
        );

        let registry = load_config(temp.path()).unwrap();
        let host1 = registry.get("host1").unwrap();
        assert_eq!(host1.addr, "host1");
        assert_eq!(host1.port, "22");
        assert_eq!(host1.user, "");
        assert_eq!(host1.key, "");
    }

    #[test]
    fn test_not_found() {
        let err = load_config(Path::new("/nonexistent/hostbook.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_parse_error() {
        let temp = write_config("[server.a\naddr = 1");
        let err = load_config(temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let err = load_config(temp.path()).unwrap_err();
        match err {
            ConfigError::Parse { source, .. } => assert!(source.to_string().contains("UTF-8")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validation_failure_aborts() {
        let temp = write_config(
            r#"
            [server.good]
            addr = "10.0.0.1"

            [server.bad]
            user = "root"
            "#,
        );

        let err = load_config(temp.path()).unwrap_err();
        assert_eq!(err.invalid_names(), vec!["bad"]);
    }

    #[test]
    fn test_log_settings_kept() {
        let temp = write_config(
            r#"
            [log]
            enable = true
            dirpath = "/var/log/hostbook"
            "#,
        );

        let registry = load_config(temp.path()).unwrap();
        assert!(registry.log().enable);
        assert_eq!(registry.log().dir, "/var/log/hostbook");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_primary_source_recorded() {
        let temp = write_config("[server.a]\naddr = \"a\"\n");
        let registry = load_config(temp.path()).unwrap();

        assert_eq!(registry.sources().len(), 1);
        let source = registry.origin_of("a").unwrap();
        assert_eq!(source.origin, ConfigOrigin::Primary);
        assert_eq!(source.path, temp.path());
    }
}
