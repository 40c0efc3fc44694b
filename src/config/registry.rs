//! Resolved server registry with provenance
//!
//! The registry is the output of a load: every server name mapped to its
//! fully reduced profile, plus the documents that contributed to it.
//! It is only mutated by the loader; callers get read access.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::profile::{LogConfig, Profile};

/// Where a contributing document came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Primary,
    Include,
}

/// A contributing document with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// Include name (None for the primary document)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Path the document was read from, after `~` expansion
    pub path: PathBuf,

    /// SHA-256 digest of the raw file bytes
    pub digest: String,
}

impl ConfigSource {
    pub fn new(origin: ConfigOrigin, name: Option<String>, path: PathBuf, bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self {
            origin,
            name,
            path,
            digest: hex::encode(hasher.finalize()),
        }
    }
}

/// Final mapping of server name to resolved profile.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRegistry {
    log: LogConfig,
    servers: BTreeMap<String, Profile>,
    /// Server name -> index into `sources` of the document that supplied it
    origins: BTreeMap<String, usize>,
    sources: Vec<ConfigSource>,
}

impl ResolvedRegistry {
    pub(crate) fn new(log: LogConfig) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    /// Record a contributing document, returning its index.
    pub(crate) fn add_source(&mut self, source: ConfigSource) -> usize {
        self.sources.push(source);
        self.sources.len() - 1
    }

    /// Insert or replace a server. Returns the source index of the entry
    /// that was replaced, if any.
    pub(crate) fn insert(&mut self, name: String, profile: Profile, source: usize) -> Option<usize> {
        self.servers.insert(name.clone(), profile);
        self.origins.insert(name, source)
    }

    /// Log settings of the primary document
    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.servers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    /// Server names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.servers.keys().map(|k| k.as_str()).collect()
    }

    /// Servers in sorted name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Profile> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// The document that supplied the final value of `name`
    pub fn origin_of(&self, name: &str) -> Option<&ConfigSource> {
        self.origins.get(name).and_then(|&i| self.sources.get(i))
    }

    /// Contributing documents in the order they were applied
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }
}

impl<'a> IntoIterator for &'a ResolvedRegistry {
    type Item = (&'a String, &'a Profile);
    type IntoIter = btree_map::Iter<'a, String, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(addr: &str) -> Profile {
        Profile {
            addr: addr.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_source_digest() {
        let source = ConfigSource::new(ConfigOrigin::Primary, None, PathBuf::from("/c"), b"abc");
        assert_eq!(
            source.digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_insert_tracks_origin() {
        let mut registry = ResolvedRegistry::new(LogConfig::default());
        let primary = registry.add_source(ConfigSource::new(
            ConfigOrigin::Primary,
            None,
            PathBuf::from("/main.toml"),
            b"",
        ));
        let include = registry.add_source(ConfigSource::new(
            ConfigOrigin::Include,
            Some("team".to_string()),
            PathBuf::from("/team.toml"),
            b"",
        ));

        assert_eq!(registry.insert("db".to_string(), profile("a"), primary), None);
        assert_eq!(registry.insert("web".to_string(), profile("w"), primary), None);
        assert_eq!(
            registry.insert("db".to_string(), profile("b"), include),
            Some(primary)
        );

        assert_eq!(registry.get("db").unwrap().addr, "b");
        assert_eq!(registry.origin_of("db").unwrap().name.as_deref(), Some("team"));
        assert_eq!(registry.origin_of("web").unwrap().origin, ConfigOrigin::Primary);
        assert!(registry.origin_of("missing").is_none());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ResolvedRegistry::new(LogConfig::default());
        for name in ["zeta", "alpha", "mid"] {
            registry.insert(name.to_string(), profile(name), 0);
        }
        assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("mid"));
        assert!(!registry.is_empty());
    }
}
