//! Configuration document model
//!
//! A [`ScopeDocument`] is one parsed TOML file: log settings, include
//! references, a `[common]` profile and the `[server.<name>]` profiles.
//! Every profile field is a plain value whose empty form (`""` / `false`)
//! means "unset" and is filled from the enclosing scope during reduction.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Connection profile for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    /// Network address (host name or IP)
    pub addr: String,

    /// Port, kept in string form so the empty value can mean "unset"
    #[serde(deserialize_with = "string_or_integer")]
    pub port: String,

    pub user: String,

    /// Password
    pub pass: String,

    /// Private key path
    pub key: String,

    /// Certificate path
    pub cert: String,

    /// Private key paired with `cert`
    pub certkey: String,

    /// Local command run before connecting
    pub pre_cmd: String,

    /// Local command run after disconnecting
    pub post_cmd: String,

    /// Name of another target to hop through
    pub proxy_server: String,

    /// Shell command providing the transport (OpenSSH `ProxyCommand`)
    pub proxy_cmd: String,

    pub note: String,

    /// Use a PKCS#11 token for authentication
    pub pkcs11: bool,

    /// PKCS#11 provider library path
    pub pkcs11provider: String,
}

/// Accept `port = "22"` as well as `port = 22`.
fn string_or_integer<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(i) => i.to_string(),
    })
}

/// `[log]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub enable: bool,

    /// Directory for log files; may start with `~`
    #[serde(rename = "dirpath")]
    pub dir: String,
}

/// `[include.<name>]` entry pointing at another document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludeReference {
    /// Path to the included file; may start with `~`
    pub path: String,
}

/// One parsed configuration file.
///
/// Maps are ordered by key, which fixes the order includes are applied in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopeDocument {
    pub log: LogConfig,

    pub include: BTreeMap<String, IncludeReference>,

    pub common: Profile,

    #[serde(rename = "server")]
    pub servers: BTreeMap<String, Profile>,
}

impl ScopeDocument {
    /// Parse a document from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Profile {
    /// Copy with the password replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut profile = self.clone();
        if !profile.pass.is_empty() {
            profile.pass = "[REDACTED]".to_string();
        }
        profile
    }
}
