//! OpenSSH client config import
//!
//! Turns the concrete `Host` entries of an `ssh_config(5)` file into
//! [`Profile`]s keyed `<path>:<host>`, so they never collide with servers
//! from the primary document. Wildcard patterns are not imported, but the
//! blocks they head still supply values to the concrete hosts they match.
//!
//! Directive mapping:
//!
//! | ssh_config       | Profile                               |
//! |------------------|---------------------------------------|
//! | `HostName`       | `addr`                                |
//! | `Port`           | `port`                                |
//! | `User`           | `user`                                |
//! | `ProxyCommand`   | `proxy_cmd`                           |
//! | `LocalCommand`   | `pre_cmd`                             |
//! | `IdentityFile`   | `key`, or `certkey` with a certificate|
//! | `Certificate`    | `cert`                                |
//! | `PKCS11Provider` | `pkcs11` + `pkcs11provider`           |

use std::collections::BTreeMap;
use std::fs;

use hostbook_sshconf::SshConfig;

use crate::config::{expand_home, ConfigError, Profile};

/// Default OpenSSH client config location, before `~` expansion
pub const DEFAULT_OPENSSH_CONFIG: &str = "~/.ssh/config";

/// Read the OpenSSH config at `path` and convert its concrete hosts.
///
/// `path` may start with `~`. Keys use `path` exactly as given.
pub fn import_openssh_config(path: &str) -> Result<BTreeMap<String, Profile>, ConfigError> {
    let full_path = expand_home(path)?;

    let bytes = fs::read(&full_path).map_err(|source| ConfigError::ForeignRead {
        path: full_path.clone(),
        source,
    })?;

    let config = hostbook_sshconf::parse_bytes(&bytes).map_err(|source| {
        ConfigError::ForeignParse {
            path: full_path.clone(),
            source,
        }
    })?;

    let profiles = profiles_from(&config, path);
    tracing::debug!(
        path = %full_path.display(),
        hosts = profiles.len(),
        "OpenSSH config imported"
    );
    Ok(profiles)
}

/// Convert every concrete host of an already parsed config.
pub fn profiles_from(config: &SshConfig, path: &str) -> BTreeMap<String, Profile> {
    config
        .host_names()
        .into_iter()
        .map(|host| (format!("{}:{}", path, host), host_profile(config, host, path)))
        .collect()
}

fn host_profile(config: &SshConfig, host: &str, path: &str) -> Profile {
    let get = |keyword: &str| config.get(host, keyword).unwrap_or_default().to_string();

    let mut profile = Profile {
        addr: get("HostName"),
        port: get("Port"),
        user: get("User"),
        proxy_cmd: enabled(config.get(host, "ProxyCommand")).unwrap_or_default().to_string(),
        pre_cmd: get("LocalCommand"),
        note: format!("from: {}", path),
        ..Default::default()
    };

    // Certificate auth pairs the identity with the certificate; otherwise
    // the identity is a plain private key.
    let identities = config.get_all(host, "IdentityFile");
    if identities.len() > 1 {
        tracing::warn!(
            host,
            used = identities[0],
            ignored = ?&identities[1..],
            "Only the first IdentityFile is imported"
        );
    }
    let identity = identities.first().copied().unwrap_or_default().to_string();
    let certificate = config
        .get(host, "Certificate")
        .or_else(|| config.get(host, "CertificateFile"));
    match certificate {
        Some(cert) => {
            profile.cert = cert.to_string();
            profile.certkey = identity;
        }
        None => profile.key = identity,
    }

    if let Some(provider) = enabled(config.get(host, "PKCS11Provider")) {
        profile.pkcs11 = true;
        profile.pkcs11provider = provider.to_string();
    }

    profile
}

/// `none` switches a directive off in ssh_config.
fn enabled(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.eq_ignore_ascii_case("none"))
}
