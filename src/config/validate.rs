//! Semantic checks over a resolved registry
//!
//! Checks, per server:
//! - `addr` must be set
//! - `port`, if set, must be a number in 1..=65535
//! - `proxy_server`, if set, must name another known server

use super::error::InvalidTarget;
use super::registry::ResolvedRegistry;

/// Validate every server, returning one entry per failed check.
///
/// An empty list means the registry is valid. Entries come in server-name
/// order.
pub fn validate(registry: &ResolvedRegistry) -> Vec<InvalidTarget> {
    let mut failures = Vec::new();

    for (name, profile) in registry {
        let mut fail = |reason: String| {
            failures.push(InvalidTarget {
                name: name.clone(),
                reason,
            })
        };

        if profile.addr.is_empty() {
            fail("required parameter 'addr' is missing".to_string());
        }

        if !profile.port.is_empty() && !is_valid_port(&profile.port) {
            fail(format!("invalid port '{}'", profile.port));
        }

        if !profile.proxy_server.is_empty() {
            if profile.proxy_server == *name {
                fail("proxy_server refers to itself".to_string());
            } else if !registry.contains(&profile.proxy_server) {
                fail(format!(
                    "proxy_server '{}' is not a configured server",
                    profile.proxy_server
                ));
            }
        }
    }

    failures
}

fn is_valid_port(port: &str) -> bool {
    matches!(port.parse::<u16>(), Ok(p) if p != 0)
}
