//! Hostbook - connection profile resolution
//!
//! This crate resolves a layered TOML configuration (a common profile,
//! per-server overrides and included documents) into one flat registry of
//! connection profiles, and imports hosts from OpenSSH client configs into
//! the same profile schema.

pub mod config;
pub mod logging;
pub mod openssh;

pub use config::{load_config, ConfigError, Profile, ResolvedRegistry};
pub use openssh::import_openssh_config;
