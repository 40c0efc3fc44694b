//! Configuration resolution
//!
//! Builds the server registry from layered scopes:
//! 1. Primary `[common]`
//! 2. Include-level `[common]` (reduced against the primary common)
//! 3. Per-server `[server.<name>]`
//!
//! Reduction is field-level: a set field in a nearer scope replaces the
//! inherited value, an unset one inherits it.

mod error;
mod include;
mod loader;
mod profile;
mod reduce;
mod registry;
mod validate;

pub use error::{invalid_names, ConfigError, InvalidTarget};
pub use include::{expand_home, expand_home_with, resolve_include, ResolvedInclude};
pub use loader::{default_config_path, load_config, DEFAULT_CONFIG_PATH};
pub use profile::{IncludeReference, LogConfig, Profile, ScopeDocument};
pub use reduce::reduce;
pub use registry::{ConfigOrigin, ConfigSource, ResolvedRegistry};
pub use validate::validate;
