//! Configuration module for Kindling
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (KINDLING_*)
//! 3. Project config (kindling.toml)
//! 4. User config (~/.config/kindling/config.toml)
//! 5. Built-in defaults (lowest priority)
//!
//! Only the entry point reads the environment. Assets see the result through
//! the `SessionContext` built by [`Config::to_context`].

mod loader;
mod types;

pub use loader::{
    with_env_overrides_from, ConfigWarning, CONFIG_FILENAME, RELEASE_IMAGE_OVERRIDE_VAR,
};
pub use types::{ClusterConfig, Config, OutputConfig, PoolConfig, ReleaseConfig};
