//! Configuration resolution
//!
//! Resolves attach options from multiple sources with priority:
//! 1. Command-line flags (passed as parameters)
//! 2. Environment variables
//! 3. Repo-local config (.abridge.toml)
//! 4. Global config (~/.config/abridge/config.toml)
//! 5. Defaults

mod discovery;
mod types;

pub use discovery::{
    ConfigError, ConfigOverrides, ConfigSources, REPO_CONFIG_FILE, config_sources, resolve_options,
};
pub use types::{
    DEFAULT_CONFIG_PATH, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PYTHON, FileConfig, LaunchSection,
    LaunchTuning, ListenerSection, Options,
};
