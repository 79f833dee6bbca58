//! Configuration types

use crate::launch::Synthesizer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default debugpy listener port
pub const DEFAULT_PORT: i64 = 5678;
/// Default listener host
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default launch file, relative to the current directory
pub const DEFAULT_CONFIG_PATH: &str = ".vscode/launch.json";

/// Default interpreter used to inject the listener
#[cfg(windows)]
pub const DEFAULT_PYTHON: &str = "python";
#[cfg(not(windows))]
pub const DEFAULT_PYTHON: &str = "python3";

/// Effective options for one attach run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    /// Start the debugpy listener if it is not already up
    pub enable_listener: bool,
    /// Listener host (also what the Python debugger connects to)
    pub host: String,
    /// Listener port; validated during synthesis
    pub port: i64,
    /// Launch file to merge into
    pub config_path: PathBuf,
    /// Interpreter used for `-m debugpy`
    pub python: String,
    /// Shape of the synthesized entries
    pub launch: LaunchTuning,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            enable_listener: true,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            python: DEFAULT_PYTHON.to_string(),
            launch: LaunchTuning::default(),
        }
    }
}

impl Options {
    /// Synthesizer configured from these options.
    pub fn synthesizer(&self) -> Synthesizer {
        Synthesizer {
            host: self.host.clone(),
            local_root: self.launch.local_root.clone(),
            remote_root: self.launch.remote_root.clone(),
            just_my_code: self.launch.just_my_code,
            native_source_map: self.launch.source_map.clone(),
        }
    }
}

/// Launch entry tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchTuning {
    pub local_root: String,
    pub remote_root: String,
    pub just_my_code: bool,
    pub source_map: BTreeMap<String, String>,
}

impl Default for LaunchTuning {
    fn default() -> Self {
        let synth = Synthesizer::default();
        Self {
            local_root: synth.local_root,
            remote_root: synth.remote_root,
            just_my_code: synth.just_my_code,
            source_map: synth.native_source_map,
        }
    }
}

/// On-disk TOML layout; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub listener: ListenerSection,
    #[serde(default)]
    pub launch: LaunchSection,
}

/// `[listener]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListenerSection {
    pub enabled: Option<bool>,
    pub host: Option<String>,
    pub port: Option<i64>,
    pub python: Option<String>,
}

/// `[launch]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchSection {
    pub config_path: Option<PathBuf>,
    pub local_root: Option<String>,
    pub remote_root: Option<String>,
    pub just_my_code: Option<bool>,
    pub source_map: Option<BTreeMap<String, String>>,
}
