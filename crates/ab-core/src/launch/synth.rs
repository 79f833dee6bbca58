//! Launch configuration synthesis
//!
//! Produces the three managed configurations and the compound that starts the
//! Python and native attaches together. Names are fixed so that repeated runs
//! overwrite the same entries; pid and port only appear in the values.

use super::model::{
    CompoundConfiguration, Connection, DebugAdapter, Endpoint, LaunchConfiguration, LaunchSet,
    PathMapping, RequestKind,
};
use std::collections::BTreeMap;
use thiserror::Error;

/// Python attach through the debugpy listener
pub const PYTHON_ATTACH_NAME: &str = "Python: Attach to Session";
/// Native attach to the session host PID
pub const NATIVE_ATTACH_NAME: &str = "Native: Attach to Session (LLDB)";
/// Python-only attach, for use without the native debugger
pub const PYTHON_STANDALONE_NAME: &str = "Python: Attach to Session (standalone)";
/// Compound starting [`PYTHON_ATTACH_NAME`] and [`NATIVE_ATTACH_NAME`]
pub const COMPOUND_NAME: &str = "Python + Native: Attach to Session";

/// Invalid synthesis input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid pid {0}: expected a positive process id")]
    InvalidPid(i64),

    #[error("invalid port {0}: expected a value between 1 and 65535")]
    InvalidPort(i64),
}

/// Check pid and port before anything is synthesized or written.
pub fn validate(pid: i64, port: i64) -> Result<(u32, u16), ValidationError> {
    let pid = u32::try_from(pid)
        .ok()
        .filter(|p| *p > 0)
        .ok_or(ValidationError::InvalidPid(pid))?;
    Ok((pid, validate_port(port)?))
}

/// Check that `port` is a usable TCP port (1..=65535).
pub fn validate_port(port: i64) -> Result<u16, ValidationError> {
    u16::try_from(port)
        .ok()
        .filter(|p| *p > 0)
        .ok_or(ValidationError::InvalidPort(port))
}

/// Tunables that shape the synthesized entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesizer {
    /// Host the Python debugger connects to
    pub host: String,
    /// Workspace-side source root
    pub local_root: String,
    /// Session-side source root for debugpy path mapping
    pub remote_root: String,
    /// Restrict Python stepping to user code
    pub just_my_code: bool,
    /// Build-path → local-path remapping for native sources
    pub native_source_map: BTreeMap<String, String>,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            local_root: "${workspaceFolder}".to_string(),
            remote_root: ".".to_string(),
            just_my_code: false,
            native_source_map: BTreeMap::new(),
        }
    }
}

impl Synthesizer {
    /// Build the managed launch set for `pid` and `port`.
    ///
    /// Output depends only on `self`, `pid` and `port`.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if `pid <= 0` or `port` is not a TCP port.
    pub fn synthesize(&self, pid: i64, port: i64) -> Result<LaunchSet, ValidationError> {
        let (pid, port) = validate(pid, port)?;

        let python_attach = self.python_attach(PYTHON_ATTACH_NAME, port);
        let python_standalone = self.python_attach(PYTHON_STANDALONE_NAME, port);
        let native_attach = self.native_attach(pid);

        let compound = CompoundConfiguration {
            name: COMPOUND_NAME.to_string(),
            configurations: vec![python_attach.name.clone(), native_attach.name.clone()],
            stop_all: Some(true),
        };

        Ok(LaunchSet {
            configurations: vec![python_attach, native_attach, python_standalone],
            compounds: vec![compound],
        })
    }

    fn python_attach(&self, name: &str, port: u16) -> LaunchConfiguration {
        LaunchConfiguration {
            name: name.to_string(),
            adapter: DebugAdapter::Debugpy,
            request: RequestKind::Attach,
            connection: Connection::Port {
                connect: Endpoint {
                    host: self.host.clone(),
                    port,
                },
            },
            cwd: Some(self.local_root.clone()),
            path_mappings: vec![PathMapping {
                local_root: self.local_root.clone(),
                remote_root: self.remote_root.clone(),
            }],
            source_map: BTreeMap::new(),
            source_languages: Vec::new(),
            just_my_code: Some(self.just_my_code),
        }
    }

    fn native_attach(&self, pid: u32) -> LaunchConfiguration {
        LaunchConfiguration {
            name: NATIVE_ATTACH_NAME.to_string(),
            adapter: DebugAdapter::Lldb,
            request: RequestKind::Attach,
            connection: Connection::Pid { pid },
            cwd: Some(self.local_root.clone()),
            path_mappings: Vec::new(),
            source_map: self.native_source_map.clone(),
            source_languages: vec!["rust".to_string()],
            just_my_code: None,
        }
    }
}

/// Synthesize with default tunables.
pub fn synthesize(pid: i64, port: i64) -> Result<LaunchSet, ValidationError> {
    Synthesizer::default().synthesize(pid, port)
}
