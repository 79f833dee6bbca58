//! Launch and compound configuration types (VS Code `launch.json` shape)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of the process a configuration debugs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Interpreted code, debugged through a network listener
    Interpreted,
    /// Native code, debugged by attaching to the PID
    Compiled,
}

/// Debug adapter named in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugAdapter {
    /// Python debugger (ms-python.debugpy)
    #[serde(rename = "debugpy")]
    Debugpy,
    /// CodeLLDB (vadimcn.vscode-lldb)
    #[serde(rename = "lldb")]
    Lldb,
}

impl DebugAdapter {
    pub fn target_kind(self) -> TargetKind {
        match self {
            DebugAdapter::Debugpy => TargetKind::Interpreted,
            DebugAdapter::Lldb => TargetKind::Compiled,
        }
    }
}

/// Request kind; only attaching is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Attach,
}

/// Network endpoint of a debug listener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

/// How the debugger reaches its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Connection {
    /// Attach-by-port: `"connect": {"host": ..., "port": ...}`
    Port { connect: Endpoint },
    /// Attach-by-PID: `"pid": ...`
    Pid { pid: u32 },
}

/// Local ↔ remote source root pair for debugpy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMapping {
    pub local_root: String,
    pub remote_root: String,
}

/// One named attach descriptor in `configurations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfiguration {
    pub name: String,
    #[serde(rename = "type")]
    pub adapter: DebugAdapter,
    pub request: RequestKind,
    #[serde(flatten)]
    pub connection: Connection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_mappings: Vec<PathMapping>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source_map: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_languages: Vec<String>,
    /// `false` steps into library code as well
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub just_my_code: Option<bool>,
}

impl LaunchConfiguration {
    pub fn target_kind(&self) -> TargetKind {
        self.adapter.target_kind()
    }
}

/// Named group of configurations started together, in `compounds`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundConfiguration {
    pub name: String,
    /// Configuration names, in start order
    pub configurations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_all: Option<bool>,
}

/// Everything one synthesis run produces
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchSet {
    pub configurations: Vec<LaunchConfiguration>,
    pub compounds: Vec<CompoundConfiguration>,
}

impl LaunchSet {
    /// Compound members that name no configuration in this set.
    pub fn dangling_references(&self) -> Vec<&str> {
        self.compounds
            .iter()
            .flat_map(|c| c.configurations.iter())
            .filter(|member| !self.configurations.iter().any(|c| &c.name == *member))
            .map(String::as_str)
            .collect()
    }
}
