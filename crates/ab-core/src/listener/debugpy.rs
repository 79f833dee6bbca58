//! debugpy injection backend
//!
//! Starts the listener inside the session host from the outside with
//! `python -m debugpy --listen <host>:<port> --pid <pid>`. debugpy reports
//! bind failures only as text on stderr, so the exit is classified by
//! [`classify_stderr`]:
//!
//! | stderr contains | mapped to |
//! |-----------------|-----------|
//! | `Address already in use`, `EADDRINUSE`, `Errno 98`, `Errno 48`, `WinError 10048` | `AddrInUse` |
//! | `Permission denied`, `EACCES`, `WinError 10013` | `PermissionDenied` |
//! | anything else | `Other` |

use super::activate::ListenerBackend;
use std::io::{self, ErrorKind};
use std::process::{Command, Stdio};
use tracing::debug;

const ADDR_IN_USE_MARKERS: &[&str] = &[
    "Address already in use",
    "EADDRINUSE",
    "Errno 98",
    "Errno 48",
    "WinError 10048",
];

const PERMISSION_MARKERS: &[&str] = &["Permission denied", "EACCES", "WinError 10013"];

/// Map debugpy stderr output to the bind failure it describes.
pub fn classify_stderr(stderr: &str) -> ErrorKind {
    if ADDR_IN_USE_MARKERS.iter().any(|m| stderr.contains(m)) {
        ErrorKind::AddrInUse
    } else if PERMISSION_MARKERS.iter().any(|m| stderr.contains(m)) {
        ErrorKind::PermissionDenied
    } else {
        ErrorKind::Other
    }
}

/// Backend that injects a debugpy listener into a running process.
#[derive(Debug, Clone)]
pub struct DebugpyInjector {
    python: String,
    pid: u32,
}

impl DebugpyInjector {
    pub fn new(python: impl Into<String>, pid: u32) -> Self {
        Self {
            python: python.into(),
            pid,
        }
    }

    /// Arguments passed to the Python interpreter.
    pub fn args(&self, host: &str, port: u16) -> Vec<String> {
        vec![
            "-m".to_string(),
            "debugpy".to_string(),
            "--listen".to_string(),
            format!("{host}:{port}"),
            "--pid".to_string(),
            self.pid.to_string(),
        ]
    }
}

impl ListenerBackend for DebugpyInjector {
    fn listen(&self, host: &str, port: u16) -> io::Result<()> {
        let args = self.args(host, port);
        debug!("running {} {}", self.python, args.join(" "));

        let output = Command::new(&self.python)
            .args(&args)
            .stdin(Stdio::null())
            .output()?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(io::Error::new(
            classify_stderr(&stderr),
            format!(
                "`{} -m debugpy` exited with {}: {}",
                self.python,
                output.status,
                stderr.trim()
            ),
        ))
    }
}
