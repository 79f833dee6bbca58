//! Debug listener check and activation
//!
//! The Python side is debugged through a debugpy listener inside the session
//! host. Starting a second listener on a bound port fails, so activation is
//! check-then-act and an address-in-use failure counts as success.

mod activate;
mod debugpy;
mod probe;

pub use activate::{ListenerActivator, ListenerBackend};
pub use debugpy::{DebugpyInjector, classify_stderr};
pub use probe::{PROBE_TIMEOUT, is_listening};

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result of [`ListenerActivator::ensure_listening`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListenerStatus {
    /// A listener was started by this invocation
    Started,
    /// A listener was already bound to the port
    AlreadyActive,
    /// Activation was disabled; nothing was probed or bound
    Skipped,
}

impl fmt::Display for ListenerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ListenerStatus::Started => "started",
            ListenerStatus::AlreadyActive => "already active",
            ListenerStatus::Skipped => "skipped",
        };
        f.write_str(text)
    }
}

/// Listener bind failed for a reason other than the port already being taken
#[derive(Debug, Error)]
#[error("failed to start debug listener on {host}:{port}: {source}")]
pub struct ActivationError {
    pub host: String,
    pub port: u16,
    #[source]
    pub source: std::io::Error,
}

/// Convenience wrapper over [`ListenerActivator`] for a single call.
pub fn ensure_listening<B: ListenerBackend>(
    host: &str,
    backend: B,
    port: u16,
    enabled: bool,
) -> Result<ListenerStatus, ActivationError> {
    ListenerActivator::new(host, backend).ensure_listening(port, enabled)
}
