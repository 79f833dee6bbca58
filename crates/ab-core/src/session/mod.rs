//! Session host discovery
//!
//! The native module runs in-process with the interactive session, so the
//! native debugger attaches to the session host's PID. Discovery reads
//! implicit process state, so it sits behind [`ProcessLocator`] and tests can
//! substitute a [`FixedLocator`].

mod ambient;
mod kernel;

pub use ambient::{AmbientLocator, ProcessSnapshot, SESSION_PID_ENV, find_session_host};
pub use kernel::{is_kernel_host, kernel_id_from_args};

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// The running interactive-session host, as observed (never owned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Host OS process id
    pub pid: i64,
    /// Working directory of the host, when the OS exposes it
    pub cwd: Option<PathBuf>,
    /// Kernel identity parsed from the connection file argument
    pub kernel_id: Option<String>,
}

impl Session {
    /// Session known only by its PID.
    pub fn from_pid(pid: i64) -> Self {
        Self {
            pid,
            cwd: None,
            kernel_id: None,
        }
    }
}

/// Errors raised while locating the session host
#[derive(Debug, Error)]
pub enum LocatorError {
    /// No ambient session context was found
    #[error("no interactive session found among the ancestors of process {searched_from}")]
    NoSession { searched_from: u32 },

    /// The session PID environment variable is set but unusable
    #[error("{var}={value:?} is not a valid process id")]
    InvalidEnv { var: &'static str, value: String },
}

/// Source of the session host PID.
pub trait ProcessLocator {
    /// Return the session whose host process the native debugger should attach to.
    fn locate_session_pid(&self) -> Result<Session, LocatorError>;
}

/// Locator that always reports the same PID.
///
/// Used for `--pid` and by tests. The PID is not validated here; the
/// synthesizer rejects non-positive values before anything is written.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub i64);

impl ProcessLocator for FixedLocator {
    fn locate_session_pid(&self) -> Result<Session, LocatorError> {
        Ok(Session::from_pid(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_locator_returns_pid() {
        let session = FixedLocator(4321).locate_session_pid().unwrap();
        assert_eq!(session, Session::from_pid(4321));
    }

    #[test]
    fn test_fixed_locator_passes_invalid_pid_through() {
        let session = FixedLocator(-1).locate_session_pid().unwrap();
        assert_eq!(session.pid, -1);
    }

    #[test]
    fn test_locator_error_messages() {
        let err = LocatorError::NoSession { searched_from: 77 };
        assert!(err.to_string().contains("77"));

        let err = LocatorError::InvalidEnv {
            var: SESSION_PID_ENV,
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("ABRIDGE_SESSION_PID"));
        assert!(err.to_string().contains("abc"));
    }
}
