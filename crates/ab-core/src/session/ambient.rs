//! Ambient session discovery from the calling process
//!
//! `abridge attach` is normally run from inside the session (for example a
//! `!abridge attach` notebook cell), so the session host is one of our own
//! ancestors. Discovery order:
//!
//! 1. `ABRIDGE_SESSION_PID`, exported by a session start-up hook
//! 2. the nearest ancestor whose command line marks it as a kernel host

use super::kernel::{is_kernel_host, kernel_id_from_args};
use super::{LocatorError, ProcessLocator, Session};
use std::ffi::OsStr;
use std::path::PathBuf;
use sysinfo::{Pid, System};
use tracing::debug;

/// Environment variable holding an explicit session host PID.
pub const SESSION_PID_ENV: &str = "ABRIDGE_SESSION_PID";

const MAX_ANCESTOR_DEPTH: usize = 16;

/// Point-in-time view of one process, as needed for host matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub cmd: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// Pick the nearest kernel host from an ancestor chain (nearest first).
pub fn find_session_host<I>(ancestors: I) -> Option<Session>
where
    I: IntoIterator<Item = ProcessSnapshot>,
{
    ancestors
        .into_iter()
        .find(|p| is_kernel_host(&p.cmd))
        .map(|p| Session {
            pid: i64::from(p.pid),
            kernel_id: kernel_id_from_args(&p.cmd),
            cwd: p.cwd,
        })
}

/// Locator reading the ambient state of the calling process.
#[derive(Debug, Default, Clone, Copy)]
pub struct AmbientLocator;

impl AmbientLocator {
    fn session_from_env(&self) -> Result<Option<Session>, LocatorError> {
        let Ok(raw) = std::env::var(SESSION_PID_ENV) else {
            return Ok(None);
        };
        // Set-but-empty counts as unset, as for ABRIDGE_HOME.
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match raw.trim().parse::<i64>() {
            Ok(pid) if pid > 0 => Ok(Some(Session::from_pid(pid))),
            _ => Err(LocatorError::InvalidEnv {
                var: SESSION_PID_ENV,
                value: raw,
            }),
        }
    }

    fn ancestors(&self, start: u32) -> Vec<ProcessSnapshot> {
        let sys = System::new_all();
        let mut chain = Vec::new();
        let mut current = sys.process(Pid::from_u32(start)).and_then(|p| p.parent());

        while let Some(pid) = current {
            if chain.len() >= MAX_ANCESTOR_DEPTH {
                break;
            }
            let Some(process) = sys.process(pid) else {
                break;
            };
            chain.push(ProcessSnapshot {
                pid: pid.as_u32(),
                cmd: process
                    .cmd()
                    .iter()
                    .map(|arg| OsStr::new(arg).to_string_lossy().into_owned())
                    .collect(),
                cwd: process.cwd().map(|p| p.to_path_buf()),
            });
            current = process.parent().filter(|parent| *parent != pid);
        }
        chain
    }
}

impl ProcessLocator for AmbientLocator {
    fn locate_session_pid(&self) -> Result<Session, LocatorError> {
        if let Some(session) = self.session_from_env()? {
            debug!(pid = session.pid, "session pid taken from {SESSION_PID_ENV}");
            return Ok(session);
        }

        let own_pid = std::process::id();
        let chain = self.ancestors(own_pid);
        debug!(depth = chain.len(), "walked ancestor processes");

        match find_session_host(chain) {
            Some(session) => {
                debug!(
                    pid = session.pid,
                    kernel = session.kernel_id.as_deref().unwrap_or("-"),
                    "found session host"
                );
                Ok(session)
            }
            None => Err(LocatorError::NoSession {
                searched_from: own_pid,
            }),
        }
    }
}
