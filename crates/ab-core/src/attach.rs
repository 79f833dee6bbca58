//! One attach run: locate, synthesize, activate, write

use crate::config::Options;
use crate::error::AttachError;
use crate::io::DocumentError;
use crate::launch::{COMPOUND_NAME, WriteReport, validate, write_launch_file};
use crate::listener::{DebugpyInjector, ListenerActivator, ListenerBackend, ListenerStatus};
use crate::session::{ProcessLocator, Session};
use serde::Serialize;
use tracing::{debug, info};

/// What an attach run did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachReport {
    pub session: Session,
    pub pid: u32,
    pub port: u16,
    pub listener: ListenerStatus,
    #[serde(flatten)]
    pub write: WriteReport,
    pub compound: &'static str,
}

impl AttachReport {
    /// Operator's next step after a successful run.
    pub fn next_action(&self) -> String {
        format!(
            "In the Run and Debug view, select \"{}\" and start it.",
            self.compound
        )
    }
}

/// Run the attach sequence with an explicit listener backend.
///
/// `backend_for` receives the validated session PID. Input is validated
/// before the listener is touched or anything is written, so an invalid pid
/// or port leaves the system unchanged.
///
/// # Errors
///
/// Returns the [`AttachError`] variant of the first step that failed.
pub fn run_attach<L, B, F>(
    options: &Options,
    locator: &L,
    backend_for: F,
) -> Result<AttachReport, AttachError>
where
    L: ProcessLocator + ?Sized,
    B: ListenerBackend,
    F: FnOnce(u32) -> B,
{
    let session = locator.locate_session_pid()?;
    debug!(pid = session.pid, kernel_id = ?session.kernel_id, "located session");

    let (pid, port) = validate(session.pid, options.port)?;
    let set = options.synthesizer().synthesize(session.pid, options.port)?;

    let path = std::path::absolute(&options.config_path).map_err(|source| DocumentError::Io {
        path: options.config_path.clone(),
        source,
    })?;

    let activator = ListenerActivator::new(options.host.clone(), backend_for(pid));
    let listener = activator.ensure_listening(port, options.enable_listener)?;

    let write = write_launch_file(&path, &set)?;
    info!(
        "attach entries for pid {pid} port {port} in {} ({:?})",
        write.path.display(),
        write.outcome
    );

    Ok(AttachReport {
        session,
        pid,
        port,
        listener,
        write,
        compound: COMPOUND_NAME,
    })
}

/// Run the attach sequence, injecting debugpy with `options.python`.
pub fn attach_with_debugpy<L>(options: &Options, locator: &L) -> Result<AttachReport, AttachError>
where
    L: ProcessLocator + ?Sized,
{
    run_attach(options, locator, |pid| {
        DebugpyInjector::new(options.python.clone(), pid)
    })
}
