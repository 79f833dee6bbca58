//! Listener activation with already-active treated as success

use super::probe::is_listening;
use super::{ActivationError, ListenerStatus};
use std::io::{self, ErrorKind};
use tracing::{debug, info, warn};

/// Something that can bind a debug listener on `host:port`.
///
/// Implementations report an address-in-use failure as
/// [`ErrorKind::AddrInUse`]; every other error kind is fatal.
pub trait ListenerBackend {
    fn listen(&self, host: &str, port: u16) -> io::Result<()>;
}

impl<B: ListenerBackend + ?Sized> ListenerBackend for &B {
    fn listen(&self, host: &str, port: u16) -> io::Result<()> {
        (**self).listen(host, port)
    }
}

/// Starts the debug listener only when it is not already up.
#[derive(Debug)]
pub struct ListenerActivator<B> {
    host: String,
    backend: B,
}

impl<B: ListenerBackend> ListenerActivator<B> {
    pub fn new(host: impl Into<String>, backend: B) -> Self {
        Self {
            host: host.into(),
            backend,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Make sure a listener exists on `port`.
    ///
    /// With `enabled == false` this returns [`ListenerStatus::Skipped`] without
    /// probing, for environments where the session starts its own listener.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError`] when binding fails for any reason other
    /// than the port already being in use.
    pub fn ensure_listening(
        &self,
        port: u16,
        enabled: bool,
    ) -> Result<ListenerStatus, ActivationError> {
        if !enabled {
            info!("listener activation disabled, not touching port {port}");
            return Ok(ListenerStatus::Skipped);
        }

        if is_listening(&self.host, port) {
            debug!("listener already active on {}:{port}", self.host);
            return Ok(ListenerStatus::AlreadyActive);
        }

        match self.backend.listen(&self.host, port) {
            Ok(()) => {
                info!("started debug listener on {}:{port}", self.host);
                Ok(ListenerStatus::Started)
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                // Another process bound the port between probe and bind.
                warn!("port {port} was taken concurrently, treating as active: {e}");
                Ok(ListenerStatus::AlreadyActive)
            }
            Err(source) => Err(ActivationError {
                host: self.host.clone(),
                port,
                source,
            }),
        }
    }
}
