//! Side-effect-free TCP probe for an existing listener

use std::io::{self, ErrorKind};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, warn};

/// Connect timeout for a single probe attempt.
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Whether a connect error proves nobody is listening at that address.
///
/// Only an explicit refusal (or an address that cannot be reached at all)
/// counts as "not listening". Resets, aborts, and timeouts mean something
/// answered or may be there, so they count as listening.
fn proves_not_listening(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ConnectionRefused
            | ErrorKind::AddrNotAvailable
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
    )
}

/// Check whether something is already accepting connections on `host:port`.
///
/// Every resolved address is tried; the port is considered free only when
/// all of them refuse. The probe never binds and never sends payload.
///
/// A host that does not resolve reports `false`. Nothing can be listening
/// there, and the backend's own bind then fails with an error naming the
/// host, instead of the run reporting a listener that cannot exist.
pub fn is_listening(host: &str, port: u16) -> bool {
    let addrs: Vec<_> = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect(),
        Err(e) => {
            warn!("cannot resolve {host}:{port}, probe inconclusive, treating as not listening: {e}");
            return false;
        }
    };

    for addr in addrs {
        match TcpStream::connect_timeout(&addr, PROBE_TIMEOUT) {
            Ok(_) => {
                debug!(%addr, "listener probe connected");
                return true;
            }
            Err(e) if proves_not_listening(&e) => {
                debug!(%addr, "listener probe refused: {e}");
            }
            Err(e) => {
                debug!(%addr, "listener probe inconclusive, assuming listening: {e}");
                return true;
            }
        }
    }
    false
}
