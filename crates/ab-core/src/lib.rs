//! Core logic for attach-bridge (abridge)
//!
//! attach-bridge attaches two debuggers to the same running interactive
//! session: `debugpy` for the Python side and CodeLLDB for a native extension
//! module loaded into that process. One invocation:
//!
//! 1. locates the session host PID ([`session`]),
//! 2. validates input and synthesizes the launch entries ([`launch::synth`]),
//! 3. makes sure a debugpy listener is up on the chosen port ([`listener`]),
//! 4. merges the entries into `.vscode/launch.json` ([`launch::document`]).
//!
//! The managed entries are addressed by stable names, so repeated runs
//! overwrite the same entries and leave operator-authored ones alone.

pub mod attach;
pub mod config;
pub mod error;
pub mod home;
pub mod io;
pub mod launch;
pub mod listener;
pub mod logging;
pub mod session;

pub use attach::{AttachReport, attach_with_debugpy, run_attach};
pub use config::{ConfigOverrides, Options, resolve_options};
pub use error::AttachError;
pub use launch::{CompoundConfiguration, LaunchConfiguration, LaunchSet, synthesize};
pub use listener::{ListenerStatus, ensure_listening, is_listening};
pub use session::{ProcessLocator, Session};
