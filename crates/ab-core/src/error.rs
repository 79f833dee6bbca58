//! Aggregated error for one attach run

use crate::io::DocumentError;
use crate::launch::ValidationError;
use crate::listener::ActivationError;
use crate::session::LocatorError;
use thiserror::Error;

/// Everything that can stop an attach run
///
/// Each variant maps to the step that failed and a hint for the operator.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Activation(#[from] ActivationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl AttachError {
    /// The step of the run that failed.
    pub fn step(&self) -> &'static str {
        match self {
            AttachError::Locator(_) => "locate session",
            AttachError::Activation(_) => "start debug listener",
            AttachError::Validation(_) => "validate input",
            AttachError::Document(_) => "write launch configurations",
        }
    }

    /// What the operator can do about it.
    pub fn remediation(&self) -> &'static str {
        match self {
            AttachError::Locator(_) => {
                "run inside an interactive session, or pass --pid with the session host's process id"
            }
            AttachError::Activation(_) => {
                "check whether the port is in use or blocked, or pick another with --port"
            }
            AttachError::Validation(ValidationError::InvalidPid(_)) => {
                "the pid must be a positive process id"
            }
            AttachError::Validation(ValidationError::InvalidPort(_)) => {
                "the port must be between 1 and 65535"
            }
            AttachError::Document(e) if e.is_corrupt() => {
                "the launch file was left untouched; inspect and repair it by hand"
            }
            AttachError::Document(_) => "check permissions of the target directory",
        }
    }
}
