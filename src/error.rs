//! Error types for the prockill library.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for prockill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while observing or terminating processes.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend categorically cannot perform the requested operation.
    ///
    /// This is distinct from a runtime failure: it means the capability does
    /// not exist for this backend/platform combination at all, and a caller
    /// may recover by trying an alternative backend or the forceful path.
    #[error("Operation is not supported by {0}")]
    Unsupported(String),

    /// A bounded wait's deadline elapsed before the process finished.
    #[error("{process} did not finish in {timeout:?}")]
    WaitTimeout {
        process: String,
        /// The requested bound, so callers can log or report it.
        timeout: Duration,
    },

    /// Permission denied for an operation on the given PID.
    #[error("Permission denied for process {0}")]
    PermissionDenied(u32),

    /// Failed to deliver a termination request to a process.
    #[error("Failed to kill process {pid}: {reason}")]
    KillFailed { pid: u32, reason: String },

    /// A system call or external status/kill tool failed in an
    /// unrecognized way.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for the `Unsupported` variant.
    ///
    /// Used by [`crate::FallbackProcess`] to decide whether to try the next
    /// alternative and by the escalation policy in [`crate::control`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }

    /// Returns `true` for the `WaitTimeout` variant.
    pub fn is_wait_timeout(&self) -> bool {
        matches!(self, Error::WaitTimeout { .. })
    }
}
