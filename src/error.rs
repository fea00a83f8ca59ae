//! Structured error types for the developer session core
//!
//! Store and controller failures are always surfaced explicitly; nothing
//! here ever defaults to a "safe" phase on error.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::session::SessionPhase;

/// Primary error type for session store and controller operations
#[derive(Error, Debug)]
pub enum DevSessionError {
    /// Underlying storage I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session record could not be serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// On-disk record exists but cannot be parsed; terminal for this call
    #[error("session record corrupted: {path}")]
    Corrupt { path: PathBuf },

    /// A bounded wait on a store operation elapsed. Callers treat this as
    /// "unknown state", never as an implicit production phase.
    #[error("store operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Backing storage could not be opened or created
    #[error("storage unavailable: {reason}")]
    StorageUnavailable { reason: String },
}

impl DevSessionError {
    /// Check if the error is transient enough for the caller to retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::WouldBlock
                    | std::io::ErrorKind::TimedOut
            ),
            Self::Serialization(_) | Self::Corrupt { .. } | Self::StorageUnavailable { .. } => {
                false
            }
        }
    }
}

impl From<serde_json::Error> for DevSessionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using DevSessionError
pub type Result<T> = std::result::Result<T, DevSessionError>;

/// Access-control gate failures
///
/// `NotReady` and `PermissionDenied` are distinct classes so callers can
/// wait-and-retry the former and give up on the latter.
#[derive(Error, Debug)]
pub enum AccessError {
    /// Store is uninitialized or a phase transition is in flight
    #[error("developer session not ready: phase {phase:?}")]
    NotReady { phase: SessionPhase },

    /// Untrusted caller during an active developer session
    #[error("caller {package} may not run under an active developer session")]
    PermissionDenied { package: String },

    /// No ambient caller identity; the convenience entry point fails fast
    /// instead of guessing
    #[error("no caller identity available")]
    NoCallerIdentity,

    /// Reading the session store failed
    #[error(transparent)]
    Store(#[from] DevSessionError),
}

impl AccessError {
    /// Check if the caller should wait and retry
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotReady { .. } => true,
            Self::Store(err) => err.is_retryable(),
            Self::PermissionDenied { .. } | Self::NoCallerIdentity => false,
        }
    }
}
