//! crates/logging/src/error.rs
//! Error types surfaced by the logging pipeline.

use std::io;

/// Result type for pipeline operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors returned by configuration, lifecycle and registry operations.
///
/// Failures inside a backend's `write` during fan-out are never reported
/// through this type; they are counted per backend instead.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// `init` was called on a logger that is already initialized.
    #[error("logger already initialized")]
    AlreadyInit,

    /// The logger has not been initialized (or was torn down).
    #[error("logger not initialized")]
    NotInit,

    /// An argument was rejected.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),

    /// An integer outside the valid level range was supplied.
    #[error("invalid level value {0}")]
    InvalidLevel(u8),

    /// The fixed-capacity module filter table has no free slot.
    #[error("module filter table is full")]
    Full,

    /// A backend callback failed during registration or teardown.
    #[error("backend '{name}' failed: {source}")]
    Backend {
        /// Name of the backend that failed.
        name: String,
        /// The failure reported by the backend.
        #[source]
        source: BackendError,
    },

    /// The async consumer thread could not be started.
    #[error("failed to spawn async consumer: {0}")]
    Spawn(#[source] io::Error),
}

impl LogError {
    /// Wraps a backend failure with the backend's name.
    pub fn backend(name: impl Into<String>, source: BackendError) -> Self {
        Self::Backend {
            name: name.into(),
            source,
        }
    }
}

/// Failure reported by a backend callback.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The underlying transport reported an I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The destination is not able to accept output right now.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}
