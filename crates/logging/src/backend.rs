//! crates/logging/src/backend.rs
//! The contract every output destination implements.

use crate::error::BackendError;
use crate::level::Level;

/// Longest backend name accepted by the registry, in bytes.
pub const MAX_BACKEND_NAME_LEN: usize = 32;

/// A named output destination.
///
/// Backends are shared as `Arc<dyn Backend>`: the registry keeps one handle
/// and the caller is free to keep another (for example to read back what an
/// in-memory backend captured). All callbacks take `&self`; the registry
/// serializes `write` and `flush` calls, so implementations only need
/// interior mutability, not their own ordering guarantees.
///
/// Only [`write`](Self::write) is mandatory. Every other callback defaults to
/// a no-op.
pub trait Backend: Send + Sync {
    /// Unique name used to address the backend in the registry.
    fn name(&self) -> &str;

    /// Threshold below which records are not delivered to this backend.
    ///
    /// Read once at registration; later changes go through the registry.
    fn min_level(&self) -> Level {
        Level::Trace
    }

    /// Called once before the backend is inserted into the registry.
    ///
    /// A failure aborts the registration.
    fn init(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Delivers one rendered record or one raw write.
    fn write(&self, bytes: &[u8]) -> Result<(), BackendError>;

    /// Pushes buffered output to the destination.
    fn flush(&self) -> Result<(), BackendError> {
        Ok(())
    }

    /// Called once when the backend leaves the registry.
    fn deinit(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

impl std::fmt::Debug for dyn Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("name", &self.name())
            .field("min_level", &self.min_level())
            .finish()
    }
}
