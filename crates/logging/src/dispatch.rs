//! crates/logging/src/dispatch.rs
//! Lock-holding front end to the backend registry.
//!
//! Both the synchronous write path and the async consumer thread deliver
//! through one shared [`Dispatcher`]. The registry mutex is held for the whole
//! of each fan-out, so no backend ever observes two writes interleaved.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::backend::Backend;
use crate::error::LogResult;
use crate::level::Level;
use crate::registry::{BackendInfo, BackendRegistry};

/// Serializes access to a [`BackendRegistry`].
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: Mutex<BackendRegistry>,
}

impl Dispatcher {
    /// Creates a dispatcher over an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the registry, recovering from a poisoned lock.
    ///
    /// A backend that panicked mid-write must not disable logging for the
    /// rest of the process.
    pub fn registry(&self) -> MutexGuard<'_, BackendRegistry> {
        self.registry
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    /// Delivers a rendered record.
    pub fn fanout(&self, level: Level, text: &str) -> usize {
        self.registry().fanout(level, text.as_bytes())
    }

    /// Delivers raw bytes, bypassing level checks.
    pub fn fanout_raw(&self, bytes: &[u8]) -> usize {
        self.registry().fanout_raw(bytes)
    }

    /// Flushes every backend.
    pub fn flush_all(&self) -> LogResult<()> {
        self.registry().flush_all()
    }

    /// See [`BackendRegistry::register`].
    pub fn register(&self, backend: Arc<dyn Backend>) -> LogResult<()> {
        self.registry().register(backend)
    }

    /// See [`BackendRegistry::unregister`].
    pub fn unregister(&self, name: &str) -> LogResult<()> {
        self.registry().unregister(name)
    }

    /// See [`BackendRegistry::get`].
    pub fn get(&self, name: &str) -> Option<BackendInfo> {
        self.registry().get(name)
    }

    /// See [`BackendRegistry::enable`].
    pub fn enable(&self, name: &str, enabled: bool) -> LogResult<()> {
        self.registry().enable(name, enabled)
    }

    /// See [`BackendRegistry::set_min_level`].
    pub fn set_min_level(&self, name: &str, level: Level) -> LogResult<()> {
        self.registry().set_min_level(name, level)
    }

    /// See [`BackendRegistry::names`].
    pub fn names(&self) -> Vec<String> {
        self.registry().names()
    }

    /// See [`BackendRegistry::shutdown`].
    pub fn shutdown(&self) -> LogResult<()> {
        self.registry().shutdown()
    }
}
