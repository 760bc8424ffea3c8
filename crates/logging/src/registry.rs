//! crates/logging/src/registry.rs
//! Ordered table of registered backends and the fan-out over it.
//!
//! The table itself carries no lock; [`Dispatcher`](crate::dispatch::Dispatcher)
//! wraps it in a mutex that is held for the duration of every fan-out.

use std::sync::Arc;

use crate::backend::{Backend, MAX_BACKEND_NAME_LEN};
use crate::error::{LogError, LogResult};
use crate::level::Level;

/// Snapshot of one registered backend.
#[derive(Clone, Debug)]
pub struct BackendInfo {
    /// Registered name.
    pub name: String,
    /// Current per-backend threshold.
    pub min_level: Level,
    /// Whether the backend currently receives output.
    pub enabled: bool,
    /// Number of `write` calls that returned an error.
    pub write_failures: u64,
    /// Shared handle to the backend.
    pub handle: Arc<dyn Backend>,
}

struct Entry {
    name: String,
    min_level: Level,
    enabled: bool,
    write_failures: u64,
    handle: Arc<dyn Backend>,
}

impl Entry {
    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: self.name.clone(),
            min_level: self.min_level,
            enabled: self.enabled,
            write_failures: self.write_failures,
            handle: Arc::clone(&self.handle),
        }
    }

    fn deliver(&mut self, bytes: &[u8]) -> bool {
        match self.handle.write(bytes) {
            Ok(()) => true,
            Err(error) => {
                self.write_failures += 1;
                internal_warn!("backend '{}' write failed: {}", self.name, error);
                false
            }
        }
    }
}

/// Backends in registration order.
#[derive(Default)]
pub struct BackendRegistry {
    entries: Vec<Entry>,
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.name))
            .finish()
    }
}

impl BackendRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `backend` after running its `init` callback.
    ///
    /// The backend starts enabled with the threshold reported by
    /// [`Backend::min_level`].
    pub fn register(&mut self, backend: Arc<dyn Backend>) -> LogResult<()> {
        let name = backend.name();
        if name.is_empty() {
            return Err(LogError::InvalidParam("backend name must not be empty"));
        }
        if name.len() > MAX_BACKEND_NAME_LEN {
            return Err(LogError::InvalidParam("backend name too long"));
        }
        if self.position(name).is_some() {
            return Err(LogError::InvalidParam("backend name already registered"));
        }

        backend
            .init()
            .map_err(|error| LogError::backend(name, error))?;

        internal_debug!("registered backend '{}'", name);
        self.entries.push(Entry {
            name: name.to_owned(),
            min_level: backend.min_level(),
            enabled: true,
            write_failures: 0,
            handle: backend,
        });
        Ok(())
    }

    /// Removes the named backend, running its `deinit` callback first.
    ///
    /// The backend is removed even when `deinit` fails; the failure is
    /// returned afterwards.
    pub fn unregister(&mut self, name: &str) -> LogResult<()> {
        let index = self
            .position(name)
            .ok_or(LogError::InvalidParam("unknown backend"))?;
        let deinit = self.entries[index].handle.deinit();
        let entry = self.entries.remove(index);
        internal_debug!("unregistered backend '{}'", entry.name);
        deinit.map_err(|error| LogError::backend(entry.name, error))
    }

    /// Returns a snapshot of the named backend.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<BackendInfo> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(Entry::info)
    }

    /// Enables or disables delivery to the named backend.
    pub fn enable(&mut self, name: &str, enabled: bool) -> LogResult<()> {
        self.entry_mut(name)?.enabled = enabled;
        Ok(())
    }

    /// Replaces the threshold of the named backend.
    pub fn set_min_level(&mut self, name: &str, level: Level) -> LogResult<()> {
        self.entry_mut(name)?.min_level = level;
        Ok(())
    }

    /// Names of registered backends in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }

    /// Number of registered backends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no backend is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes a rendered record to every enabled backend whose threshold the
    /// level passes. Returns the number of successful deliveries.
    pub fn fanout(&mut self, level: Level, bytes: &[u8]) -> usize {
        self.entries
            .iter_mut()
            .filter(|entry| entry.enabled && level.passes(entry.min_level))
            .map(|entry| entry.deliver(bytes))
            .filter(|delivered| *delivered)
            .count()
    }

    /// Writes raw bytes to every enabled backend regardless of level.
    pub fn fanout_raw(&mut self, bytes: &[u8]) -> usize {
        self.entries
            .iter_mut()
            .filter(|entry| entry.enabled)
            .map(|entry| entry.deliver(bytes))
            .filter(|delivered| *delivered)
            .count()
    }

    /// Flushes every backend, enabled or not.
    ///
    /// All backends are flushed even if one fails; the first failure is
    /// returned.
    pub fn flush_all(&self) -> LogResult<()> {
        let mut first_error = None;
        for entry in &self.entries {
            if let Err(error) = entry.handle.flush() {
                internal_warn!("backend '{}' flush failed: {}", entry.name, error);
                first_error.get_or_insert(LogError::backend(entry.name.clone(), error));
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Flushes and de-initializes every backend, leaving the registry empty.
    ///
    /// Teardown continues past failures; the first one is returned.
    pub fn shutdown(&mut self) -> LogResult<()> {
        let flushed = self.flush_all();
        let mut first_error = flushed.err();
        for entry in self.entries.drain(..) {
            if let Err(error) = entry.handle.deinit() {
                internal_warn!("backend '{}' deinit failed: {}", entry.name, error);
                first_error.get_or_insert(LogError::backend(entry.name, error));
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    fn entry_mut(&mut self, name: &str) -> LogResult<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.name == name)
            .ok_or(LogError::InvalidParam("unknown backend"))
    }
}
