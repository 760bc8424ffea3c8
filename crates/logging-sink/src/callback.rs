//! crates/logging-sink/src/callback.rs
//! Backend assembled from closures.

use std::fmt;

use logging::{Backend, BackendError, Level};

type WriteFn = Box<dyn Fn(&[u8]) -> Result<(), BackendError> + Send + Sync>;
type HookFn = Box<dyn Fn() -> Result<(), BackendError> + Send + Sync>;

/// A backend whose callbacks are closures.
///
/// Only the write closure is required; each lifecycle hook defaults to a no-op
/// when not supplied.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use logging_sink::CallbackBackend;
/// use logging::Backend;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let backend = CallbackBackend::new("hook", move |bytes| {
///     sink.lock().unwrap().extend_from_slice(bytes);
///     Ok(())
/// });
///
/// backend.write(b"ping").unwrap();
/// assert_eq!(*seen.lock().unwrap(), b"ping");
/// ```
pub struct CallbackBackend {
    name: String,
    min_level: Level,
    on_write: WriteFn,
    on_init: Option<HookFn>,
    on_flush: Option<HookFn>,
    on_deinit: Option<HookFn>,
}

impl CallbackBackend {
    /// Creates a backend that hands every write to `on_write`.
    pub fn new<F>(name: impl Into<String>, on_write: F) -> Self
    where
        F: Fn(&[u8]) -> Result<(), BackendError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            min_level: Level::Trace,
            on_write: Box::new(on_write),
            on_init: None,
            on_flush: None,
            on_deinit: None,
        }
    }

    /// Sets the threshold reported at registration.
    #[must_use]
    pub const fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Runs `hook` when the backend is registered.
    #[must_use]
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), BackendError> + Send + Sync + 'static,
    {
        self.on_init = Some(Box::new(hook));
        self
    }

    /// Runs `hook` on every flush.
    #[must_use]
    pub fn on_flush<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), BackendError> + Send + Sync + 'static,
    {
        self.on_flush = Some(Box::new(hook));
        self
    }

    /// Runs `hook` when the backend leaves the registry.
    #[must_use]
    pub fn on_deinit<F>(mut self, hook: F) -> Self
    where
        F: Fn() -> Result<(), BackendError> + Send + Sync + 'static,
    {
        self.on_deinit = Some(Box::new(hook));
        self
    }
}

fn run(hook: Option<&HookFn>) -> Result<(), BackendError> {
    hook.map_or(Ok(()), |hook| hook())
}

impl fmt::Debug for CallbackBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackBackend")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("on_init", &self.on_init.is_some())
            .field("on_flush", &self.on_flush.is_some())
            .field("on_deinit", &self.on_deinit.is_some())
            .finish_non_exhaustive()
    }
}

impl Backend for CallbackBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn init(&self) -> Result<(), BackendError> {
        run(self.on_init.as_ref())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
        (self.on_write)(bytes)
    }

    fn flush(&self) -> Result<(), BackendError> {
        run(self.on_flush.as_ref())
    }

    fn deinit(&self) -> Result<(), BackendError> {
        run(self.on_deinit.as_ref())
    }
}
