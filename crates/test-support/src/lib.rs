#![deny(unsafe_code)]

//! crates/test-support/src/lib.rs
//!
//! Backends shared by the workspace's integration tests.
//!
//! - [`CaptureBackend`] records every write in order.
//! - [`FailingBackend`] rejects writes (and optionally `init`).
//! - [`SlowBackend`] holds each write for a fixed delay, or until released,
//!   so tests can fill the async queue deterministically.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use logging::{Backend, BackendError, Level};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poison| poison.into_inner())
}

/// Counts lifecycle callbacks.
#[derive(Debug, Default)]
pub struct CallCounts {
    init: AtomicUsize,
    flush: AtomicUsize,
    deinit: AtomicUsize,
}

impl CallCounts {
    /// Number of `init` calls.
    pub fn init(&self) -> usize {
        self.init.load(Ordering::SeqCst)
    }

    /// Number of `flush` calls.
    pub fn flush(&self) -> usize {
        self.flush.load(Ordering::SeqCst)
    }

    /// Number of `deinit` calls.
    pub fn deinit(&self) -> usize {
        self.deinit.load(Ordering::SeqCst)
    }
}

/// Records every write it receives.
#[derive(Debug)]
pub struct CaptureBackend {
    name: String,
    min_level: Level,
    writes: Mutex<Vec<Vec<u8>>>,
    calls: CallCounts,
}

impl CaptureBackend {
    /// Creates a capturing backend accepting every level.
    pub fn new(name: &str) -> Arc<Self> {
        Self::with_min_level(name, Level::Trace)
    }

    /// Creates a capturing backend that registers with `min_level`.
    pub fn with_min_level(name: &str, min_level: Level) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            min_level,
            writes: Mutex::new(Vec::new()),
            calls: CallCounts::default(),
        })
    }

    /// Captured writes decoded as UTF-8 (lossy), in arrival order.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.writes)
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Captured writes as raw bytes.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.writes).clone()
    }

    /// Number of captured writes.
    pub fn count(&self) -> usize {
        lock(&self.writes).len()
    }

    /// Total captured bytes.
    pub fn byte_count(&self) -> usize {
        lock(&self.writes).iter().map(Vec::len).sum()
    }

    /// Discards captured writes.
    pub fn clear(&self) {
        lock(&self.writes).clear();
    }

    /// Lifecycle callback counters.
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }
}

impl Backend for CaptureBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn init(&self) -> Result<(), BackendError> {
        self.calls.init.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
        lock(&self.writes).push(bytes.to_vec());
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        self.calls.flush.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn deinit(&self) -> Result<(), BackendError> {
        self.calls.deinit.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Fails every write; optionally fails `init` too.
#[derive(Debug)]
pub struct FailingBackend {
    name: String,
    fail_init: bool,
    attempts: AtomicUsize,
}

impl FailingBackend {
    /// A backend that registers fine but rejects every write.
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            fail_init: false,
            attempts: AtomicUsize::new(0),
        })
    }

    /// A backend whose `init` fails, so registration is refused.
    pub fn failing_init(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            fail_init: true,
            attempts: AtomicUsize::new(0),
        })
    }

    /// Number of write attempts seen.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Backend for FailingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&self) -> Result<(), BackendError> {
        if self.fail_init {
            return Err(BackendError::Unavailable(format!("{} offline", self.name)));
        }
        Ok(())
    }

    fn write(&self, _bytes: &[u8]) -> Result<(), BackendError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::Io(std::io::Error::other("transport rejected write")))
    }
}

/// Delays each write, either by a fixed duration or until [`release`](Self::release).
#[derive(Debug)]
pub struct SlowBackend {
    inner: Arc<CaptureBackend>,
    delay: Duration,
    gated: bool,
    released: Mutex<bool>,
    release_signal: Condvar,
    busy: AtomicBool,
}

impl SlowBackend {
    /// Sleeps `delay` before recording each write.
    pub fn with_delay(name: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::build(name, delay, false))
    }

    /// Blocks every write until [`release`](Self::release) is called.
    pub fn gated(name: &str) -> Arc<Self> {
        Arc::new(Self::build(name, Duration::ZERO, true))
    }

    fn build(name: &str, delay: Duration, gated: bool) -> Self {
        Self {
            inner: CaptureBackend::new(name),
            delay,
            gated,
            released: Mutex::new(false),
            release_signal: Condvar::new(),
            busy: AtomicBool::new(false),
        }
    }

    /// Lets all current and future writes through.
    pub fn release(&self) {
        *lock(&self.released) = true;
        self.release_signal.notify_all();
    }

    /// Reports whether a write is currently in progress.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Waits until a write is in progress, polling for at most `timeout`.
    pub fn wait_until_busy(&self, timeout: Duration) -> bool {
        let step = Duration::from_millis(1);
        let mut waited = Duration::ZERO;
        while !self.is_busy() {
            if waited >= timeout {
                return false;
            }
            thread::sleep(step);
            waited += step;
        }
        true
    }

    /// Writes recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.inner.lines()
    }
}

impl Backend for SlowBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
        self.busy.store(true, Ordering::SeqCst);
        if self.gated {
            let released = lock(&self.released);
            drop(
                self.release_signal
                    .wait_while(released, |released| !*released)
                    .unwrap_or_else(|poison| poison.into_inner()),
            );
        } else {
            thread::sleep(self.delay);
        }
        let result = self.inner.write(bytes);
        self.busy.store(false, Ordering::SeqCst);
        result
    }
}
