//! crates/logging-sink/src/memory.rs
//! Fixed-capacity in-memory backend.
//!
//! The backend keeps the most recent `capacity` bytes of output. When a write
//! does not fit, the oldest bytes are overwritten, so a crash dump or a debug
//! shell can always read back the tail of the log without the buffer ever
//! growing.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use logging::{Backend, BackendError, Level};

use crate::line_mode::LineMode;

/// Byte ring collecting rendered records.
#[derive(Debug)]
pub struct MemoryBackend {
    name: String,
    min_level: Level,
    line_mode: LineMode,
    capacity: usize,
    ring: Mutex<Ring>,
}

#[derive(Debug, Default)]
struct Ring {
    bytes: VecDeque<u8>,
    overwritten: u64,
}

impl Ring {
    fn push(&mut self, data: &[u8], capacity: usize) {
        // Only the tail of an oversized write can survive.
        let skipped = data.len().saturating_sub(capacity);
        self.overwritten += skipped as u64;
        let data = &data[skipped..];
        let excess = (self.bytes.len() + data.len()).saturating_sub(capacity);
        self.bytes.drain(..excess);
        self.overwritten += excess as u64;
        self.bytes.extend(data);
    }
}

impl MemoryBackend {
    /// Default registry name.
    pub const DEFAULT_NAME: &'static str = "memory";

    /// A ring named `"memory"` holding at most `capacity` bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::named(Self::DEFAULT_NAME, capacity)
    }

    /// A ring with an explicit registry name.
    pub fn named(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            min_level: Level::Trace,
            line_mode: LineMode::WithNewline,
            capacity,
            ring: Mutex::new(Ring::default()),
        }
    }

    /// Sets the threshold reported at registration.
    #[must_use]
    pub const fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Sets the record separator policy.
    #[must_use]
    pub const fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Maximum number of bytes retained.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently held.
    pub fn len(&self) -> usize {
        self.lock().bytes.len()
    }

    /// Reports whether the ring holds nothing.
    pub fn is_empty(&self) -> bool {
        self.lock().bytes.is_empty()
    }

    /// Total bytes discarded to make room for newer output.
    pub fn overwritten(&self) -> u64 {
        self.lock().overwritten
    }

    /// Copies out the retained bytes, oldest first.
    pub fn contents(&self) -> Vec<u8> {
        self.lock().bytes.iter().copied().collect()
    }

    /// Retained bytes decoded as UTF-8, replacing invalid sequences.
    ///
    /// An overwrite can cut a multi-byte character at the start of the ring.
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Removes and returns the retained bytes.
    pub fn drain(&self) -> Vec<u8> {
        self.lock().bytes.drain(..).collect()
    }

    /// Discards the retained bytes.
    pub fn clear(&self) {
        self.lock().bytes.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Ring> {
        self.ring.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn init(&self) -> Result<(), BackendError> {
        if self.capacity == 0 {
            return Err(BackendError::Unavailable(
                "memory ring capacity must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
        let mut ring = self.lock();
        ring.push(bytes, self.capacity);
        if let Some(terminator) = self.line_mode.terminator(bytes) {
            ring.push(terminator, self.capacity);
        }
        Ok(())
    }
}
