//! crates/logging-sink/src/writer.rs
//! Backend over any [`io::Write`] destination.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use logging::{Backend, BackendError, Level};

use crate::line_mode::LineMode;

/// Delivers records to a wrapped writer: a serial port handle, a file, a
/// socket or a plain `Vec<u8>`.
///
/// `flush` is forwarded to the writer. The writer is only ever accessed under
/// an internal mutex, so `W` needs to be `Send` but not `Sync`.
///
/// ```
/// use std::sync::Arc;
/// use logging::{LogConfig, Logger};
/// use logging_sink::WriterBackend;
///
/// let logger = Logger::new();
/// logger.init(LogConfig::default().with_format("%l %m")).unwrap();
/// let uart = Arc::new(WriterBackend::new("uart", Vec::new()));
/// logger.backend_register(uart.clone()).unwrap();
///
/// logging::log_info!(logger: &logger, "booted");
/// logger.deinit().unwrap();
///
/// assert_eq!(uart.snapshot(), b"I booted\n");
/// ```
pub struct WriterBackend<W> {
    name: String,
    min_level: Level,
    line_mode: LineMode,
    writer: Mutex<W>,
}

impl<W> WriterBackend<W> {
    /// Wraps `writer` under `name`, accepting every level and appending newlines.
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            min_level: Level::Trace,
            line_mode: LineMode::default(),
            writer: Mutex::new(writer),
        }
    }

    /// Sets the threshold reported at registration.
    #[must_use]
    pub const fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Sets the newline policy.
    #[must_use]
    pub const fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Current newline policy.
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Runs `f` with exclusive access to the writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.lock())
    }

    /// Unwraps the backend, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.writer
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl<W: AsRef<[u8]>> WriterBackend<W> {
    /// Copies out everything written so far, for in-memory writers.
    pub fn snapshot(&self) -> Vec<u8> {
        self.lock().as_ref().to_vec()
    }
}

impl<W> fmt::Debug for WriterBackend<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterBackend")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send> Backend for WriterBackend<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
        let mut writer = self.lock();
        write_record(&mut *writer, bytes, self.line_mode)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        self.lock().flush()?;
        Ok(())
    }

    fn deinit(&self) -> Result<(), BackendError> {
        self.flush()
    }
}

/// Writes one record followed by the terminator `line_mode` calls for.
pub(crate) fn write_record<W: Write + ?Sized>(
    writer: &mut W,
    bytes: &[u8],
    line_mode: LineMode,
) -> io::Result<()> {
    writer.write_all(bytes)?;
    if let Some(terminator) = line_mode.terminator(bytes) {
        writer.write_all(terminator)?;
    }
    Ok(())
}
