//! crates/logging-sink/src/console.rs

use std::io::{self, Write};

use logging::{Backend, BackendError, Level};

use crate::line_mode::LineMode;
use crate::writer::write_record;

/// Standard stream a [`ConsoleBackend`] writes to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConsoleStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
}

/// Writes records to the process's standard output or standard error.
///
/// Each record is written while holding the stream's lock, so it is never
/// interleaved with output from other threads printing to the same stream.
#[derive(Debug)]
pub struct ConsoleBackend {
    name: String,
    stream: ConsoleStream,
    min_level: Level,
    line_mode: LineMode,
}

impl ConsoleBackend {
    /// Default registry name.
    pub const DEFAULT_NAME: &'static str = "console";

    /// A console backend named `"console"` on `stream`.
    #[must_use]
    pub fn new(stream: ConsoleStream) -> Self {
        Self::named(Self::DEFAULT_NAME, stream)
    }

    /// A console backend with an explicit registry name.
    pub fn named(name: impl Into<String>, stream: ConsoleStream) -> Self {
        Self {
            name: name.into(),
            stream,
            min_level: Level::Trace,
            line_mode: LineMode::WithNewline,
        }
    }

    /// Shorthand for a standard-output backend.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    /// Shorthand for a standard-error backend.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
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

    /// The stream this backend writes to.
    #[must_use]
    pub const fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Backend for ConsoleBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn write(&self, bytes: &[u8]) -> Result<(), BackendError> {
        match self.stream {
            ConsoleStream::Stdout => write_record(&mut io::stdout().lock(), bytes, self.line_mode)?,
            ConsoleStream::Stderr => write_record(&mut io::stderr().lock(), bytes, self.line_mode)?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), BackendError> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().flush()?,
            ConsoleStream::Stderr => io::stderr().lock().flush()?,
        }
        Ok(())
    }
}
