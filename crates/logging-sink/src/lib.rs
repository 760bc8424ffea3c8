#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides the stock [`logging::Backend`] implementations for
//! the diaglog pipeline: a console writer, a fixed-capacity in-memory ring, a
//! backend over any [`std::io::Write`] destination (a serial port, a file, a
//! socket) and a closure-backed backend for ad-hoc destinations.
//!
//! # Design
//!
//! Each backend carries its registry name, the minimum level it reports at
//! registration and, where output is line-oriented, a [`LineMode`] deciding
//! whether records are terminated with `\n`. State lives behind a mutex so the
//! backends can be shared as `Arc<dyn Backend>` while the caller keeps its own
//! handle for inspection.
//!
//! # Invariants
//!
//! - [`MemoryBackend`] never holds more than its capacity; the oldest bytes
//!   are overwritten first.
//! - `LineMode::WithNewline` never doubles a newline the record already ends
//!   with.
//!
//! # Errors
//!
//! I/O failures surface as [`logging::BackendError::Io`]. The pipeline counts
//! them per backend rather than returning them to the producer.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use logging::{LogConfig, Logger, log_warn};
//! use logging_sink::MemoryBackend;
//!
//! let logger = Logger::new();
//! logger.init(LogConfig::default().with_format("[%L] %m")).unwrap();
//!
//! let ring = Arc::new(MemoryBackend::new(1024));
//! logger.backend_register(ring.clone()).unwrap();
//!
//! log_warn!(logger: &logger, "disk at {}%", 87);
//! assert_eq!(ring.contents(), b"[WARN] disk at 87%\n");
//! # logger.deinit().unwrap();
//! ```

mod callback;
mod console;
mod line_mode;
mod memory;
mod writer;

pub use callback::CallbackBackend;
pub use console::{ConsoleBackend, ConsoleStream};
pub use line_mode::LineMode;
pub use memory::MemoryBackend;
pub use writer::WriterBackend;
