#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `diaglog` is a structured diagnostic-logging pipeline for firmware-style
//! hosts and services. Producers emit leveled, module-tagged messages; the
//! pipeline filters them against a global threshold and per-module
//! overrides, renders them through an output pattern and fans them out to
//! every registered backend, either on the caller's thread or through a
//! bounded queue drained by one consumer thread.
//!
//! This crate re-exports the pipeline from the `logging` crate and the stock
//! backends from `logging-sink` under [`sinks`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use diaglog::sinks::MemoryBackend;
//! use diaglog::{Level, LogConfig, Logger, OverflowPolicy, log_warn};
//!
//! let logger = Logger::new();
//! logger
//!     .init(
//!         LogConfig::default()
//!             .with_format("[%L] %M: %m")
//!             .with_async(32, OverflowPolicy::DropOldest)
//!             .with_module_level("net.*", Level::Debug),
//!     )
//!     .unwrap();
//!
//! let ring = Arc::new(MemoryBackend::new(4096));
//! logger.backend_register(ring.clone()).unwrap();
//!
//! log_warn!(logger: &logger, module: "net.tcp", "retransmit #{}", 3);
//! logger.flush().unwrap();
//! assert_eq!(ring.contents(), b"[WARN] net.tcp: retransmit #3\n");
//! logger.deinit().unwrap();
//! ```
//!
//! # Features
//!
//! - `serde`: serialization for configuration types.
//! - `tracing`: internal diagnostics and a `tracing-subscriber` layer that
//!   forwards `tracing` events into the pipeline.

pub use logging::*;

/// Stock backends: console, in-memory ring, generic writer and closures.
pub mod sinks {
    pub use logging_sink::{
        CallbackBackend, ConsoleBackend, ConsoleStream, LineMode, MemoryBackend, WriterBackend,
    };
}
