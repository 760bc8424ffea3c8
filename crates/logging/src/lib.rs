#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is the diaglog pipeline: producers emit leveled, module-tagged
//! messages that are filtered, rendered through an output pattern and fanned
//! out to every registered [`Backend`], either on the caller's thread or
//! through a bounded [`AsyncQueue`] drained by one consumer thread.
//!
//! # Design
//!
//! - [`Level`] and [`LevelRegistry`] decide whether a record is emitted: a
//!   global threshold plus up to [`MAX_MODULE_FILTERS`] per-module overrides
//!   (exact names, `prefix.*` wildcards and `*`).
//! - [`format`] parses output patterns once into tokens and renders records,
//!   truncating the user message to the configured length. [`printf`]
//!   provides C-style substitution for callers that carry format strings.
//! - [`BackendRegistry`] holds backends in registration order;
//!   [`Dispatcher`] serializes every fan-out over it.
//! - [`AsyncQueue`] decouples producers from backends under an
//!   [`OverflowPolicy`].
//! - [`Logger`] ties these together behind an init/deinit lifecycle. A
//!   process-wide instance is available through [`global()`] and the
//!   `log_*!` macros.
//!
//! # Invariants
//!
//! - Level order is total: `Trace < Debug < Info < Warn < Error < Fatal < None`.
//! - The module override table never holds more than [`MAX_MODULE_FILTERS`]
//!   entries; inserting past capacity fails with [`LogError::Full`].
//! - The rendered user message never exceeds the configured length.
//! - Async queue occupancy never exceeds its capacity.
//! - A backend never observes two writes concurrently.
//! - Settings, overrides, backends and the queue exist only while the logger
//!   is initialized.
//!
//! # Errors
//!
//! Lifecycle and configuration calls return [`LogError`]. Backend write
//! failures during fan-out are counted per backend (see
//! [`BackendInfo::write_failures`]) and never surface to the producer;
//! messages dropped by the async queue are counted in [`QueueStats`].
//!
//! # Examples
//!
//! ```
//! use logging::{Level, LogConfig, Logger, OverflowPolicy, log_error, log_info};
//!
//! let logger = Logger::new();
//! logger
//!     .init(
//!         LogConfig::default()
//!             .with_level(Level::Debug)
//!             .with_async(64, OverflowPolicy::DropOldest)
//!             .with_module_level("net.*", Level::Warn),
//!     )
//!     .unwrap();
//!
//! log_info!(logger: &logger, module: "app", "ready");
//! log_error!(logger: &logger, module: "net.tcp", "peer reset");
//! logger.flush().unwrap();
//! logger.deinit().unwrap();
//! ```
//!
//! # Features
//!
//! - `serde`: serialization for [`LogConfig`], [`Level`], [`OverflowPolicy`]
//!   and [`QueueStats`].
//! - `tracing`: internal diagnostics under [`INTERNAL_TARGET`] and the
//!   `tracing_bridge` layer that forwards `tracing` events into a [`Logger`].

#[macro_use]
mod internal;

mod backend;
mod config;
mod dispatch;
mod error;
mod filter;
pub mod format;
mod global;
mod level;
mod logger;
mod macros;
pub mod printf;
mod queue;
mod record;
mod registry;

#[cfg(feature = "tracing")]
pub mod tracing_bridge;

pub use backend::{Backend, MAX_BACKEND_NAME_LEN};
pub use config::{ENV_PREFIX, LogConfig};
pub use dispatch::Dispatcher;
pub use error::{BackendError, LogError, LogResult};
pub use filter::{LevelRegistry, MAX_MODULE_FILTERS, MAX_MODULE_NAME_LEN, ModuleFilterEntry};
pub use format::{DEFAULT_FORMAT, DEFAULT_MAX_MSG_LEN, Pattern};
pub use global::{
    async_flush, backend_enable, backend_register, backend_unregister, deinit, flush, global,
    init, is_enabled, is_initialized, level, module_clear_level, module_set_level, set_level,
    write, write_printf, write_raw,
};
pub use level::Level;
pub use logger::Logger;
pub use printf::{Arg, sprintf};
pub use queue::{
    AsyncQueue, CONSUMER_THREAD_NAME, DEFAULT_QUEUE_SIZE, OverflowPolicy, PushOutcome, QueueStats,
};
pub use record::{Location, Record};
pub use registry::{BackendInfo, BackendRegistry};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{PipelineLayer, init_tracing};

/// `tracing` target used for diagnostics about the pipeline itself.
pub const INTERNAL_TARGET: &str = "diaglog::internal";
