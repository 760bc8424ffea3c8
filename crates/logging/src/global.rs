//! crates/logging/src/global.rs
//! The process-wide default [`Logger`] and free functions targeting it.
//!
//! Code that does not want to thread a `Logger` through its call graph uses
//! these functions and the `log_*!` macros. Explicit instances remain
//! available for tests and for hosts that run several pipelines.

use std::fmt;
use std::sync::Arc;

use crate::backend::Backend;
use crate::config::LogConfig;
use crate::error::LogResult;
use crate::level::Level;
use crate::logger::Logger;
use crate::printf::Arg;
use crate::record::Location;

static GLOBAL: Logger = Logger::new();

/// Returns the default logger instance.
#[must_use]
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Initializes the default logger.
pub fn init(config: LogConfig) -> LogResult<()> {
    GLOBAL.init(config)
}

/// Tears the default logger down.
pub fn deinit() -> LogResult<()> {
    GLOBAL.deinit()
}

/// Reports whether the default logger is initialized.
#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL.is_initialized()
}

/// Reports whether the default logger would emit a record.
#[must_use]
pub fn is_enabled(level: Level, module: Option<&str>) -> bool {
    GLOBAL.is_enabled(level, module)
}

/// See [`Logger::write`].
pub fn write(
    level: Level,
    module: Option<&str>,
    location: Location,
    args: fmt::Arguments<'_>,
) -> LogResult<()> {
    GLOBAL.write(level, module, location, args)
}

/// See [`Logger::write_printf`].
pub fn write_printf(
    level: Level,
    module: Option<&str>,
    location: Location,
    format: &str,
    args: &[Arg<'_>],
) -> LogResult<()> {
    GLOBAL.write_printf(level, module, location, format, args)
}

/// See [`Logger::write_raw`].
pub fn write_raw(bytes: &[u8]) -> LogResult<()> {
    GLOBAL.write_raw(bytes)
}

/// See [`Logger::flush`].
pub fn flush() -> LogResult<()> {
    GLOBAL.flush()
}

/// See [`Logger::set_level`].
pub fn set_level(level: Level) -> LogResult<()> {
    GLOBAL.set_level(level)
}

/// See [`Logger::level`].
pub fn level() -> LogResult<Level> {
    GLOBAL.level()
}

/// See [`Logger::module_set_level`].
pub fn module_set_level(pattern: &str, level: Level) -> LogResult<()> {
    GLOBAL.module_set_level(pattern, level)
}

/// See [`Logger::module_clear_level`].
pub fn module_clear_level(pattern: &str) -> LogResult<()> {
    GLOBAL.module_clear_level(pattern)
}

/// See [`Logger::backend_register`].
pub fn backend_register(backend: Arc<dyn Backend>) -> LogResult<()> {
    GLOBAL.backend_register(backend)
}

/// See [`Logger::backend_unregister`].
pub fn backend_unregister(name: &str) -> LogResult<()> {
    GLOBAL.backend_unregister(name)
}

/// See [`Logger::backend_enable`].
pub fn backend_enable(name: &str, enabled: bool) -> LogResult<()> {
    GLOBAL.backend_enable(name, enabled)
}

/// See [`Logger::async_flush`].
pub fn async_flush() -> LogResult<()> {
    GLOBAL.async_flush()
}
