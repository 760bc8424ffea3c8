//! crates/logging/src/internal.rs
//! Diagnostics about the pipeline itself.
//!
//! With the `tracing` feature enabled these macros forward to `tracing` under
//! the [`INTERNAL_TARGET`](crate::INTERNAL_TARGET) target; without it the
//! arguments are type-checked and discarded.

/// Emit a pipeline lifecycle event (init, deinit, registration).
macro_rules! internal_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: $crate::INTERNAL_TARGET, $($arg)*);
        #[cfg(not(feature = "tracing"))]
        let _ = format_args!($($arg)*);
    }};
}

/// Emit a pipeline fault (backend failure, dropped teardown error).
macro_rules! internal_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: $crate::INTERNAL_TARGET, $($arg)*);
        #[cfg(not(feature = "tracing"))]
        let _ = format_args!($($arg)*);
    }};
}
