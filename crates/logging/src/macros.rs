//! crates/logging/src/macros.rs
//! Call-site macros.
//!
//! Every macro captures the call site with [`location!`] and discards the
//! result of the write; use [`Logger::write`](crate::Logger::write) directly
//! when the error matters.
//!
//! ```
//! use logging::{Level, LogConfig, Logger, log_info, log_warn, log_write};
//!
//! let logger = Logger::new();
//! logger.init(LogConfig::default()).unwrap();
//!
//! log_info!(logger: &logger, "started {} workers", 4);
//! log_warn!(logger: &logger, module: "disk", "usage at {}%", 87);
//! log_write!(logger: &logger, Level::Debug, module: "net.tcp", "rx {} bytes", 512);
//! ```

/// Expands to the fully qualified name of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        let name = name.strip_suffix("::__here").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// Captures the current file, line and enclosing function as a
/// [`Location`](crate::Location).
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location::new(
            ::core::file!(),
            ::core::line!(),
            $crate::__function_name!(),
        )
    };
}

/// Writes a record at an explicit level.
///
/// Forms, each optionally prefixed by `logger: <&Logger>,` to target an
/// explicit instance instead of the default one:
///
/// - `log_write!(level, "fmt", args...)`
/// - `log_write!(level, module: "name", "fmt", args...)`
#[macro_export]
macro_rules! log_write {
    (logger: $logger:expr, $level:expr, module: $module:expr, $($arg:tt)+) => {{
        let _ = $crate::Logger::write(
            $logger,
            $level,
            ::core::option::Option::Some($module),
            $crate::location!(),
            ::core::format_args!($($arg)+),
        );
    }};
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        let _ = $crate::Logger::write(
            $logger,
            $level,
            ::core::option::Option::None,
            $crate::location!(),
            ::core::format_args!($($arg)+),
        );
    }};
    ($level:expr, module: $module:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $crate::global(), $level, module: $module, $($arg)+)
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $crate::global(), $level, $($arg)+)
    };
}

/// Writes a record using a C-style format string and argument list.
///
/// Arguments are converted with [`Arg::from`](crate::printf::Arg).
///
/// ```
/// use logging::{Level, LogConfig, Logger, log_printf};
///
/// let logger = Logger::new();
/// logger.init(LogConfig::default()).unwrap();
/// log_printf!(logger: &logger, Level::Warn, "disk at %d%%", 87);
/// ```
#[macro_export]
macro_rules! log_printf {
    (logger: $logger:expr, $level:expr, module: $module:expr, $format:expr $(, $arg:expr)* $(,)?) => {{
        let _ = $crate::Logger::write_printf(
            $logger,
            $level,
            ::core::option::Option::Some($module),
            $crate::location!(),
            $format,
            &[$($crate::printf::Arg::from($arg)),*],
        );
    }};
    (logger: $logger:expr, $level:expr, $format:expr $(, $arg:expr)* $(,)?) => {{
        let _ = $crate::Logger::write_printf(
            $logger,
            $level,
            ::core::option::Option::None,
            $crate::location!(),
            $format,
            &[$($crate::printf::Arg::from($arg)),*],
        );
    }};
    ($level:expr, module: $module:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::log_printf!(logger: $crate::global(), $level, module: $module, $format $(, $arg)*)
    };
    ($level:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::log_printf!(logger: $crate::global(), $level, $format $(, $arg)*)
    };
}

/// Sends raw bytes to every enabled backend.
#[macro_export]
macro_rules! log_raw {
    (logger: $logger:expr, $bytes:expr) => {{
        let _ = $crate::Logger::write_raw($logger, $bytes);
    }};
    ($bytes:expr) => {
        $crate::log_raw!(logger: $crate::global(), $bytes)
    };
}

/// Writes a [`Level::Trace`](crate::Level::Trace) record.
#[macro_export]
macro_rules! log_trace {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $logger, $crate::Level::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_write!($crate::Level::Trace, $($arg)+)
    };
}

/// Writes a [`Level::Debug`](crate::Level::Debug) record.
#[macro_export]
macro_rules! log_debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $logger, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_write!($crate::Level::Debug, $($arg)+)
    };
}

/// Writes a [`Level::Info`](crate::Level::Info) record.
#[macro_export]
macro_rules! log_info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $logger, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_write!($crate::Level::Info, $($arg)+)
    };
}

/// Writes a [`Level::Warn`](crate::Level::Warn) record.
#[macro_export]
macro_rules! log_warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $logger, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_write!($crate::Level::Warn, $($arg)+)
    };
}

/// Writes a [`Level::Error`](crate::Level::Error) record.
#[macro_export]
macro_rules! log_error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $logger, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_write!($crate::Level::Error, $($arg)+)
    };
}

/// Writes a [`Level::Fatal`](crate::Level::Fatal) record.
#[macro_export]
macro_rules! log_fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log_write!(logger: $logger, $crate::Level::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log_write!($crate::Level::Fatal, $($arg)+)
    };
}
