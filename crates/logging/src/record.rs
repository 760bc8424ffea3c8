//! crates/logging/src/record.rs
//! The record handed to the formatter.

use crate::level::Level;

/// Call-site information attached to every record.
///
/// Built by the [`location!`](crate::location) macro at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Source file path as reported by `file!()`.
    pub file: &'static str,
    /// Source line.
    pub line: u32,
    /// Fully qualified name of the enclosing function.
    pub function: &'static str,
}

impl Location {
    /// Creates a location from its parts.
    #[must_use]
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// A location with empty file and function and line zero.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new("", 0, "")
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unknown()
    }
}

/// A single log event after message substitution, before rendering.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    /// Severity of the event.
    pub level: Level,
    /// Module name, if the producer supplied one.
    pub module: Option<&'a str>,
    /// Where the event was produced.
    pub location: Location,
    /// Substituted user message, not yet truncated.
    pub message: &'a str,
}

impl<'a> Record<'a> {
    /// Bundles the parts of a record.
    #[must_use]
    pub const fn new(
        level: Level,
        module: Option<&'a str>,
        location: Location,
        message: &'a str,
    ) -> Self {
        Self {
            level,
            module,
            location,
            message,
        }
    }
}
