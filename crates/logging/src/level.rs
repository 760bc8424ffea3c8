//! crates/logging/src/level.rs
//! Severity levels and their textual forms.

use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Severity of a log record, ordered from least to most severe.
///
/// [`Level::None`] is a threshold sentinel that accepts nothing. It is a valid
/// setting for the global or per-module threshold but is never attached to an
/// emitted record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Level {
    /// Very fine-grained tracing output.
    Trace = 0,
    /// Debugging output.
    Debug = 1,
    /// Informational messages (the default threshold).
    #[default]
    Info = 2,
    /// Recoverable problems.
    Warn = 3,
    /// Failed operations.
    Error = 4,
    /// Unrecoverable failures.
    Fatal = 5,
    /// Threshold that rejects every record.
    None = 6,
}

impl Level {
    /// All levels in ascending severity.
    pub const ALL: [Self; 7] = [
        Self::Trace,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
        Self::None,
    ];

    /// Returns the upper-case level name rendered by the `%L` token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::None => "NONE",
        }
    }

    /// Returns the single-letter form rendered by the `%l` token.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
            Self::Fatal => 'F',
            Self::None => 'N',
        }
    }

    /// Reports whether a record at this level may be emitted.
    #[must_use]
    pub const fn is_emittable(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Reports whether a record at `self` passes the `threshold`.
    ///
    /// A `None` threshold rejects everything, including records that are
    /// themselves (incorrectly) tagged `None`.
    #[must_use]
    pub fn passes(self, threshold: Self) -> bool {
        self.is_emittable() && threshold.is_emittable() && self >= threshold
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level as Self
    }
}

impl TryFrom<u8> for Level {
    type Error = LogError;

    fn try_from(value: u8) -> Result<Self, LogError> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(LogError::InvalidLevel(value))
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Parses a level name case-insensitively.
    ///
    /// Accepts full names (`warn`, `warning`), single letters (`w`), `off` as
    /// an alias for `none`, and numeric values `0..=6`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u8>() {
            return Self::try_from(value);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" | "t" => Ok(Self::Trace),
            "debug" | "d" => Ok(Self::Debug),
            "info" | "i" => Ok(Self::Info),
            "warn" | "warning" | "w" => Ok(Self::Warn),
            "error" | "err" | "e" => Ok(Self::Error),
            "fatal" | "f" => Ok(Self::Fatal),
            "none" | "off" | "n" => Ok(Self::None),
            _ => Err(LogError::InvalidParam("unknown level name")),
        }
    }
}
