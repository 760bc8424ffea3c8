//! crates/logging/src/config.rs
//! Settings applied when a [`Logger`](crate::Logger) is initialized.

use crate::error::{LogError, LogResult};
use crate::filter::{LevelRegistry, parse_spec};
use crate::format::{DEFAULT_FORMAT, DEFAULT_MAX_MSG_LEN, Pattern};
use crate::level::Level;
use crate::queue::{DEFAULT_QUEUE_SIZE, OverflowPolicy};

/// Environment variable prefix read by [`LogConfig::from_env`].
pub const ENV_PREFIX: &str = "DIAGLOG_";

/// Initialization settings.
///
/// `LogConfig::default()` is the documented default set: level `Info`,
/// pattern `"[%T] [%L] [%M] %m"`, synchronous delivery, a 32-slot queue with
/// the `Drop` policy when async mode is switched on, 256-byte messages and no
/// color.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LogConfig {
    /// Global threshold.
    pub level: Level,
    /// Output pattern.
    pub format: String,
    /// Deliver through the async queue instead of on the caller's thread.
    pub async_mode: bool,
    /// Async queue capacity.
    pub async_queue_size: usize,
    /// Async overflow policy.
    pub async_policy: OverflowPolicy,
    /// Upper bound on the rendered user message, in bytes.
    pub max_msg_len: usize,
    /// Expand `%c`/`%C` to ANSI color sequences.
    pub color_enabled: bool,
    /// Per-module overrides installed at init, in order.
    pub module_levels: Vec<(String, Level)>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: DEFAULT_FORMAT.to_owned(),
            async_mode: false,
            async_queue_size: DEFAULT_QUEUE_SIZE,
            async_policy: OverflowPolicy::Drop,
            max_msg_len: DEFAULT_MAX_MSG_LEN,
            color_enabled: false,
            module_levels: Vec::new(),
        }
    }
}

impl LogConfig {
    /// Sets the global threshold.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output pattern.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Enables async delivery with the given capacity and policy.
    pub fn with_async(mut self, queue_size: usize, policy: OverflowPolicy) -> Self {
        self.async_mode = true;
        self.async_queue_size = queue_size;
        self.async_policy = policy;
        self
    }

    /// Sets the message length limit.
    pub fn with_max_msg_len(mut self, max_msg_len: usize) -> Self {
        self.max_msg_len = max_msg_len;
        self
    }

    /// Enables or disables color sequences.
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self
    }

    /// Appends a per-module override.
    pub fn with_module_level(mut self, pattern: impl Into<String>, level: Level) -> Self {
        self.module_levels.push((pattern.into(), level));
        self
    }

    /// Applies a directive list such as `"warn,net.*=debug"`: bare levels set
    /// the global threshold, `pattern=level` pairs append overrides.
    pub fn with_directives(mut self, spec: &str) -> LogResult<Self> {
        for (pattern, level) in parse_spec(spec)? {
            match pattern {
                Some(pattern) => self.module_levels.push((pattern.to_owned(), level)),
                None => self.level = level,
            }
        }
        Ok(self)
    }

    /// Defaults overlaid with `DIAGLOG_*` environment variables.
    ///
    /// | Variable | Field |
    /// |---|---|
    /// | `DIAGLOG_LEVEL` | `level` |
    /// | `DIAGLOG_FORMAT` | `format` |
    /// | `DIAGLOG_ASYNC` | `async_mode` (`1/0`, `true/false`, `yes/no`, `on/off`) |
    /// | `DIAGLOG_QUEUE_SIZE` | `async_queue_size` |
    /// | `DIAGLOG_POLICY` | `async_policy` |
    /// | `DIAGLOG_MAX_MSG_LEN` | `max_msg_len` |
    /// | `DIAGLOG_COLOR` | `color_enabled` |
    /// | `DIAGLOG_MODULES` | directive list, see [`with_directives`](Self::with_directives) |
    pub fn from_env() -> LogResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a caller-supplied variable source.
    pub fn from_lookup<F>(lookup: F) -> LogResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut config = Self::default();

        if let Some(value) = var("LEVEL") {
            config.level = value.parse()?;
        }
        if let Some(value) = var("FORMAT") {
            config.format = value;
        }
        if let Some(value) = var("ASYNC") {
            config.async_mode = parse_switch(&value)?;
        }
        if let Some(value) = var("QUEUE_SIZE") {
            config.async_queue_size = parse_size(&value)?;
        }
        if let Some(value) = var("POLICY") {
            config.async_policy = value.parse()?;
        }
        if let Some(value) = var("MAX_MSG_LEN") {
            config.max_msg_len = parse_size(&value)?;
        }
        if let Some(value) = var("COLOR") {
            config.color_enabled = parse_switch(&value)?;
        }
        if let Some(value) = var("MODULES") {
            config = config.with_directives(&value)?;
        }

        Ok(config)
    }

    /// Checks every field without applying anything.
    pub fn validate(&self) -> LogResult<()> {
        Pattern::parse(&self.format)?;
        if self.max_msg_len == 0 {
            return Err(LogError::InvalidParam("max_msg_len must be non-zero"));
        }
        if self.async_mode && self.async_queue_size == 0 {
            return Err(LogError::InvalidParam("async queue size must be non-zero"));
        }
        self.level_registry().map(drop)
    }

    /// Builds the level registry described by `level` and `module_levels`.
    ///
    /// More distinct patterns than the table holds is a configuration error,
    /// reported as [`LogError::InvalidParam`].
    pub(crate) fn level_registry(&self) -> LogResult<LevelRegistry> {
        let mut registry = LevelRegistry::new(self.level);
        for (pattern, level) in &self.module_levels {
            registry
                .set_module_level(pattern, *level)
                .map_err(|error| match error {
                    LogError::Full => LogError::InvalidParam("too many module overrides"),
                    other => other,
                })?;
        }
        Ok(registry)
    }
}

fn parse_switch(value: &str) -> LogResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LogError::InvalidParam("expected a boolean switch")),
    }
}

fn parse_size(value: &str) -> LogResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| LogError::InvalidParam("expected a non-negative integer"))
}
