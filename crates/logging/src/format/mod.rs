//! crates/logging/src/format/mod.rs
//! Output patterns and record rendering.
//!
//! A pattern mixes literal text with `%` fields:
//!
//! | Field | Renders |
//! |---|---|
//! | `%T` | `YYYY-MM-DD HH:MM:SS.mmm` (UTC) |
//! | `%t` | `HH:MM:SS` |
//! | `%L` / `%l` | level name / level letter |
//! | `%M` | module name, empty when absent |
//! | `%F` / `%f` / `%n` | source file / function / line |
//! | `%m` | the user message, truncated to the configured length |
//! | `%c` / `%C` | per-level color start / reset when color is enabled |
//! | `%%` | a literal `%` |

mod parser;
mod render;
mod tokens;

pub use render::{level_style, render, render_at, truncate_message};
pub use tokens::Pattern;

/// Pattern installed when none is configured.
pub const DEFAULT_FORMAT: &str = "[%T] [%L] [%M] %m";

/// Message length limit applied when none is configured.
pub const DEFAULT_MAX_MSG_LEN: usize = 256;
