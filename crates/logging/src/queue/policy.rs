//! crates/logging/src/queue/policy.rs
//! What a producer does when the async queue is full.

use std::fmt;
use std::str::FromStr;

use crate::error::LogError;

/// Behaviour of [`AsyncQueue::push`](super::AsyncQueue::push) when the queue is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum OverflowPolicy {
    /// Discard the incoming message.
    #[default]
    Drop = 0,
    /// Evict the oldest queued message, then enqueue the incoming one.
    DropOldest = 1,
    /// Discard the incoming message; same behaviour as [`Drop`](Self::Drop).
    DropNewest = 2,
    /// Wait for space, or for shutdown, in which case the message is discarded.
    Block = 3,
}

impl OverflowPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [Self; 4] = [Self::Drop, Self::DropOldest, Self::DropNewest, Self::Block];

    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::DropOldest => "drop_oldest",
            Self::DropNewest => "drop_newest",
            Self::Block => "block",
        }
    }

    pub(super) const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::DropOldest,
            2 => Self::DropNewest,
            3 => Self::Block,
            _ => Self::Drop,
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverflowPolicy {
    type Err = LogError;

    /// Parses `drop`, `drop_oldest`, `drop_newest` or `block`, ignoring case
    /// and accepting `-` in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == normalized)
            .ok_or(LogError::InvalidParam("unknown overflow policy"))
    }
}
