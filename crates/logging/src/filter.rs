//! crates/logging/src/filter.rs
//! Global threshold plus a fixed-capacity table of per-module overrides.
//!
//! Patterns come in three shapes:
//!
//! - an exact module name (`net.tcp`),
//! - the universal wildcard `*`,
//! - a prefix wildcard ending in `.*` (`net.*` matches every module starting
//!   with `net.`).
//!
//! Any other pattern is matched exactly, so `net*` only matches a module
//! literally named `net*`.
//!
//! Resolution for a module name: an exact match wins unconditionally; among
//! matching wildcards the longest prefix wins, so `*` (empty prefix) is the
//! weakest; with no match the global level applies.

use crate::error::{LogError, LogResult};
use crate::level::Level;

/// Number of per-module overrides the table can hold.
pub const MAX_MODULE_FILTERS: usize = 16;

/// Longest module name or pattern accepted, in bytes.
pub const MAX_MODULE_NAME_LEN: usize = 32;

/// A single per-module override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleFilterEntry {
    pattern: String,
    level: Level,
}

impl ModuleFilterEntry {
    /// The pattern as it was registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The threshold applied to matching modules.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Returns the wildcard prefix, or `None` for an exact pattern.
    fn wildcard_prefix(&self) -> Option<&str> {
        if self.pattern == "*" || self.pattern.ends_with(".*") {
            self.pattern.strip_suffix('*')
        } else {
            None
        }
    }
}

/// How well an entry matched a module name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Wildcard(usize),
    Exact,
}

/// Global threshold and per-module override table.
#[derive(Clone, Debug)]
pub struct LevelRegistry {
    level: Level,
    slots: [Option<ModuleFilterEntry>; MAX_MODULE_FILTERS],
}

impl Default for LevelRegistry {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

impl LevelRegistry {
    /// Creates a registry with the given global level and an empty table.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            slots: [const { None }; MAX_MODULE_FILTERS],
        }
    }

    /// Returns the global threshold.
    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Replaces the global threshold.
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Installs or updates the override for `pattern`.
    ///
    /// Updating an existing pattern never consumes a slot.
    pub fn set_module_level(&mut self, pattern: &str, level: Level) -> LogResult<()> {
        validate_pattern(pattern)?;

        if let Some(entry) = self.find_mut(pattern) {
            entry.level = level;
            return Ok(());
        }

        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(LogError::Full)?;
        *slot = Some(ModuleFilterEntry {
            pattern: pattern.to_owned(),
            level,
        });
        Ok(())
    }

    /// Removes the override for `pattern`.
    pub fn clear_module_level(&mut self, pattern: &str) -> LogResult<()> {
        validate_pattern(pattern)?;

        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|entry| entry.pattern == pattern))
            .ok_or(LogError::InvalidParam("no override registered for pattern"))?;
        *slot = None;
        Ok(())
    }

    /// Removes every override.
    pub fn clear_all_module_levels(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Number of overrides currently installed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reports whether no overrides are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of installed overrides in slot order.
    #[must_use]
    pub fn entries(&self) -> Vec<ModuleFilterEntry> {
        self.slots.iter().flatten().cloned().collect()
    }

    /// Resolves the threshold that applies to `module`.
    #[must_use]
    pub fn effective_level(&self, module: Option<&str>) -> Level {
        let Some(module) = module else {
            return self.level;
        };

        self.slots
            .iter()
            .flatten()
            .filter_map(|entry| rank(entry, module).map(|rank| (rank, entry.level)))
            .max_by_key(|(rank, _)| *rank)
            .map_or(self.level, |(_, level)| level)
    }

    /// Applies a comma-separated directive list such as `"warn,net.*=debug,app=error"`.
    ///
    /// A directive without `=` sets the global level. The list is applied
    /// as a unit: on any error, including [`LogError::Full`], the registry
    /// is left unchanged.
    pub fn apply_spec(&mut self, spec: &str) -> LogResult<()> {
        let directives = parse_spec(spec)?;
        let mut staged = self.clone();
        for (pattern, level) in directives {
            match pattern {
                Some(pattern) => staged.set_module_level(pattern, level)?,
                None => staged.level = level,
            }
        }
        *self = staged;
        Ok(())
    }

    fn find_mut(&mut self, pattern: &str) -> Option<&mut ModuleFilterEntry> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|entry| entry.pattern == pattern)
    }
}

fn rank(entry: &ModuleFilterEntry, module: &str) -> Option<MatchRank> {
    match entry.wildcard_prefix() {
        Some(prefix) if module.starts_with(prefix) => Some(MatchRank::Wildcard(prefix.len())),
        Some(_) => None,
        None if entry.pattern == module => Some(MatchRank::Exact),
        None => None,
    }
}

fn validate_pattern(pattern: &str) -> LogResult<()> {
    if pattern.is_empty() {
        return Err(LogError::InvalidParam("module pattern must not be empty"));
    }
    if pattern.len() > MAX_MODULE_NAME_LEN {
        return Err(LogError::InvalidParam("module pattern too long"));
    }
    Ok(())
}

/// Parses a directive list into `(pattern, level)` pairs; `None` patterns set the global level.
pub(crate) fn parse_spec(spec: &str) -> LogResult<Vec<(Option<&str>, Level)>> {
    let mut directives = Vec::new();
    for token in spec.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        match token.split_once('=') {
            Some((pattern, level)) => {
                let pattern = pattern.trim();
                validate_pattern(pattern)?;
                directives.push((Some(pattern), level.parse()?));
            }
            None => directives.push((None, token.parse()?)),
        }
    }
    Ok(directives)
}
