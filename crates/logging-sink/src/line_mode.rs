//! crates/logging-sink/src/line_mode.rs

/// Controls whether a backend terminates each delivered record with a newline.
///
/// Rendered records carry no terminator of their own; line-oriented
/// destinations such as a terminal or a log file pick [`LineMode::WithNewline`],
/// while framed transports that delimit records themselves pick
/// [`LineMode::WithoutNewline`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// Append `\n` after each record unless it already ends with one.
    #[default]
    WithNewline,
    /// Deliver the bytes exactly as rendered.
    WithoutNewline,
}

impl LineMode {
    /// Reports whether the mode appends a trailing newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_sink::LineMode;
    ///
    /// assert!(LineMode::WithNewline.append_newline());
    /// assert!(!LineMode::WithoutNewline.append_newline());
    /// ```
    #[must_use]
    pub const fn append_newline(self) -> bool {
        matches!(self, Self::WithNewline)
    }

    /// Returns the terminator to write after `bytes`, if any.
    #[must_use]
    pub fn terminator(self, bytes: &[u8]) -> Option<&'static [u8]> {
        (self.append_newline() && bytes.last() != Some(&b'\n')).then_some(b"\n")
    }
}

impl From<bool> for LineMode {
    /// `true` selects [`LineMode::WithNewline`], `false` selects
    /// [`LineMode::WithoutNewline`].
    ///
    /// ```
    /// use logging_sink::LineMode;
    ///
    /// assert_eq!(LineMode::from(true), LineMode::WithNewline);
    /// assert_eq!(LineMode::from(false), LineMode::WithoutNewline);
    /// ```
    fn from(append_newline: bool) -> Self {
        if append_newline {
            Self::WithNewline
        } else {
            Self::WithoutNewline
        }
    }
}

impl From<LineMode> for bool {
    fn from(mode: LineMode) -> Self {
        mode.append_newline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_appends_newline() {
        assert_eq!(LineMode::default(), LineMode::WithNewline);
    }

    #[test]
    fn terminator_skips_already_terminated_records() {
        assert_eq!(LineMode::WithNewline.terminator(b"ready"), Some(&b"\n"[..]));
        assert_eq!(LineMode::WithNewline.terminator(b"ready\n"), None);
        assert_eq!(LineMode::WithoutNewline.terminator(b"ready"), None);
    }

    #[test]
    fn empty_record_still_gets_a_line() {
        assert_eq!(LineMode::WithNewline.terminator(b""), Some(&b"\n"[..]));
    }

    #[test]
    fn bool_round_trip() {
        for mode in [LineMode::WithNewline, LineMode::WithoutNewline] {
            assert_eq!(LineMode::from(bool::from(mode)), mode);
        }
    }
}
