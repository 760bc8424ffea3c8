//! crates/logging/src/format/tokens.rs
//! Token definitions backing pattern parsing and rendering.

/// A parsed output pattern such as `"[%T] [%L] [%M] %m"`.
///
/// Parsing happens once, when the pattern is installed; rendering walks the
/// token list for every record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    tokens: Vec<PatternToken>,
}

impl Pattern {
    /// Constructs a [`Pattern`] from its source text and parsed tokens.
    pub(super) fn new(source: String, tokens: Vec<PatternToken>) -> Self {
        Self { source, tokens }
    }

    /// Returns the pattern text as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns an iterator over the parsed tokens.
    pub(super) fn tokens(&self) -> impl Iterator<Item = &PatternToken> {
        self.tokens.iter()
    }

    /// Reports whether rendering reads the wall clock.
    #[must_use]
    pub fn uses_clock(&self) -> bool {
        self.tokens().any(|token| {
            matches!(
                token,
                PatternToken::Field(Field::Timestamp | Field::ShortTime)
            )
        })
    }

    /// Reports whether the pattern contains the `%m` message field.
    #[must_use]
    pub fn has_message(&self) -> bool {
        self.tokens()
            .any(|token| matches!(token, PatternToken::Field(Field::Message)))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum PatternToken {
    Literal(String),
    Field(Field),
}

/// Record fields a pattern can reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Field {
    /// `%T`
    Timestamp,
    /// `%t`
    ShortTime,
    /// `%L`
    LevelName,
    /// `%l`
    LevelLetter,
    /// `%M`
    Module,
    /// `%F`
    File,
    /// `%f`
    Function,
    /// `%n`
    Line,
    /// `%m`
    Message,
    /// `%c`
    ColorStart,
    /// `%C`
    ColorReset,
}

impl Field {
    /// Maps a pattern letter to its field.
    pub(super) const fn from_letter(letter: char) -> Option<Self> {
        Some(match letter {
            'T' => Self::Timestamp,
            't' => Self::ShortTime,
            'L' => Self::LevelName,
            'l' => Self::LevelLetter,
            'M' => Self::Module,
            'F' => Self::File,
            'f' => Self::Function,
            'n' => Self::Line,
            'm' => Self::Message,
            'c' => Self::ColorStart,
            'C' => Self::ColorReset,
            _ => return None,
        })
    }
}
