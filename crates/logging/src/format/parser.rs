//! crates/logging/src/format/parser.rs
//! Parser for output patterns.

use crate::error::{LogError, LogResult};

use super::tokens::{Field, Pattern, PatternToken};

impl Pattern {
    /// Parses an output pattern.
    ///
    /// `%%` yields a literal percent sign, a trailing lone `%` is kept as-is
    /// and unknown tokens such as `%q` pass through literally. The only
    /// rejected input is the empty string.
    pub fn parse(text: &str) -> LogResult<Self> {
        if text.is_empty() {
            return Err(LogError::InvalidParam("format pattern must not be empty"));
        }

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }

            let Some(next) = chars.next() else {
                literal.push('%');
                break;
            };

            match (next, Field::from_letter(next)) {
                ('%', _) => literal.push('%'),
                (_, Some(field)) => {
                    if !literal.is_empty() {
                        tokens.push(PatternToken::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(PatternToken::Field(field));
                }
                (other, None) => {
                    literal.push('%');
                    literal.push(other);
                }
            }
        }

        if !literal.is_empty() {
            tokens.push(PatternToken::Literal(literal));
        }

        Ok(Self::new(text.to_owned(), tokens))
    }
}

impl std::str::FromStr for Pattern {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<PatternToken> {
        Pattern::parse(text).unwrap().tokens().cloned().collect()
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(matches!(
            Pattern::parse(""),
            Err(LogError::InvalidParam(_))
        ));
    }

    #[test]
    fn literals_between_fields_are_merged() {
        assert_eq!(
            tokens("[%L] %m"),
            vec![
                PatternToken::Literal("[".into()),
                PatternToken::Field(Field::LevelName),
                PatternToken::Literal("] ".into()),
                PatternToken::Field(Field::Message),
            ]
        );
    }

    #[test]
    fn double_percent_is_literal() {
        assert_eq!(tokens("100%%"), vec![PatternToken::Literal("100%".into())]);
    }

    #[test]
    fn unknown_token_passes_through() {
        assert_eq!(
            tokens("%q%m"),
            vec![
                PatternToken::Literal("%q".into()),
                PatternToken::Field(Field::Message),
            ]
        );
    }

    #[test]
    fn trailing_percent_is_literal() {
        assert_eq!(
            tokens("%m %"),
            vec![
                PatternToken::Field(Field::Message),
                PatternToken::Literal(" %".into()),
            ]
        );
    }

    #[test]
    fn every_field_letter_is_recognised() {
        let parsed = tokens("%T%t%L%l%M%F%f%n%m%c%C");
        assert_eq!(parsed.len(), 11);
        assert!(parsed.iter().all(|token| matches!(token, PatternToken::Field(_))));
    }

    #[test]
    fn clock_usage_is_detected() {
        assert!(Pattern::parse("%T %m").unwrap().uses_clock());
        assert!(Pattern::parse("%t").unwrap().uses_clock());
        assert!(!Pattern::parse("[%L] %m").unwrap().uses_clock());
    }

    #[test]
    fn source_text_is_preserved() {
        let pattern: Pattern = "[%l] %%m".parse().unwrap();
        assert_eq!(pattern.as_str(), "[%l] %%m");
        assert!(!pattern.has_message());
    }
}
