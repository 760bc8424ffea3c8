//! crates/logging/src/format/render.rs
//! Rendering of records through a parsed [`Pattern`].

use std::borrow::Cow;
use std::fmt::Write as _;

use anstyle::{AnsiColor, Color, Style};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::level::Level;
use crate::record::Record;

use super::tokens::{Field, Pattern, PatternToken};

/// Layout of the `%T` field.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero].[subsecond digits:3]"
);

/// Layout of the `%t` field.
const SHORT_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour padding:zero]:[minute padding:zero]:[second padding:zero]");

const ELLIPSIS: &str = "...";

/// Renders `record` through `pattern` using the current UTC time.
///
/// The message is truncated to `max_msg_len` bytes before substitution and
/// `%c`/`%C` expand to ANSI sequences only when `color` is set.
#[must_use]
pub fn render(pattern: &Pattern, record: &Record<'_>, max_msg_len: usize, color: bool) -> String {
    let timestamp = if pattern.uses_clock() {
        OffsetDateTime::now_utc()
    } else {
        OffsetDateTime::UNIX_EPOCH
    };
    render_at(pattern, record, max_msg_len, color, timestamp)
}

/// Renders `record` with an explicit timestamp.
#[must_use]
pub fn render_at(
    pattern: &Pattern,
    record: &Record<'_>,
    max_msg_len: usize,
    color: bool,
    timestamp: OffsetDateTime,
) -> String {
    let message = truncate_message(record.message, max_msg_len);
    let mut buffer = String::with_capacity(pattern.as_str().len() + message.len() + 32);

    for token in pattern.tokens() {
        match token {
            PatternToken::Literal(text) => buffer.push_str(text),
            PatternToken::Field(field) => match field {
                Field::Timestamp => push_time(&mut buffer, timestamp, TIMESTAMP_FORMAT),
                Field::ShortTime => push_time(&mut buffer, timestamp, SHORT_TIME_FORMAT),
                Field::LevelName => buffer.push_str(record.level.as_str()),
                Field::LevelLetter => buffer.push(record.level.letter()),
                Field::Module => buffer.push_str(record.module.unwrap_or_default()),
                Field::File => buffer.push_str(record.location.file),
                Field::Function => buffer.push_str(record.location.function),
                Field::Line => {
                    let _ = write!(buffer, "{}", record.location.line);
                }
                Field::Message => buffer.push_str(&message),
                Field::ColorStart if color => {
                    let _ = write!(buffer, "{}", level_style(record.level).render());
                }
                Field::ColorReset if color => {
                    let _ = write!(buffer, "{}", anstyle::Reset.render());
                }
                Field::ColorStart | Field::ColorReset => {}
            },
        }
    }

    buffer
}

/// Limits `message` to at most `max_len` bytes.
///
/// Longer messages keep their first `max_len - 3` bytes followed by `...`
/// when `max_len > 3`, and are cut hard at `max_len` bytes otherwise. A cut
/// never splits a UTF-8 sequence; it moves back to the previous character
/// boundary instead.
#[must_use]
pub fn truncate_message(message: &str, max_len: usize) -> Cow<'_, str> {
    if message.len() <= max_len {
        return Cow::Borrowed(message);
    }

    if max_len > ELLIPSIS.len() {
        let cut = char_boundary_at_or_before(message, max_len - ELLIPSIS.len());
        let mut truncated = String::with_capacity(cut + ELLIPSIS.len());
        truncated.push_str(&message[..cut]);
        truncated.push_str(ELLIPSIS);
        Cow::Owned(truncated)
    } else {
        Cow::Borrowed(&message[..char_boundary_at_or_before(message, max_len)])
    }
}

fn char_boundary_at_or_before(text: &str, index: usize) -> usize {
    let mut cut = index.min(text.len());
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    cut
}

fn push_time(
    buffer: &mut String,
    timestamp: OffsetDateTime,
    layout: &[BorrowedFormatItem<'_>],
) {
    match timestamp.format(layout) {
        Ok(text) => buffer.push_str(&text),
        Err(_) => buffer.push('?'),
    }
}

/// Style emitted by `%c` for each level.
#[must_use]
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Trace => AnsiColor::BrightBlack,
        Level::Debug => AnsiColor::Cyan,
        Level::Info => AnsiColor::Green,
        Level::Warn => AnsiColor::Yellow,
        Level::Error | Level::Fatal => AnsiColor::Red,
        Level::None => return Style::new(),
    };
    let style = Style::new().fg_color(Some(Color::Ansi(color)));
    if level == Level::Fatal {
        style.bold()
    } else {
        style
    }
}
