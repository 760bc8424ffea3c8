//! crates/logging/src/printf.rs
//! C-style `printf` substitution for callers that carry a format string and
//! an argument list instead of [`format_args!`].
//!
//! Supported conversions are `d i u x X o c s f F e E g G p %` with the flags
//! `- 0 + space #`, a width and a precision (either may be `*`). Length
//! modifiers (`h hh l ll z j t L`) are accepted and ignored because every
//! [`Arg`] already carries its own width. A conversion that is unknown, or
//! whose argument is missing or of an unusable type, is copied to the output
//! verbatim; substitution never panics.

/// Upper bound applied to widths and precisions taken from the format string.
const MAX_FIELD_WIDTH: usize = 4096;

/// A single argument consumed by [`sprintf`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Arg<'a> {
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point value.
    Float(f64),
    /// Single character.
    Char(char),
    /// String slice.
    Str(&'a str),
    /// Address rendered by `%p`.
    Ptr(usize),
}

macro_rules! arg_from {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

arg_from!(Int: i8, i16, i32, i64);
arg_from!(Uint: u8, u16, u32, u64);
arg_from!(Float: f32, f64);

impl From<isize> for Arg<'_> {
    fn from(value: isize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Self::Uint(value as u64)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(value.as_str())
    }
}

impl Arg<'_> {
    fn as_i64(self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(value),
            Self::Uint(value) => Some(value as i64),
            Self::Float(value) => Some(value as i64),
            Self::Char(value) => Some(i64::from(u32::from(value))),
            Self::Ptr(value) => Some(value as i64),
            Self::Str(_) => None,
        }
    }

    fn as_u64(self) -> Option<u64> {
        match self {
            Self::Int(value) => Some(value as u64),
            Self::Uint(value) => Some(value),
            Self::Float(value) => Some(value as u64),
            Self::Char(value) => Some(u64::from(u32::from(value))),
            Self::Ptr(value) => Some(value as u64),
            Self::Str(_) => None,
        }
    }

    fn as_f64(self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(value),
            Self::Int(value) => Some(value as f64),
            Self::Uint(value) => Some(value as f64),
            Self::Char(_) | Self::Str(_) | Self::Ptr(_) => None,
        }
    }

    fn as_char(self) -> Option<char> {
        match self {
            Self::Char(value) => Some(value),
            Self::Int(_) | Self::Uint(_) => self
                .as_u64()
                .and_then(|code| u32::try_from(code).ok())
                .and_then(char::from_u32),
            Self::Float(_) | Self::Str(_) | Self::Ptr(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    plus: bool,
    space: bool,
    alt: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

struct Directive {
    spec: Spec,
    conversion: Option<char>,
    /// Bytes consumed after the introducing `%`.
    len: usize,
    /// A `*` width or precision found no usable argument.
    starved: bool,
}

/// Substitutes `args` into the C-style `format` string.
///
/// # Examples
///
/// ```
/// use logging::printf::{sprintf, Arg};
///
/// assert_eq!(sprintf("disk at %d%%", &[Arg::Int(87)]), "disk at 87%");
/// assert_eq!(sprintf("%-4s|%04x", &["ab".into(), 255u32.into()]), "ab  |00ff");
/// ```
#[must_use]
pub fn sprintf(format: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(format.len() + 16);
    let mut args = args.iter().copied();
    let mut rest = format;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let text = &rest[pos..];
        let directive = parse_directive(&text[1..], &mut args);
        let end = 1 + directive.len;
        let raw = &text[..end];

        match directive.conversion {
            Some(conversion) if !directive.starved => {
                if !render_conversion(&mut out, conversion, &directive.spec, &mut args) {
                    out.push_str(raw);
                }
            }
            _ => out.push_str(raw),
        }
        rest = &text[end..];
    }

    out.push_str(rest);
    out
}

fn parse_directive<'a, I>(text: &str, args: &mut I) -> Directive
where
    I: Iterator<Item = Arg<'a>>,
{
    let bytes = text.as_bytes();
    let mut index = 0;
    let mut spec = Spec::default();
    let mut starved = false;

    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'-' => spec.left = true,
            b'0' => spec.zero = true,
            b'+' => spec.plus = true,
            b' ' => spec.space = true,
            b'#' => spec.alt = true,
            _ => break,
        }
        index += 1;
    }

    if bytes.get(index) == Some(&b'*') {
        index += 1;
        match args.next().and_then(Arg::as_i64) {
            Some(width) => {
                if width < 0 {
                    spec.left = true;
                }
                spec.width = Some((width.unsigned_abs() as usize).min(MAX_FIELD_WIDTH));
            }
            None => starved = true,
        }
    } else {
        let start = index;
        while bytes.get(index).is_some_and(u8::is_ascii_digit) {
            index += 1;
        }
        if index > start {
            spec.width = Some(parse_field(&text[start..index]));
        }
    }

    if bytes.get(index) == Some(&b'.') {
        index += 1;
        if bytes.get(index) == Some(&b'*') {
            index += 1;
            match args.next().and_then(Arg::as_i64) {
                Some(precision) if precision >= 0 => {
                    spec.precision = Some((precision as usize).min(MAX_FIELD_WIDTH));
                }
                Some(_) => spec.precision = None,
                None => starved = true,
            }
        } else {
            let start = index;
            while bytes.get(index).is_some_and(u8::is_ascii_digit) {
                index += 1;
            }
            spec.precision = Some(parse_field(&text[start..index]));
        }
    }

    while bytes
        .get(index)
        .is_some_and(|byte| matches!(byte, b'h' | b'l' | b'z' | b'j' | b't' | b'L' | b'q'))
    {
        index += 1;
    }

    let conversion = text[index..].chars().next();
    Directive {
        spec,
        conversion,
        len: index + conversion.map_or(0, char::len_utf8),
        starved,
    }
}

fn parse_field(digits: &str) -> usize {
    if digits.is_empty() {
        return 0;
    }
    digits
        .parse::<usize>()
        .map_or(MAX_FIELD_WIDTH, |value| value.min(MAX_FIELD_WIDTH))
}

/// Writes one conversion; returns `false` when the raw directive must be kept instead.
fn render_conversion<'a, I>(out: &mut String, conversion: char, spec: &Spec, args: &mut I) -> bool
where
    I: Iterator<Item = Arg<'a>>,
{
    match conversion {
        '%' => {
            out.push('%');
            true
        }
        'd' | 'i' => {
            let Some(value) = args.next().and_then(Arg::as_i64) else {
                return false;
            };
            let sign = if value < 0 {
                "-"
            } else {
                positive_sign(spec)
            };
            push_integer(out, sign, "", value.unsigned_abs().to_string(), spec);
            true
        }
        'u' | 'x' | 'X' | 'o' => {
            let Some(value) = args.next().and_then(Arg::as_u64) else {
                return false;
            };
            let (digits, prefix) = match conversion {
                'x' => (format!("{value:x}"), if spec.alt && value != 0 { "0x" } else { "" }),
                'X' => (format!("{value:X}"), if spec.alt && value != 0 { "0X" } else { "" }),
                'o' => (format!("{value:o}"), if spec.alt && value != 0 { "0" } else { "" }),
                _ => (value.to_string(), ""),
            };
            push_integer(out, "", prefix, digits, spec);
            true
        }
        'c' => {
            let Some(value) = args.next().and_then(Arg::as_char) else {
                return false;
            };
            let mut buf = [0u8; 4];
            push_text(out, value.encode_utf8(&mut buf), spec);
            true
        }
        's' => {
            let Some(Arg::Str(value)) = args.next() else {
                return false;
            };
            match spec.precision {
                Some(limit) => {
                    let cut = value
                        .char_indices()
                        .nth(limit)
                        .map_or(value.len(), |(offset, _)| offset);
                    push_text(out, &value[..cut], spec);
                }
                None => push_text(out, value, spec),
            }
            true
        }
        'p' => {
            let address = match args.next() {
                Some(Arg::Ptr(value)) => value as u64,
                Some(Arg::Uint(value)) => value,
                _ => return false,
            };
            push_text(out, &format!("0x{address:x}"), spec);
            true
        }
        'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
            let Some(value) = args.next().and_then(Arg::as_f64) else {
                return false;
            };
            push_float(out, value, conversion, spec);
            true
        }
        _ => false,
    }
}

fn positive_sign(spec: &Spec) -> &'static str {
    if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    }
}

fn push_integer(out: &mut String, sign: &str, prefix: &str, mut digits: String, spec: &Spec) {
    let mut prefix = prefix;
    if let Some(precision) = spec.precision {
        if precision == 0 && digits == "0" {
            digits.clear();
        }
        if digits.len() < precision {
            digits.insert_str(0, &"0".repeat(precision - digits.len()));
        }
    }
    // `%#o` only needs the prefix when the digits do not already lead with zero
    if prefix == "0" && digits.starts_with('0') {
        prefix = "";
    }

    let zero_pad = spec.zero && !spec.left && spec.precision.is_none();
    let head = format!("{sign}{prefix}");
    pad_numeric(out, &head, &digits, spec, zero_pad);
}

fn push_float(out: &mut String, value: f64, conversion: char, spec: &Spec) {
    let upper = conversion.is_ascii_uppercase();
    let sign = if value.is_sign_negative() && !value.is_nan() {
        "-"
    } else {
        positive_sign(spec)
    };
    let magnitude = value.abs();

    if !magnitude.is_finite() {
        let body = match (magnitude.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        pad_numeric(out, sign, body, spec, false);
        return;
    }

    let precision = spec.precision.unwrap_or(6);
    let mut body = match conversion.to_ascii_lowercase() {
        'f' => format!("{magnitude:.precision$}"),
        'e' => exponent_form(magnitude, precision, upper),
        _ => general_form(magnitude, precision, upper, spec.alt),
    };
    if spec.alt && !body.contains('.') && conversion.to_ascii_lowercase() == 'f' {
        body.push('.');
    }

    let zero_pad = spec.zero && !spec.left;
    pad_numeric(out, sign, &body, spec, zero_pad);
}

/// Formats `value` as `d.ddde±XX` with at least two exponent digits.
fn exponent_form(value: f64, precision: usize, upper: bool) -> String {
    let repr = format!("{value:.precision$e}");
    let (mantissa, exponent) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    format!(
        "{mantissa}{}{}{:02}",
        if upper { 'E' } else { 'e' },
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    )
}

fn general_form(value: f64, precision: usize, upper: bool, alt: bool) -> String {
    let significant = precision.max(1);
    let exponent = if value == 0.0 {
        0
    } else {
        let repr = format!("{value:.prec$e}", prec = significant - 1);
        repr.split_once('e')
            .and_then(|(_, exponent)| exponent.parse::<i32>().ok())
            .unwrap_or(0)
    };

    let significant_i32 = i32::try_from(significant).unwrap_or(i32::MAX);
    let body = if exponent >= -4 && exponent < significant_i32 {
        let decimals = (significant_i32 - 1 - exponent) as usize;
        format!("{value:.decimals$}")
    } else {
        exponent_form(value, significant - 1, upper)
    };

    if alt {
        body
    } else {
        strip_trailing_zeros(&body)
    }
}

fn strip_trailing_zeros(body: &str) -> String {
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => body.split_at(pos),
        None => (body, ""),
    };
    if !mantissa.contains('.') {
        return body.to_owned();
    }
    let trimmed = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{exponent}")
}

fn pad_numeric(out: &mut String, head: &str, body: &str, spec: &Spec, zero_pad: bool) {
    let fill = spec
        .width
        .unwrap_or(0)
        .saturating_sub(head.chars().count() + body.chars().count());

    if spec.left {
        out.push_str(head);
        out.push_str(body);
        push_repeated(out, ' ', fill);
    } else if zero_pad {
        out.push_str(head);
        push_repeated(out, '0', fill);
        out.push_str(body);
    } else {
        push_repeated(out, ' ', fill);
        out.push_str(head);
        out.push_str(body);
    }
}

fn push_text(out: &mut String, text: &str, spec: &Spec) {
    pad_numeric(out, "", text, spec, false);
}

fn push_repeated(out: &mut String, ch: char, count: usize) {
    out.extend(std::iter::repeat_n(ch, count));
}
