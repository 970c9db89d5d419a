//! Text-to-value conversions used by the typed accessors.
use std::num::{ParseFloatError, ParseIntError};

/// Values that read as `false`, compared case-insensitively.
pub const FALSY: [&str; 7] = ["0", "no", "f", "false", "none", "never", "negative"];

/// Parse an integer, inferring the base from its prefix.
///
/// An optional sign may precede `0x`/`0X` (hex), `0o`/`0O` (octal),
/// `0b`/`0B` (binary), or a bare leading `0` (octal). Anything else is
/// decimal.
///
/// # Examples
///
/// ```
/// use sconf::config::convert::parse_int;
///
/// assert_eq!(parse_int("0x1F").unwrap(), 31);
/// assert_eq!(parse_int("-0o17").unwrap(), -15);
/// assert_eq!(parse_int("0755").unwrap(), 493);
/// assert_eq!(parse_int("42").unwrap(), 42);
/// assert!(parse_int("0x").is_err());
/// ```
///
/// # Errors
///
/// Returns the underlying [`ParseIntError`] for malformed or out-of-range text.
pub fn parse_int(text: &str) -> Result<i64, ParseIntError> {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };

    let (radix, digits) = split_radix(unsigned);
    // from_str_radix takes a sign of its own, so one after the prefix ("0x-1")
    // gets a zero in front and fails as an invalid digit.
    let digits = if digits.starts_with(['+', '-']) {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    i64::from_str_radix(&format!("{sign}{digits}"), radix)
}

fn split_radix(text: &str) -> (u32, &str) {
    let prefixed = [
        ("0x", 16),
        ("0X", 16),
        ("0o", 8),
        ("0O", 8),
        ("0b", 2),
        ("0B", 2),
    ];
    for (prefix, radix) in prefixed {
        if let Some(rest) = text.strip_prefix(prefix) {
            return (radix, rest);
        }
    }
    match text.strip_prefix('0') {
        Some(rest) if !rest.is_empty() => (8, rest),
        _ => (10, text),
    }
}

/// Parse a double-precision float.
///
/// # Errors
///
/// Returns the underlying [`ParseFloatError`].
pub fn parse_float(text: &str) -> Result<f64, ParseFloatError> {
    text.parse()
}

/// Map a value to a boolean.
///
/// Only the members of [`FALSY`] are false; every other value, including
/// unrecognised words, is true.
#[must_use]
pub fn parse_bool(text: &str) -> bool {
    !FALSY.iter().any(|f| f.eq_ignore_ascii_case(text))
}
