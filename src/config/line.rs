//! Classification of a single configuration line.
//!
//! Format:
//! ```ini
//! # comment
//! ; comment too
//! [scope]
//! key = value with \t escapes
//! ```
use crate::error::ParseError;

/// Longest snippet of an offending line quoted in a parse error.
pub const SNIPPET_LEN: usize = 16;

/// Outcome of parsing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank line or comment.
    Ignorable,
    /// `[name]` header; the name is trimmed and non-empty.
    Scope(&'a str),
    /// `key = value` pair; both trimmed and non-empty, value unescaped.
    Pair {
        /// Text left of the first `=`.
        key: &'a str,
        /// Text right of the first `=`, with escape sequences resolved.
        value: String,
    },
}

/// Parse one raw line.
///
/// `current_scope` is the scope set by the most recent header of the read in
/// progress; a pair without one is rejected before anything else is checked
/// about it.
///
/// # Examples
///
/// ```
/// use sconf::config::line::{Line, parse_line};
///
/// assert_eq!(parse_line("  [net] ", None).unwrap(), Line::Scope("net"));
/// assert_eq!(
///     parse_line("port = 8080", Some("net")).unwrap(),
///     Line::Pair { key: "port", value: "8080".to_string() },
/// );
/// assert_eq!(parse_line("; note", None).unwrap(), Line::Ignorable);
/// ```
///
/// # Errors
///
/// Returns the [`ParseError`] describing why the line is malformed.
pub fn parse_line<'a>(raw: &'a str, current_scope: Option<&str>) -> Result<Line<'a>, ParseError> {
    let line = raw.trim();
    if is_ignorable(line) {
        return Ok(Line::Ignorable);
    }

    if line.chars().count() < 3 {
        return Err(ParseError::TooShortLine);
    }

    if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
        let name = inner.trim();
        if name.is_empty() {
            return Err(ParseError::InvalidScopeName);
        }
        return Ok(Line::Scope(name));
    }

    if current_scope.is_none() {
        return Err(ParseError::ExpressionWithoutScope);
    }

    let (key, value) = line.split_once('=').ok_or(ParseError::CanNotParse)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::ParamNameMissed);
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::ParamValueMissed);
    }

    Ok(Line::Pair {
        key,
        value: unescape(value),
    })
}

/// Resolve `\n`, `\r`, `\t`, `\\`, `\'` and `\"` in a value.
///
/// Substitutions run one after another over the whole string in that order,
/// so `\\n` becomes a backslash followed by a newline.
#[must_use]
pub fn unescape(value: &str) -> String {
    if !value.contains('\\') {
        return value.to_string();
    }
    value
        .replace("\\n", "\n")
        .replace("\\r", "\r")
        .replace("\\t", "\t")
        .replace("\\\\", "\\")
        .replace("\\'", "'")
        .replace("\\\"", "\"")
}

/// The first [`SNIPPET_LEN`] characters of the trimmed line, for error context.
#[must_use]
pub fn snippet(raw: &str) -> String {
    raw.trim().chars().take(SNIPPET_LEN).collect()
}

fn is_ignorable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#') || line.starts_with(';')
}
