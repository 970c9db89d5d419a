//! Domain-specific error types for the configuration reader.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! The store returns [`ConfigError`] from every fallible operation, while
//! command handlers at the CLI boundary convert it to [`anyhow::Error`] via
//! the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError
//! ├── Io / TooLarge / Write        — file access and size limit
//! ├── Parse(ParseError)            — a rejected line, with position
//! ├── ScopeNotFound / KeyNotFound  — lookups
//! ├── InvalidInt / InvalidFloat    — typed conversions
//! └── NothingRead / SizeLimitTooLarge — misuse of the store
//! ```

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

use thiserror::Error;

/// Reason a single line was rejected by the line parser or the strict policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No meaningful line is shorter than three characters (`a=b`, `[s]`).
    #[error("too short line")]
    TooShortLine,

    /// A `[ ]` header with nothing but whitespace inside.
    #[error("invalid scope name")]
    InvalidScopeName,

    /// A key/value line appeared before any scope header.
    #[error("expression without scope")]
    ExpressionWithoutScope,

    /// A key/value line without an `=` separator.
    #[error("can not parse")]
    CanNotParse,

    /// Nothing left of the `=`.
    #[error("param name missed")]
    ParamNameMissed,

    /// Nothing right of the `=`.
    #[error("param value missed")]
    ParamValueMissed,

    /// Strict mode: the scope was already declared in this session.
    #[error("duplicate scope '{0}'")]
    DuplicateScope(String),

    /// Strict mode: the key was already assigned in the current scope.
    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
}

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File could not be opened, read, written, or exceeded the size limit.
    Io,
    /// A line was rejected while reading.
    Parse,
    /// Scope or key lookup failed.
    Lookup,
    /// A value could not be converted to the requested type.
    Conversion,
    /// The store was used in a state that does not allow the operation.
    Precondition,
}

/// Errors returned by [`Store`](crate::config::Store) operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be opened, stat'ed, or read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is larger than the configured size limit.
    #[error("config file {} is {size} bytes, limit is {limit}", .path.display())]
    TooLarge {
        /// Path to the oversized file.
        path: PathBuf,
        /// Reported file size, or the bytes read once a stream crossed the limit.
        size: u64,
        /// Limit in effect when the read was attempted.
        limit: u64,
    },

    /// The dump file could not be written.
    #[error("IO error writing dump file {}: {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line was rejected; the whole read was aborted.
    #[error("{origin}: line {line}: {source} (near '{near} ...')")]
    Parse {
        /// File path, or `<string>` for in-memory input.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// At most 16 characters of the trimmed offending line.
        near: String,
        /// What was wrong with the line.
        source: ParseError,
    },

    /// No scope with this name has been read.
    #[error("scope '{0}' is not found")]
    ScopeNotFound(String),

    /// The scope exists but does not define the key.
    #[error("key '{key}' is not found in scope '{scope}'")]
    KeyNotFound {
        /// Scope that was searched.
        scope: String,
        /// Missing key.
        key: String,
    },

    /// The value is not an integer.
    #[error("[{scope}] {key} = '{value}' is not an integer: {source}")]
    InvalidInt {
        /// Scope of the value.
        scope: String,
        /// Key of the value.
        key: String,
        /// Raw stored text.
        value: String,
        /// Underlying parse failure.
        source: ParseIntError,
    },

    /// The value is not a floating-point number.
    #[error("[{scope}] {key} = '{value}' is not a number: {source}")]
    InvalidFloat {
        /// Scope of the value.
        scope: String,
        /// Key of the value.
        key: String,
        /// Raw stored text.
        value: String,
        /// Underlying parse failure.
        source: ParseFloatError,
    },

    /// `dump` was called before any file was read in this session.
    #[error("nothing to dump: no config file has been read")]
    NothingRead,

    /// Attempt to raise the size limit above the hard ceiling.
    #[error("size limit {requested} exceeds maximum of {max} bytes")]
    SizeLimitTooLarge {
        /// Requested limit.
        requested: u64,
        /// Hard ceiling.
        max: u64,
    },
}

impl ConfigError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::TooLarge { .. } | Self::Write { .. } => ErrorKind::Io,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::ScopeNotFound(_) | Self::KeyNotFound { .. } => ErrorKind::Lookup,
            Self::InvalidInt { .. } | Self::InvalidFloat { .. } => ErrorKind::Conversion,
            Self::NothingRead | Self::SizeLimitTooLarge { .. } => ErrorKind::Precondition,
        }
    }

    /// Return `true` for scope or key lookup failures, the only errors a
    /// typed accessor replaces with its default.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::Lookup)
    }

    /// The line-level reason, if this is a parse error.
    #[must_use]
    pub const fn parse_reason(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
