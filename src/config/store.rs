//! The scoped key/value store and its session lifecycle.
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::convert;
use super::line::{self, Line};
use crate::error::{ConfigError, ParseError};

/// Hard ceiling for [`Store::set_size_limit`], and the default limit.
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Origin reported in parse errors for [`Store::read_str`] input.
const STRING_ORIGIN: &str = "<string>";

type Pairs = BTreeMap<String, String>;

fn log_abort(err: &ConfigError) {
    tracing::debug!("read aborted: {err}");
}

/// Which redefinitions are rejected while reading.
///
/// The two checks are independent; [`Store::toggle_strict_mode`] flips both
/// at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrictPolicy {
    /// Reject a `[scope]` header naming a scope that already exists.
    pub scopes: bool,
    /// Reject a key already assigned in its scope.
    pub keys: bool,
}

impl StrictPolicy {
    /// Overwrite and merge silently.
    pub const LENIENT: Self = Self {
        scopes: false,
        keys: false,
    };

    /// Reject both duplicate scopes and duplicate keys.
    pub const STRICT: Self = Self {
        scopes: true,
        keys: true,
    };

    /// Return `true` if any check is enabled.
    #[must_use]
    pub const fn is_strict(self) -> bool {
        self.scopes || self.keys
    }
}

/// Parsed configuration for one session: scopes of key/value pairs, the list
/// of files they came from, and the reading policy.
///
/// The store has no internal locking. Share it between threads behind a
/// `Mutex` if needed.
///
/// # Examples
///
/// ```
/// use sconf::config::Store;
///
/// let mut store = Store::new();
/// store.read_str("[server]\nport = 0x1F90\ndebug = no\n").unwrap();
///
/// assert_eq!(store.get_int("server", "port", None).unwrap(), 8080);
/// assert!(!store.get_bool("server", "debug", None).unwrap());
/// assert_eq!(store.get_str("server", "host", Some("localhost")).unwrap(), "localhost");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Store {
    scopes: BTreeMap<String, Pairs>,
    #[serde(skip)]
    sources: Vec<PathBuf>,
    #[serde(skip)]
    strict: StrictPolicy,
    #[serde(skip)]
    size_limit: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Create an empty store with lenient policy and the maximum size limit.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scopes: BTreeMap::new(),
            sources: Vec::new(),
            strict: StrictPolicy::LENIENT,
            size_limit: MAX_FILE_SIZE,
        }
    }

    /// Discard all scopes and the list of read files, starting a new session.
    ///
    /// The strict policy and size limit are kept.
    pub fn clear(&mut self) {
        self.scopes.clear();
        self.sources.clear();
    }

    /// Flip strict mode and return whether it was active before.
    ///
    /// Strict mode counts as active when either check is enabled; the new
    /// policy enables both checks or neither.
    pub const fn toggle_strict_mode(&mut self) -> bool {
        let was_strict = self.strict.is_strict();
        self.strict = if was_strict {
            StrictPolicy::LENIENT
        } else {
            StrictPolicy::STRICT
        };
        was_strict
    }

    /// Replace the strict policy, returning the previous one.
    pub const fn set_strict_policy(&mut self, policy: StrictPolicy) -> StrictPolicy {
        let previous = self.strict;
        self.strict = policy;
        previous
    }

    /// Current strict policy.
    #[must_use]
    pub const fn strict_policy(&self) -> StrictPolicy {
        self.strict
    }

    /// Lower (or restore) the largest file size [`read`](Self::read) accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SizeLimitTooLarge`] if `bytes` exceeds
    /// [`MAX_FILE_SIZE`]; the limit is left unchanged.
    pub fn set_size_limit(&mut self, bytes: u64) -> Result<(), ConfigError> {
        if bytes > MAX_FILE_SIZE {
            return Err(ConfigError::SizeLimitTooLarge {
                requested: bytes,
                max: MAX_FILE_SIZE,
            });
        }
        self.size_limit = bytes;
        Ok(())
    }

    /// Current size limit in bytes.
    #[must_use]
    pub const fn size_limit(&self) -> u64 {
        self.size_limit
    }

    /// Read and parse a config file into the store.
    ///
    /// Pairs applied before a failing line stay in the store. On success the
    /// path is recorded for the [`dump`](Self::dump) header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be opened or read or is
    /// not UTF-8, [`ConfigError::TooLarge`] if its reported size or the bytes
    /// actually read exceed the size limit (nothing is parsed in that case), or
    /// [`ConfigError::Parse`] for the first bad line.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.read_file(path.as_ref()).inspect_err(log_abort)
    }

    fn read_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let too_large = |size| ConfigError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: self.size_limit,
        };

        let file = File::open(path).map_err(io_err)?;
        let size = file.metadata().map_err(io_err)?.len();
        if size > self.size_limit {
            return Err(too_large(size));
        }

        // Pipes and devices report no useful size, so the read itself is capped.
        let mut bytes = Vec::new();
        file.take(self.size_limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(io_err)?;
        let read = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if read > self.size_limit {
            return Err(too_large(read));
        }
        let content = String::from_utf8(bytes)
            .map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        tracing::debug!("reading {} ({read} bytes)", path.display());
        let origin = path.display().to_string();
        self.apply_lines(&origin, content.lines().map(|l| Ok(l.to_string())))?;

        self.sources.push(path.to_path_buf());
        Ok(())
    }

    /// Parse in-memory config text into the store.
    ///
    /// Behaves like [`read`](Self::read) without the size limit and without
    /// recording a source file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for the first bad line.
    pub fn read_str(&mut self, content: &str) -> Result<(), ConfigError> {
        self.apply_lines(STRING_ORIGIN, content.lines().map(|l| Ok(l.to_string())))
            .inspect_err(log_abort)
    }

    fn apply_lines<I>(&mut self, origin: &str, lines: I) -> Result<(), ConfigError>
    where
        I: Iterator<Item = Result<String, ConfigError>>,
    {
        let mut current: Option<String> = None;
        let mut applied = 0usize;

        for (idx, raw) in lines.enumerate() {
            let raw = raw?;
            let parse_err = |source| ConfigError::Parse {
                origin: origin.to_string(),
                line: idx + 1,
                near: line::snippet(&raw),
                source,
            };

            match line::parse_line(&raw, current.as_deref()).map_err(parse_err)? {
                Line::Ignorable => {}
                Line::Scope(name) => {
                    self.declare_scope(name).map_err(parse_err)?;
                    current = Some(name.to_string());
                }
                Line::Pair { key, value } => {
                    let scope = current.as_deref().unwrap_or_default();
                    self.assign(scope, key, value).map_err(parse_err)?;
                    applied += 1;
                }
            }
        }

        tracing::debug!("{origin}: {applied} value(s) applied");
        Ok(())
    }

    fn declare_scope(&mut self, name: &str) -> Result<(), ParseError> {
        if self.scopes.contains_key(name) {
            if self.strict.scopes {
                return Err(ParseError::DuplicateScope(name.to_string()));
            }
            tracing::trace!("re-entering scope [{name}]");
        } else {
            tracing::trace!("new scope [{name}]");
            self.scopes.insert(name.to_string(), Pairs::new());
        }
        Ok(())
    }

    fn assign(&mut self, scope: &str, key: &str, value: String) -> Result<(), ParseError> {
        let pairs = self.scopes.entry(scope.to_string()).or_default();
        if self.strict.keys && pairs.contains_key(key) {
            return Err(ParseError::DuplicateKey(key.to_string()));
        }
        tracing::trace!("[{scope}] {key} = {value:?}");
        pairs.insert(key.to_string(), value);
        Ok(())
    }

    /// Names of all known scopes.
    #[must_use]
    pub fn scopes(&self) -> Vec<String> {
        self.scopes.keys().cloned().collect()
    }

    /// Keys defined in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ScopeNotFound`] if the scope is unknown.
    pub fn keys(&self, scope: &str) -> Result<Vec<String>, ConfigError> {
        self.pairs(scope).map(|p| p.keys().cloned().collect())
    }

    /// Files successfully read in this session, in read order.
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Return `true` if no scope has been read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn pairs(&self, scope: &str) -> Result<&Pairs, ConfigError> {
        self.scopes
            .get(scope)
            .ok_or_else(|| ConfigError::ScopeNotFound(scope.to_string()))
    }

    /// Raw stored text for `key` in `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ScopeNotFound`] or [`ConfigError::KeyNotFound`].
    pub fn value(&self, scope: &str, key: &str) -> Result<&str, ConfigError> {
        self.pairs(scope)?
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::KeyNotFound {
                scope: scope.to_string(),
                key: key.to_string(),
            })
    }

    /// Look up a value, falling back to `default` when it is missing.
    ///
    /// `Ok(Err(default))` means the default was used.
    fn lookup<T>(
        &self,
        scope: &str,
        key: &str,
        default: Option<T>,
    ) -> Result<Result<&str, T>, ConfigError> {
        match (self.value(scope, key), default) {
            (Ok(raw), _) => Ok(Ok(raw)),
            (Err(e), Some(default)) if e.is_not_found() => Ok(Err(default)),
            (Err(e), _) => Err(e),
        }
    }

    /// String value, or `default` if the scope or key is missing.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when there is no default.
    pub fn get_str(
        &self,
        scope: &str,
        key: &str,
        default: Option<&str>,
    ) -> Result<String, ConfigError> {
        Ok(match self.lookup(scope, key, default)? {
            Ok(raw) => raw.to_string(),
            Err(default) => default.to_string(),
        })
    }

    /// Integer value with base prefix support (see [`convert::parse_int`]),
    /// or `default` if the scope or key is missing.
    ///
    /// Narrow with `i32::try_from` and friends when a smaller type is needed.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when there is no default, or
    /// [`ConfigError::InvalidInt`] when the stored text is not an integer.
    pub fn get_int(
        &self,
        scope: &str,
        key: &str,
        default: Option<i64>,
    ) -> Result<i64, ConfigError> {
        match self.lookup(scope, key, default)? {
            Ok(raw) => convert::parse_int(raw).map_err(|source| ConfigError::InvalidInt {
                scope: scope.to_string(),
                key: key.to_string(),
                value: raw.to_string(),
                source,
            }),
            Err(default) => Ok(default),
        }
    }

    /// Floating-point value, or `default` if the scope or key is missing.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when there is no default, or
    /// [`ConfigError::InvalidFloat`] when the stored text is not a number.
    pub fn get_float(
        &self,
        scope: &str,
        key: &str,
        default: Option<f64>,
    ) -> Result<f64, ConfigError> {
        match self.lookup(scope, key, default)? {
            Ok(raw) => convert::parse_float(raw).map_err(|source| ConfigError::InvalidFloat {
                scope: scope.to_string(),
                key: key.to_string(),
                value: raw.to_string(),
                source,
            }),
            Err(default) => Ok(default),
        }
    }

    /// Boolean value (see [`convert::parse_bool`]), or `default` if the scope
    /// or key is missing.
    ///
    /// # Errors
    ///
    /// Returns the lookup error when there is no default.
    pub fn get_bool(
        &self,
        scope: &str,
        key: &str,
        default: Option<bool>,
    ) -> Result<bool, ConfigError> {
        Ok(match self.lookup(scope, key, default)? {
            Ok(raw) => convert::parse_bool(raw),
            Err(default) => default,
        })
    }

    /// Render the store in the config file format.
    ///
    /// Values are written as stored; control characters produced by escape
    /// sequences are not escaped again.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("# Generated dump of:\n");
        for source in &self.sources {
            let _ = writeln!(out, "# {}", source.display());
        }
        out.push('\n');

        for (scope, pairs) in &self.scopes {
            let _ = writeln!(out, "[{scope}]");
            for (key, value) in pairs {
                let _ = writeln!(out, "  {key} = {value}");
            }
        }
        out
    }

    /// Write [`render`](Self::render) output to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NothingRead`] if no file was read in this
    /// session, or [`ConfigError::Write`] if the file cannot be written.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if self.sources.is_empty() {
            return Err(ConfigError::NothingRead);
        }
        std::fs::write(path, self.render()).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            "dumped {} scope(s) to {}",
            self.scopes.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn store_from(content: &str) -> Store {
        let mut store = Store::new();
        store.read_str(content).expect("test data should parse");
        store
    }

    fn reason(err: &ConfigError) -> &ParseError {
        err.parse_reason().expect("should be a parse error")
    }

    #[test]
    fn lists_two_scopes() {
        let store = store_from("[alpha]\na = 1\n\n[beta]\nb = 2\n");
        assert_eq!(store.scopes(), ["alpha", "beta"]);
    }

    #[test]
    fn header_without_pairs_creates_scope() {
        let store = store_from("[empty]\n");
        assert_eq!(store.scopes(), ["empty"]);
        assert!(store.keys("empty").unwrap().is_empty());
    }

    #[test]
    fn string_lookup_and_not_found_errors() {
        let store = store_from("[s]\nk = v");
        assert_eq!(store.get_str("s", "k", None).unwrap(), "v");

        let missing_key = store.get_str("s", "missing", None).unwrap_err();
        assert!(matches!(missing_key, ConfigError::KeyNotFound { .. }));
        assert!(missing_key.to_string().contains("is not found in scope"));

        let missing_scope = store.get_str("missing", "k", None).unwrap_err();
        assert!(matches!(missing_scope, ConfigError::ScopeNotFound(_)));
    }

    #[test]
    fn escapes_are_resolved() {
        let store = store_from("[s]\nk = a\\tb\\nc\n");
        assert_eq!(store.value("s", "k").unwrap(), "a\tb\nc");
    }

    #[test]
    fn lenient_mode_merges_and_overwrites() {
        let store = store_from("[s]\nk = 1\nx = a\n[t]\n[s]\nk = 2\n");
        assert_eq!(store.get_int("s", "k", None).unwrap(), 2);
        assert_eq!(store.get_str("s", "x", None).unwrap(), "a");
        assert_eq!(store.scopes(), ["s", "t"]);
    }

    #[test]
    fn strict_mode_rejects_duplicate_scope() {
        let mut store = Store::new();
        assert!(!store.toggle_strict_mode());
        let err = store.read_str("[s]\nk = 1\n[s]\n").unwrap_err();
        assert_eq!(reason(&err), &ParseError::DuplicateScope("s".to_string()));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn strict_mode_rejects_duplicate_key() {
        let mut store = Store::new();
        store.toggle_strict_mode();
        let err = store.read_str("[s]\nk = 1\nk = 2\n").unwrap_err();
        assert_eq!(reason(&err), &ParseError::DuplicateKey("k".to_string()));
        // no rollback: the first assignment stays
        assert_eq!(store.get_int("s", "k", None).unwrap(), 1);
    }

    #[test]
    fn toggle_returns_previous_state() {
        let mut store = Store::new();
        assert!(!store.toggle_strict_mode());
        assert_eq!(store.strict_policy(), StrictPolicy::STRICT);
        assert!(store.toggle_strict_mode());
        assert_eq!(store.strict_policy(), StrictPolicy::LENIENT);
    }

    #[test]
    fn toggle_from_partial_policy_disables_everything() {
        let mut store = Store::new();
        store.set_strict_policy(StrictPolicy {
            scopes: false,
            keys: true,
        });
        assert!(store.toggle_strict_mode());
        assert_eq!(store.strict_policy(), StrictPolicy::LENIENT);
    }

    #[test]
    fn strict_checks_are_independent() {
        let mut store = Store::new();
        let previous = store.set_strict_policy(StrictPolicy {
            scopes: false,
            keys: true,
        });
        assert_eq!(previous, StrictPolicy::LENIENT);
        store
            .read_str("[s]\na = 1\n[s]\nb = 2\n")
            .expect("reopening a scope is allowed");
        assert!(store.read_str("[s]\na = 3\n").is_err());

        let mut store = Store::new();
        store.set_strict_policy(StrictPolicy {
            scopes: true,
            keys: false,
        });
        store
            .read_str("[s]\na = 1\na = 2\n")
            .expect("reassigning a key is allowed");
        assert_eq!(store.get_int("s", "a", None).unwrap(), 2);
        assert!(store.read_str("[s]\n").is_err());
    }

    #[test]
    fn expression_without_scope_regardless_of_mode() {
        for strict in [false, true] {
            let mut store = Store::new();
            if strict {
                store.toggle_strict_mode();
            }
            let err = store.read_str("# header\nk = v\n[s]\n").unwrap_err();
            assert_eq!(reason(&err), &ParseError::ExpressionWithoutScope);
            assert!(err.to_string().starts_with("<string>: line 2:"));
        }
    }

    #[test]
    fn scope_does_not_carry_into_next_read() {
        let mut store = store_from("[s]\na = 1\n");
        let err = store.read_str("b = 2\n").unwrap_err();
        assert_eq!(reason(&err), &ParseError::ExpressionWithoutScope);
    }

    #[test]
    fn defaults_replace_missing_values() {
        let store = store_from("[s]\nk = v\n");
        assert_eq!(store.get_int("missing", "k", Some(42)).unwrap(), 42);
        assert_eq!(store.get_float("s", "missing", Some(0.5)).unwrap(), 0.5);
        assert!(store.get_bool("s", "missing", Some(true)).unwrap());
        assert_eq!(store.get_str("s", "missing", Some("d")).unwrap(), "d");
        assert!(store.get_int("s", "missing", None).is_err());
    }

    #[test]
    fn default_does_not_hide_conversion_errors() {
        let store = store_from("[s]\nk = v\n");
        let err = store.get_int("s", "k", Some(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        let err = store.get_float("s", "k", Some(1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFloat { .. }));
    }

    #[test]
    fn typed_values() {
        let store = store_from(
            "[n]\nhex = 0x10\nneg = -7\npi = 3.25\non = yes\noff = FALSE\nnone = none\n",
        );
        assert_eq!(store.get_int("n", "hex", None).unwrap(), 16);
        assert_eq!(store.get_int("n", "neg", None).unwrap(), -7);
        assert_eq!(store.get_float("n", "pi", None).unwrap(), 3.25);
        assert!(store.get_bool("n", "on", None).unwrap());
        assert!(!store.get_bool("n", "off", None).unwrap());
        assert!(!store.get_bool("n", "none", None).unwrap());
    }

    #[test]
    fn narrowing_is_left_to_caller() {
        let store = store_from("[n]\nbig = 70000\n");
        let big = store.get_int("n", "big", None).unwrap();
        assert!(i16::try_from(big).is_err());
        assert_eq!(i32::try_from(big).unwrap(), 70_000);
    }

    #[test]
    fn size_limit_cannot_be_raised() {
        let mut store = Store::new();
        store.set_size_limit(1024).expect("lowering is allowed");
        assert_eq!(store.size_limit(), 1024);
        store.set_size_limit(MAX_FILE_SIZE).expect("restoring is allowed");
        let err = store.set_size_limit(MAX_FILE_SIZE + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(store.size_limit(), MAX_FILE_SIZE);
    }

    #[test]
    fn clear_keeps_settings() {
        let mut store = store_from("[s]\nk = v\n");
        store.toggle_strict_mode();
        store.set_size_limit(10).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.sources().is_empty());
        assert!(store.strict_policy().is_strict());
        assert_eq!(store.size_limit(), 10);
    }

    #[test]
    fn dump_requires_a_read_file() {
        let store = store_from("[s]\nk = v\n");
        let err = store.dump("unused.conf").unwrap_err();
        assert!(matches!(err, ConfigError::NothingRead));
    }

    #[test]
    fn render_writes_sorted_scopes() {
        let store = store_from("[b]\ny = 2\nx = 1\n[a]\nz = 0\n");
        insta::assert_snapshot!(store.render(), @r"
        # Generated dump of:

        [a]
          z = 0
        [b]
          x = 1
          y = 2
        ");
    }

    #[test]
    fn serializes_as_nested_map() {
        let store = store_from("[s]\nk = v\n");
        let json = serde_json::to_string(&store).expect("store should serialize");
        assert_eq!(json, r#"{"s":{"k":"v"}}"#);
    }

    #[test]
    fn store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();
    }
}
