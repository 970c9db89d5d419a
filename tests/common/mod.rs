// Shared helpers for integration tests.
//
// Provides a temporary directory for config files so each test reads and
// dumps in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sconf::config::Store;

/// An isolated directory of config files backed by a [`tempfile::TempDir`].
///
/// The directory is deleted when dropped.
pub struct TestDir {
    /// Temporary directory holding the files.
    pub root: tempfile::TempDir,
}

impl TestDir {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path of `name` inside the directory (the file need not exist).
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Write `content` to `name` and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write config file");
        path
    }

    /// Write raw bytes to `name` and return its path.
    pub fn write_bytes(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("write config file");
        path
    }
}

/// Read `paths` into a fresh lenient store, panicking on failure.
pub fn read_all<P: AsRef<Path>>(paths: &[P]) -> Store {
    let mut store = Store::new();
    for path in paths {
        store.read(path).expect("config should read");
    }
    store
}

/// Flatten a store into sorted `(scope, key, value)` triples.
pub fn triples(store: &Store) -> Vec<(String, String, String)> {
    let mut out = Vec::new();
    for scope in store.scopes() {
        for key in store.keys(&scope).expect("listed scope exists") {
            let value = store.get_str(&scope, &key, None).expect("listed key exists");
            out.push((scope.clone(), key, value));
        }
    }
    out
}
