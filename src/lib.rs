//! Minimal scoped configuration-file reader.
//!
//! Reads a TOML-like format of `[scope]` headers and `key = value` lines
//! into an in-memory [`Store`](config::Store) and serves typed lookups with
//! optional defaults:
//!
//! ```
//! use sconf::config::Store;
//!
//! let mut store = Store::new();
//! store.read_str("; settings\n[db]\nport = 5432\nssl = yes\n").unwrap();
//! assert_eq!(store.get_int("db", "port", None).unwrap(), 5432);
//! assert!(store.get_bool("db", "ssl", Some(false)).unwrap());
//! ```
//!
//! The public API is organised into:
//!
//! - **[`config`]** — line parser, conversions, and the store
//! - **[`error`]** — typed errors returned by the store
//! - **[`cli`]**, **[`commands`]**, **[`logging`]** — the `sconf` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
