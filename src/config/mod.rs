//! Scoped configuration files: line parsing, typed conversion, and the store.
pub mod convert;
pub mod line;
pub mod store;

pub use store::{MAX_FILE_SIZE, Store, StrictPolicy};
