//! Logging infrastructure for console output.
//!
//! The library only emits [`tracing`] events; the binary decides where they
//! go by calling [`init_subscriber`] once at startup.

mod subscriber;

pub use subscriber::init_subscriber;

/// Log a stage header (major section of a command).
pub fn stage(msg: &str) {
    tracing::info!(target: "sconf::stage", "{msg}");
}
