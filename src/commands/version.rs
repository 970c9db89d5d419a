//! Command: print version information.
use std::io::Write;

use anyhow::Result;

/// Version string: `SCONF_VERSION` from the build, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("SCONF_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the sconf version.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "sconf {}", version())?;
    Ok(())
}
