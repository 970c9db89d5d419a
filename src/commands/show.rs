//! Command: print the merged configuration.
use std::io::Write;

use anyhow::Result;

use crate::cli::{GlobalOpts, ShowOpts};

/// Print the store as config text or pretty JSON.
///
/// # Errors
///
/// Returns an error if a file fails to read or `out` cannot be written.
pub fn run(global: &GlobalOpts, opts: &ShowOpts, out: &mut impl Write) -> Result<()> {
    let store = super::load(global, &opts.input.files)?;

    if opts.json {
        serde_json::to_writer_pretty(&mut *out, &store)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", store.render())?;
    }
    Ok(())
}
