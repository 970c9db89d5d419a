//! Command: list scope names.
use std::io::Write;

use anyhow::Result;

use crate::cli::{GlobalOpts, ScopesOpts};

/// Print the scope names defined by the files.
///
/// # Errors
///
/// Returns an error if a file fails to read or `out` cannot be written.
pub fn run(global: &GlobalOpts, opts: &ScopesOpts, out: &mut impl Write) -> Result<()> {
    let store = super::load(global, &opts.input.files)?;
    let scopes = store.scopes();

    if opts.json {
        serde_json::to_writer(&mut *out, &scopes)?;
        writeln!(out)?;
    } else {
        for scope in &scopes {
            writeln!(out, "{scope}")?;
        }
    }
    Ok(())
}
