//! Command: write the merged configuration to a file.
use anyhow::{Context as _, Result};

use crate::cli::{DumpOpts, GlobalOpts};
use crate::logging;

/// Read the files and dump the result to `opts.output`.
///
/// # Errors
///
/// Returns an error if a file fails to read or the dump cannot be written.
pub fn run(global: &GlobalOpts, opts: &DumpOpts) -> Result<()> {
    let store = super::load(global, &opts.input.files)?;

    logging::stage("Writing dump");
    store
        .dump(&opts.output)
        .with_context(|| format!("dumping to {}", opts.output.display()))?;
    tracing::info!(
        "{} scope(s) written to {}",
        store.scopes().len(),
        opts.output.display()
    );
    Ok(())
}
