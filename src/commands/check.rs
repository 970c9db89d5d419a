//! Command: parse config files and report the result.
use anyhow::Result;

use crate::cli::{FilesOpts, GlobalOpts};

/// Read every file and log a short summary.
///
/// # Errors
///
/// Returns the first read or parse error.
pub fn run(global: &GlobalOpts, opts: &FilesOpts) -> Result<()> {
    let store = super::load(global, &opts.files)?;

    for scope in store.scopes() {
        let keys = store.keys(&scope)?;
        tracing::debug!("[{scope}] {} key(s)", keys.len());
    }
    tracing::info!(
        "{} file(s) OK, {} scope(s)",
        store.sources().len(),
        store.scopes().len()
    );
    Ok(())
}
