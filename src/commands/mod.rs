//! Subcommand orchestration for the `sconf` binary.
pub mod check;
pub mod dump;
pub mod get;
pub mod scopes;
pub mod show;
pub mod version;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Store;
use crate::logging;

/// Build a store configured from the global flags and read `files` into it,
/// in order.
///
/// # Errors
///
/// Returns an error if the size limit is out of range or any file fails to
/// read; the error names the file.
pub fn load(global: &GlobalOpts, files: &[PathBuf]) -> Result<Store> {
    let mut store = Store::new();
    store.set_strict_policy(global.strict_policy());
    store
        .set_size_limit(global.max_size)
        .context("applying --max-size")?;

    logging::stage("Reading configuration");
    for file in files {
        store
            .read(file)
            .with_context(|| format!("loading {}", file.display()))?;
        tracing::debug!("read {}", file.display());
    }
    tracing::debug!(
        "{} scope(s) from {} file(s)",
        store.scopes().len(),
        store.sources().len()
    );

    Ok(store)
}
