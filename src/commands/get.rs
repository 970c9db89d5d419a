//! Command: print one typed value.
use std::io::Write;

use anyhow::{Context as _, Result};

use crate::cli::{GetOpts, GlobalOpts, ValueType};
use crate::config::{Store, convert};

/// Look up `opts.key` in `opts.scope` and print it converted to the
/// requested type.
///
/// # Errors
///
/// Returns an error if a file fails to read, the value is missing and no
/// default was given, or the value (or default) does not convert.
pub fn run(global: &GlobalOpts, opts: &GetOpts, out: &mut impl Write) -> Result<()> {
    let store = super::load(global, &opts.input.files)?;
    let rendered = lookup(&store, opts)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

/// Resolve the value as text, going through the typed accessor so that
/// conversion errors surface the same way they would for library users.
///
/// # Errors
///
/// Returns the accessor's error, or an error if the default does not convert.
pub fn lookup(store: &Store, opts: &GetOpts) -> Result<String> {
    let (scope, key) = (opts.scope.as_str(), opts.key.as_str());
    let default = opts.default.as_deref();

    let value = match opts.value_type {
        ValueType::Str => store.get_str(scope, key, default)?,
        ValueType::Int => {
            let default = default
                .map(convert::parse_int)
                .transpose()
                .context("--default is not an integer")?;
            store.get_int(scope, key, default)?.to_string()
        }
        ValueType::Float => {
            let default = default
                .map(convert::parse_float)
                .transpose()
                .context("--default is not a number")?;
            store.get_float(scope, key, default)?.to_string()
        }
        ValueType::Bool => {
            let default = default.map(convert::parse_bool);
            store.get_bool(scope, key, default)?.to_string()
        }
    };
    Ok(value)
}
