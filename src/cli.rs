use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{MAX_FILE_SIZE, StrictPolicy};

/// Top-level CLI entry point for the scoped configuration reader.
#[derive(Parser, Debug)]
#[command(
    name = "sconf",
    about = "Read, query and dump scoped configuration files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Reject duplicate scopes and duplicate keys
    #[arg(short, long, global = true)]
    pub strict: bool,

    /// Reject only duplicate scope headers
    #[arg(long, global = true, conflicts_with = "strict")]
    pub strict_scopes: bool,

    /// Reject only duplicate keys within a scope
    #[arg(long, global = true, conflicts_with = "strict")]
    pub strict_keys: bool,

    /// Largest config file to accept, in bytes
    #[arg(long, global = true, default_value_t = MAX_FILE_SIZE)]
    pub max_size: u64,
}

impl GlobalOpts {
    /// Strict policy selected by the flags.
    #[must_use]
    pub const fn strict_policy(&self) -> StrictPolicy {
        if self.strict {
            StrictPolicy::STRICT
        } else {
            StrictPolicy {
                scopes: self.strict_scopes,
                keys: self.strict_keys,
            }
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse config files and report problems
    Check(FilesOpts),
    /// List scopes defined by config files
    Scopes(ScopesOpts),
    /// Print a single typed value
    Get(GetOpts),
    /// Print the merged configuration
    Show(ShowOpts),
    /// Write the merged configuration to a file
    Dump(DumpOpts),
    /// Print version information
    Version,
}

/// Config files to read, in order.
#[derive(Args, Debug, Clone)]
pub struct FilesOpts {
    /// Config files; later files override earlier ones
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Options for the `scopes` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ScopesOpts {
    #[command(flatten)]
    pub input: FilesOpts,

    /// Print a JSON array instead of one name per line
    #[arg(long)]
    pub json: bool,
}

/// Type a value is converted to by `get`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueType {
    /// Raw string.
    #[default]
    Str,
    /// 64-bit integer with base prefixes.
    Int,
    /// Double-precision float.
    Float,
    /// Boolean with the permissive truthy rule.
    Bool,
}

/// Options for the `get` subcommand.
#[derive(Args, Debug, Clone)]
pub struct GetOpts {
    #[command(flatten)]
    pub input: FilesOpts,

    /// Scope to look in
    #[arg(long)]
    pub scope: String,

    /// Key to look up
    #[arg(long)]
    pub key: String,

    /// Convert the value to this type
    #[arg(long = "type", value_enum, default_value_t)]
    pub value_type: ValueType,

    /// Value to print when the scope or key is missing
    #[arg(long)]
    pub default: Option<String>,
}

/// Options for the `show` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ShowOpts {
    #[command(flatten)]
    pub input: FilesOpts,

    /// Print JSON instead of the config format
    #[arg(long)]
    pub json: bool,
}

/// Options for the `dump` subcommand.
#[derive(Args, Debug, Clone)]
pub struct DumpOpts {
    #[command(flatten)]
    pub input: FilesOpts,

    /// Destination file
    #[arg(short, long)]
    pub output: PathBuf,
}
