//! `sconf` command-line entry point.
use std::io::{self, Write as _};

use anyhow::Result;
use clap::Parser;

use sconf::cli::{Cli, Command};
use sconf::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(args.verbose);

    let mut out = io::stdout().lock();
    match args.command {
        Command::Check(opts) => commands::check::run(&args.global, &opts),
        Command::Scopes(opts) => commands::scopes::run(&args.global, &opts, &mut out),
        Command::Get(opts) => commands::get::run(&args.global, &opts, &mut out),
        Command::Show(opts) => commands::show::run(&args.global, &opts, &mut out),
        Command::Dump(opts) => commands::dump::run(&args.global, &opts),
        Command::Version => commands::version::run(&mut out),
    }?;
    out.flush()?;
    Ok(())
}
