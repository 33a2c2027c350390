//! `linebreak` CLI entrypoint.
//!
//! Parses the verb and file list, then hands off to `cli::run`. The process
//! always exits with status 0; failures are reported per file on stdout.

use std::{env, io, path::Path};

use clap::{error::ErrorKind, Parser};
use tracing::warn;

mod cli;

fn main() {
    let args = match cli::CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // Nothing sensible left to do if stdout is gone.
            let _ = err.print();
            return;
        }
        Err(_) => {
            println!("{}", cli::usage(&program_name()));
            return;
        }
    };

    cli::init_logging(args.log);
    if let Err(err) = cli::run(&args, &mut io::stdout().lock()) {
        warn!(%err, "failed to write report to stdout");
    }
}

fn program_name() -> String {
    env::args_os()
        .next()
        .as_deref()
        .and_then(|arg| Path::new(arg).file_name())
        .map_or_else(
            || "linebreak".to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
}
