//! Command line layer: argument parsing (`args`) and the per-file dispatch
//! loop (`runner`). All of the line break handling lives in the library.
pub mod args;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;

/// One-line usage message printed for any invocation that doesn't parse.
pub fn usage(program: &str) -> String {
    format!("usage: {program} [ detect | dos | mac | unix ] <file>...")
}

/// Install a stderr `tracing` subscriber when `--log` is given.
pub fn init_logging(enabled: bool) {
    if enabled {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }
}
