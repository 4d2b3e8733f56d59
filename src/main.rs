//! dupescan - Concurrent Duplicate File Finder
//!
//! Entry point for the dupescan CLI binary.

use clap::Parser;
use dupescan::{cli::Cli, error::ExitCode, logging::init_logging};

fn main() {
    // clap exits with the usage code (2) itself on bad arguments.
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match dupescan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
