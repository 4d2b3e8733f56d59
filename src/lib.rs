//! dupescan - Concurrent Duplicate File Finder
//!
//! Walks a directory tree, hashes every regular file with BLAKE3, and
//! reports groups of byte-identical files. Traversal and hashing run under
//! a selectable concurrency policy: a fixed worker pool fed from a bounded
//! queue, an unbounded recursive fan-out, or the same fan-out capped by an
//! active-task limiter. All three produce identical groups; they differ
//! only in how the work is spread across threads.

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod sync;

use std::io;

use crate::cli::{Cli, OutputFormat};
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{JsonReport, TextReport};

/// Run one scan as described by the parsed command line and write the
/// report to stdout.
///
/// Returns the exit code the process should finish with. A scan that finds
/// no duplicates is still a success; it just prints nothing in text mode.
///
/// # Errors
///
/// Returns fatal errors only: an invalid or unreadable root, or a failure
/// writing the report. Unreadable entries inside the tree are logged,
/// counted in the summary, and skipped.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let finder = DuplicateFinder::new(cli.to_finder_config());
    let (groups, summary) = finder.find_duplicates(&cli.root)?;

    let mut stdout = io::stdout().lock();
    match cli.output {
        OutputFormat::Text => TextReport::new(&groups).write_to(&mut stdout)?,
        OutputFormat::Json => JsonReport::new(&groups, &summary).write_to(&mut stdout, cli.pretty)?,
    }

    Ok(ExitCode::Success)
}
