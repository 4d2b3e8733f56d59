//! Command-line interface definitions for dupescan.
//!
//! This module defines all CLI arguments and options using the clap derive
//! API. There is a single operation, scanning a directory tree, so the
//! interface is one positional root plus tuning knobs for the concurrency
//! policy and the report format.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory with the default bounded fan-out policy
//! dupescan ~/Downloads
//!
//! # Scan with the worker pool and an explicit worker count
//! dupescan --policy pool --workers 8 ~/Downloads
//!
//! # JSON output for scripting
//! dupescan --output json ~/Downloads
//!
//! # Verbose mode for debugging
//! dupescan -vv ~/Downloads
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::duplicates::{FinderConfig, ScanPolicy};

/// Concurrent duplicate file finder.
///
/// dupescan walks a directory tree, hashes every regular file with BLAKE3,
/// and reports groups of byte-identical files. The traversal and hashing
/// run under a selectable concurrency policy.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Concurrency policy to scan under
    #[arg(short, long, value_enum, default_value = "bounded-fanout")]
    pub policy: PolicyArg,

    /// Number of hashing workers for the pool policy
    ///
    /// Defaults to twice the available parallelism.
    #[arg(short, long, value_name = "N", value_parser = parse_count)]
    pub workers: Option<usize>,

    /// Capacity of the pool policy's file queue
    ///
    /// Defaults to eight slots per worker. A full queue blocks the
    /// traversal until a worker catches up.
    #[arg(long, value_name = "N", value_parser = parse_count)]
    pub queue_capacity: Option<usize>,

    /// Active-task ceiling for the bounded fan-out policy (default: 32)
    #[arg(long, value_name = "N", value_parser = parse_count)]
    pub max_tasks: Option<usize>,

    /// Output format (text for terminals, json for scripting)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Pretty-print the JSON report (no effect on text output)
    #[arg(long)]
    pub pretty: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Translate the parsed arguments into a finder configuration.
    ///
    /// Knobs the user left unset keep their defaults; the queue capacity
    /// tracks an explicit worker count unless it was itself overridden.
    #[must_use]
    pub fn to_finder_config(&self) -> FinderConfig {
        let mut config = FinderConfig::default().with_policy(self.policy.into());
        if let Some(workers) = self.workers {
            config = config
                .with_workers(workers)
                .with_queue_capacity(workers * crate::duplicates::finder::QUEUE_SLOTS_PER_WORKER);
        }
        if let Some(capacity) = self.queue_capacity {
            config = config.with_queue_capacity(capacity);
        }
        if let Some(max_tasks) = self.max_tasks {
            config = config.with_max_tasks(max_tasks);
        }
        config
    }
}

/// Concurrency policy as selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Fixed worker pool fed from a bounded queue
    Pool,
    /// One task per subdirectory and per file, unbounded
    Fanout,
    /// Fan-out capped by an active-task limiter
    BoundedFanout,
}

impl From<PolicyArg> for ScanPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Pool => ScanPolicy::Pool,
            PolicyArg::Fanout => ScanPolicy::Fanout,
            PolicyArg::BoundedFanout => ScanPolicy::BoundedFanout,
        }
    }
}

impl std::fmt::Display for PolicyArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyArg::Pool => write!(f, "pool"),
            PolicyArg::Fanout => write!(f, "fanout"),
            PolicyArg::BoundedFanout => write!(f, "bounded-fanout"),
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented text for terminals
    Text,
    /// JSON output for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a positive count argument.
///
/// # Errors
///
/// Returns an error if the value is not a number or is zero.
pub fn parse_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid count: '{s}'"))?;
    if value == 0 {
        return Err("Count must be at least 1".to_string());
    }
    Ok(value)
}
