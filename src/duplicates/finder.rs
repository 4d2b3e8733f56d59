//! Duplicate scan orchestration.
//!
//! `DuplicateFinder` owns a [`FinderConfig`] and runs the full pipeline:
//! validate the root, traverse and hash it under the configured
//! [`ScanPolicy`], fold hashed files into a [`DigestIndex`](super::DigestIndex),
//! and reduce the index to sorted duplicate groups plus a [`ScanSummary`].
//!
//! The three policies trade setup cost against parallelism differently but
//! share every other piece: the same walker classification, the same digest
//! routine, and the same single-threaded collector. They must therefore
//! produce identical groups for the same tree.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::scanner::Hasher;
use crate::sync::{TaskCounter, TaskLimiter};

use super::groups::DuplicateGroup;
use super::{fanout, pool};

/// Queue slots per worker for the pool policy's entry queue.
pub(crate) const QUEUE_SLOTS_PER_WORKER: usize = 8;

/// Default ceiling on concurrently active tasks for the bounded fan-out policy.
const DEFAULT_MAX_TASKS: usize = 32;

/// Strategy used to spread traversal and hashing across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Fixed worker pool fed from a bounded queue of discovered files.
    ///
    /// One thread walks the tree and pushes file entries; `workers` threads
    /// pop and hash them. A full queue blocks the walker, so memory stays
    /// bounded no matter how fast discovery outruns hashing.
    Pool,
    /// Unbounded recursive fan-out.
    ///
    /// Every subdirectory and every file becomes its own thread. Maximum
    /// parallelism, no admission control; deep or wide trees can spawn a
    /// very large number of threads.
    Fanout,
    /// Recursive fan-out with an admission ceiling.
    ///
    /// Structured exactly like [`ScanPolicy::Fanout`], but each task body
    /// draws a ticket from a fixed-capacity limiter before doing work, so at
    /// most `max_tasks` tasks are ever active at once.
    BoundedFanout,
}

impl std::fmt::Display for ScanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pool => "pool",
            Self::Fanout => "fanout",
            Self::BoundedFanout => "bounded-fanout",
        };
        f.write_str(name)
    }
}

/// Twice the available parallelism, so workers blocked on reads keep the
/// disks busy while others hash.
fn default_workers() -> usize {
    let cores = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    cores * 2
}

/// Configuration for [`DuplicateFinder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    /// Concurrency policy to run the scan under.
    pub policy: ScanPolicy,
    /// Number of hashing workers for the pool policy.
    pub workers: usize,
    /// Capacity of the pool policy's entry queue.
    pub queue_capacity: usize,
    /// Active-task ceiling for the bounded fan-out policy.
    pub max_tasks: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        let workers = default_workers();
        Self {
            policy: ScanPolicy::BoundedFanout,
            workers,
            queue_capacity: workers * QUEUE_SLOTS_PER_WORKER,
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }
}

impl FinderConfig {
    /// Set the concurrency policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the worker count for the pool policy.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the entry-queue capacity for the pool policy.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set the active-task ceiling for the bounded fan-out policy.
    #[must_use]
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks.max(1);
        self
    }
}

/// Shared tally of traversal progress, updated from whichever threads the
/// active policy runs.
///
/// Counters only feed the end-of-run summary, so relaxed ordering is enough.
#[derive(Debug, Default)]
pub(crate) struct ScanStats {
    files_seen: AtomicUsize,
    bytes_seen: AtomicU64,
    walk_errors: AtomicUsize,
    hash_errors: AtomicUsize,
}

impl ScanStats {
    pub(crate) fn record_file(&self, size: u64) {
        self.files_seen.fetch_add(1, Ordering::Relaxed);
        self.bytes_seen.fetch_add(size, Ordering::Relaxed);
    }

    pub(crate) fn record_walk_error(&self) {
        self.walk_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hash_error(&self) {
        self.hash_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn files_seen(&self) -> usize {
        self.files_seen.load(Ordering::Relaxed)
    }

    fn bytes_seen(&self) -> u64 {
        self.bytes_seen.load(Ordering::Relaxed)
    }

    fn walk_errors(&self) -> usize {
        self.walk_errors.load(Ordering::Relaxed)
    }

    fn hash_errors(&self) -> usize {
        self.hash_errors.load(Ordering::Relaxed)
    }
}

/// Summary statistics from one duplicate scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Non-empty regular files discovered by the traversal
    pub total_files: usize,
    /// Combined size of the discovered files in bytes
    pub total_bytes: u64,
    /// Files whose digest made it into the index
    pub hashed_files: usize,
    /// Directory entries that could not be read during traversal
    pub walk_errors: usize,
    /// Files that could not be opened or read for hashing
    pub hash_errors: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Total number of files across all duplicate groups
    pub duplicate_files: usize,
    /// Bytes occupied by redundant copies (all but one per group)
    pub wasted_bytes: u64,
    /// Peak number of concurrently live tasks, for the fan-out policies
    pub peak_active_tasks: Option<usize>,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Percentage of scanned bytes occupied by redundant copies.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
        }
    }

    /// Format the wasted byte count as a human-readable string.
    #[must_use]
    pub fn wasted_display(&self) -> String {
        format_size(self.wasted_bytes)
    }

    /// Format the total byte count as a human-readable string.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_size(self.total_bytes)
    }
}

/// Format a byte size as a human-readable string.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Errors that abort a scan before any traversal starts.
///
/// Failures on individual entries deeper in the tree are logged and counted
/// instead; only the root itself is load-bearing.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root directory exists but cannot be opened for reading.
    #[error("Cannot read directory {path}: {source}")]
    RootUnreadable {
        /// The root that was rejected
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Runs duplicate scans under a configured concurrency policy.
///
/// # Example
///
/// ```no_run
/// use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanPolicy};
/// use std::path::Path;
///
/// let config = FinderConfig::default().with_policy(ScanPolicy::Pool);
/// let finder = DuplicateFinder::new(config);
///
/// let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
///
/// println!("Found {} duplicate groups", summary.duplicate_groups);
/// println!("Wasted space: {}", summary.wasted_display());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<Hasher>,
}

impl DuplicateFinder {
    /// Create a new finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Arc::new(Hasher::default()),
        }
    }

    /// Create a new finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The configuration this finder runs with.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files under the given root.
    ///
    /// Returns the duplicate groups, sorted by member count (largest first)
    /// with ties broken by digest bytes, along with summary statistics. An
    /// empty vector means no file content appeared more than once.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root does not exist, is not a
    /// directory, or cannot be opened for reading. Unreadable entries below
    /// the root never fail the scan; they are logged, counted in the
    /// summary, and skipped.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        if !path.exists() {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        if !path.is_dir() {
            return Err(FinderError::NotADirectory(path.to_path_buf()));
        }
        // The traversal must be able to open the root at all; anything it
        // hits further down is survivable.
        if let Err(source) = std::fs::read_dir(path) {
            return Err(FinderError::RootUnreadable {
                path: path.to_path_buf(),
                source,
            });
        }

        log::info!(
            "Scanning {} with the {} policy",
            path.display(),
            self.config.policy
        );

        let stats = Arc::new(ScanStats::default());

        let (index, peak_active_tasks) = match self.config.policy {
            ScanPolicy::Pool => {
                let index = pool::run(path, &self.config, &self.hasher, &stats);
                (index, None)
            }
            ScanPolicy::Fanout => {
                let tasks = Arc::new(TaskCounter::new());
                let index = fanout::run(path, 0, &self.hasher, &stats, &tasks, None);
                (index, Some(tasks.peak()))
            }
            ScanPolicy::BoundedFanout => {
                let tasks = Arc::new(TaskCounter::new());
                let limiter = Arc::new(TaskLimiter::new(self.config.max_tasks));
                let index = fanout::run(
                    path,
                    self.config.max_tasks,
                    &self.hasher,
                    &stats,
                    &tasks,
                    Some(Arc::clone(&limiter)),
                );
                (index, Some(limiter.peak_in_use()))
            }
        };

        let hashed_files = index.path_count();
        let groups = index.into_duplicate_groups();

        let summary = ScanSummary {
            total_files: stats.files_seen(),
            total_bytes: stats.bytes_seen(),
            hashed_files,
            walk_errors: stats.walk_errors(),
            hash_errors: stats.hash_errors(),
            duplicate_groups: groups.len(),
            duplicate_files: groups.iter().map(DuplicateGroup::len).sum(),
            wasted_bytes: groups.iter().map(DuplicateGroup::wasted_bytes).sum(),
            peak_active_tasks,
            scan_duration: start_time.elapsed(),
        };

        log::info!(
            "Scan complete: {} files ({}) in {:.2?}, {} duplicate groups",
            summary.total_files,
            summary.total_display(),
            summary.scan_duration,
            summary.duplicate_groups
        );
        if summary.walk_errors > 0 || summary.hash_errors > 0 {
            log::warn!(
                "Skipped {} unreadable entries and {} unhashable files",
                summary.walk_errors,
                summary.hash_errors
            );
        }

        Ok((groups, summary))
    }
}
