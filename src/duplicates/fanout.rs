//! Recursive fan-out scan policies.
//!
//! Every subdirectory becomes a traversal task and every file a hashing
//! task, each on its own thread. A shared [`TaskCounter`] tracks how many
//! tasks are still live; the coordinator blocks on it until the whole tree
//! has quiesced. Passing a [`TaskLimiter`] turns the unbounded variant into
//! the bounded one: each task body draws a ticket before doing any work, so
//! at most `capacity` tasks are active at once while the rest sit parked.
//!
//! Two ordering rules keep the run sound. A task is registered with the
//! counter by its parent *before* its thread spawns, so the count can never
//! touch zero while work is still being created. And limiter tickets are
//! drawn inside the spawned task body, never by the parent: a child blocked
//! on admission holds no ticket, so a saturated limiter parks children
//! without deadlocking the parents that spawned them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Sender};

use super::finder::ScanStats;
use super::index::{collect, DigestIndex, HashedFile};
use crate::scanner::{FileEntry, Hasher, WalkedEntry, Walker};
use crate::sync::{TaskCounter, TaskGuard, TaskLimiter};

/// State shared by every task in one fan-out run.
///
/// The result sender lives in here on purpose: the collector's input closes
/// when the last clone of this struct drops, which happens only after the
/// final task finishes and the coordinator releases its own handle.
struct FanoutRun {
    hasher: Arc<Hasher>,
    results: Sender<HashedFile>,
    tasks: Arc<TaskCounter>,
    limiter: Option<Arc<TaskLimiter>>,
    stats: Arc<ScanStats>,
}

/// Scan `root` by fanning a task out per subdirectory and per file.
///
/// `results_capacity` sizes the fan-in channel to the collector; zero makes
/// it a rendezvous channel. A `limiter` caps concurrently active tasks.
pub(crate) fn run(
    root: &Path,
    results_capacity: usize,
    hasher: &Arc<Hasher>,
    stats: &Arc<ScanStats>,
    tasks: &Arc<TaskCounter>,
    limiter: Option<Arc<TaskLimiter>>,
) -> DigestIndex {
    let (results_tx, results_rx) = bounded::<HashedFile>(results_capacity);
    let collector = thread::spawn(move || collect(results_rx));

    let run = Arc::new(FanoutRun {
        hasher: Arc::clone(hasher),
        results: results_tx,
        tasks: Arc::clone(tasks),
        limiter,
        stats: Arc::clone(stats),
    });

    // The root task is registered before it spawns, like every other task.
    let root_guard = TaskGuard::register(tasks);
    spawn_walk(root.to_path_buf(), Arc::clone(&run), root_guard);

    tasks.wait();

    // Every task has finished; dropping the coordinator's handle releases
    // the last result sender and closes the collector's input.
    drop(run);

    collector.join().expect("collector thread panicked")
}

fn spawn_walk(dir: PathBuf, run: Arc<FanoutRun>, guard: TaskGuard) {
    thread::spawn(move || walk_task(&dir, &run, guard));
}

fn spawn_hash(entry: FileEntry, run: Arc<FanoutRun>, guard: TaskGuard) {
    thread::spawn(move || hash_task(entry, &run, guard));
}

/// Traverse one directory level, spawning a child task per entry.
fn walk_task(dir: &Path, run: &Arc<FanoutRun>, guard: TaskGuard) {
    // Dropped on every exit path, marking this task finished.
    let _guard = guard;
    let _ticket = run.limiter.as_ref().map(|l| Arc::clone(l).acquire());

    let walker = Walker::new(dir);
    for result in walker.one_level() {
        match result {
            Ok(WalkedEntry::Directory(subdir)) => {
                let child = TaskGuard::register(&run.tasks);
                spawn_walk(subdir, Arc::clone(run), child);
            }
            Ok(WalkedEntry::File(entry)) => {
                run.stats.record_file(entry.size);
                let child = TaskGuard::register(&run.tasks);
                spawn_hash(entry, Arc::clone(run), child);
            }
            // The walker already logged the entry.
            Err(_) => run.stats.record_walk_error(),
        }
    }
}

/// Hash one file and forward the digest to the collector.
fn hash_task(entry: FileEntry, run: &Arc<FanoutRun>, guard: TaskGuard) {
    let _guard = guard;
    let _ticket = run.limiter.as_ref().map(|l| Arc::clone(l).acquire());

    match run.hasher.digest_file(&entry.path) {
        Ok(digest) => {
            let record = HashedFile {
                digest,
                path: entry.path,
                size: entry.size,
            };
            if run.results.send(record).is_err() {
                log::error!("Collector exited early; dropping a result");
            }
        }
        Err(e) => {
            run.stats.record_hash_error();
            log::warn!("Skipping {}: {e}", entry.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn make_file(dir: &Path, name: &str, content: &[u8]) {
        let mut file = File::create(dir.join(name)).expect("create test file");
        file.write_all(content).expect("write test file");
    }

    /// Four levels deep, one file per level plus duplicates at the ends.
    fn create_deep_dir() -> TempDir {
        let dir = TempDir::new().expect("create temp dir");
        let mut current = dir.path().to_path_buf();
        for level in 0..4 {
            make_file(&current, &format!("file{level}"), b"shared content");
            current = current.join(format!("level{level}"));
            fs::create_dir(&current).expect("create level dir");
        }
        make_file(&current, "leaf", b"leaf content");
        dir
    }

    fn run_fanout(root: &Path, limiter: Option<Arc<TaskLimiter>>) -> (DigestIndex, usize) {
        let hasher = Arc::new(Hasher::default());
        let stats = Arc::new(ScanStats::default());
        let tasks = Arc::new(TaskCounter::new());
        let capacity = limiter.as_ref().map_or(0, |l| l.capacity());
        let index = run(root, capacity, &hasher, &stats, &tasks, limiter);
        (index, tasks.peak())
    }

    #[test]
    fn unbounded_reaches_every_level() {
        let dir = create_deep_dir();
        let (index, peak) = run_fanout(dir.path(), None);
        assert_eq!(index.path_count(), 5);
        assert_eq!(index.digest_count(), 2);
        // Root walk plus at least one child task.
        assert!(peak >= 2, "peak {peak} too low for a nested tree");
    }

    #[test]
    fn bounded_reaches_every_level() {
        let dir = create_deep_dir();
        let limiter = Arc::new(TaskLimiter::new(2));
        let (index, _) = run_fanout(dir.path(), Some(Arc::clone(&limiter)));
        assert_eq!(index.path_count(), 5);
        assert!(limiter.peak_in_use() <= 2);
        assert_eq!(limiter.in_use(), 0, "all tickets returned");
    }

    #[test]
    fn capacity_one_serializes_but_finishes() {
        let dir = TempDir::new().expect("create temp dir");
        for i in 0..8 {
            make_file(dir.path(), &format!("file{i}"), format!("body {i}").as_bytes());
        }
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).expect("create subdir");
        make_file(&sub, "inner", b"body 0");

        let limiter = Arc::new(TaskLimiter::new(1));
        let (index, _) = run_fanout(dir.path(), Some(Arc::clone(&limiter)));
        assert_eq!(index.path_count(), 9);
        assert_eq!(limiter.peak_in_use(), 1);
    }

    #[test]
    fn counter_returns_to_zero() {
        let dir = create_deep_dir();
        let hasher = Arc::new(Hasher::default());
        let stats = Arc::new(ScanStats::default());
        let tasks = Arc::new(TaskCounter::new());
        let _ = run(dir.path(), 0, &hasher, &stats, &tasks, None);
        assert_eq!(tasks.outstanding(), 0);
    }

    #[test]
    fn empty_root_produces_empty_index() {
        let dir = TempDir::new().expect("create temp dir");
        let (index, peak) = run_fanout(dir.path(), None);
        assert!(index.is_empty());
        // The root task alone still registers.
        assert_eq!(peak, 1);
    }
}
