//! Bounded worker-pool scan policy.
//!
//! One traversal pass on the calling thread feeds discovered files into a
//! bounded queue; a fixed set of hashing workers drains it and forwards
//! digests to the collector. The queue's capacity is the backpressure
//! mechanism: when hashing falls behind, the send blocks and traversal
//! pauses until a slot frees up.
//!
//! Termination is a channel-close cascade. Dropping the entry sender closes
//! the queue, each worker drains what is left and exits, the last worker's
//! drop of its result sender closes the collector's input, and the collector
//! returns the finished index.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use super::finder::{FinderConfig, ScanStats};
use super::index::{collect, DigestIndex, HashedFile};
use crate::scanner::{FileEntry, Hasher, Walker};

/// Walk `root` and hash every discovered file on a fixed worker pool.
pub(crate) fn run(
    root: &Path,
    config: &FinderConfig,
    hasher: &Arc<Hasher>,
    stats: &Arc<ScanStats>,
) -> DigestIndex {
    let (entry_tx, entry_rx) = bounded::<FileEntry>(config.queue_capacity);
    // One in-flight result per worker keeps the collector fed without
    // buffering the whole tree.
    let (hashed_tx, hashed_rx) = bounded::<HashedFile>(config.workers);

    let collector = thread::spawn(move || collect(hashed_rx));

    let workers: Vec<thread::JoinHandle<usize>> = (0..config.workers)
        .map(|_| {
            let entries = entry_rx.clone();
            let results = hashed_tx.clone();
            let hasher = Arc::clone(hasher);
            let stats = Arc::clone(stats);
            thread::spawn(move || hash_worker(&entries, &results, &hasher, &stats))
        })
        .collect();

    // Only the workers may hold these ends from here on; the close cascade
    // depends on the coordinator's copies being gone.
    drop(entry_rx);
    drop(hashed_tx);

    let walker = Walker::new(root);
    for result in walker.walk() {
        match result {
            Ok(entry) => {
                stats.record_file(entry.size);
                // Blocks while the queue is full; that is the backpressure.
                if entry_tx.send(entry).is_err() {
                    log::error!("All hash workers exited early; abandoning traversal");
                    break;
                }
            }
            // The walker already logged the entry.
            Err(_) => stats.record_walk_error(),
        }
    }

    // Close the queue; workers drain the remainder and exit.
    drop(entry_tx);

    for (id, worker) in workers.into_iter().enumerate() {
        let hashed = worker.join().expect("hash worker panicked");
        log::debug!("Hash worker {id} finished after {hashed} files");
    }

    // With the workers joined, every result sender is gone and the
    // collector is already finalizing.
    collector.join().expect("collector thread panicked")
}

/// Worker loop: hash queue entries until the queue closes.
///
/// Returns the number of files this worker hashed.
fn hash_worker(
    entries: &Receiver<FileEntry>,
    results: &Sender<HashedFile>,
    hasher: &Hasher,
    stats: &ScanStats,
) -> usize {
    let mut hashed = 0usize;
    for entry in entries {
        match hasher.digest_file(&entry.path) {
            Ok(digest) => {
                let record = HashedFile {
                    digest,
                    path: entry.path,
                    size: entry.size,
                };
                if results.send(record).is_err() {
                    // Collector is gone; nothing left to hash for.
                    break;
                }
                hashed += 1;
            }
            Err(e) => {
                stats.record_hash_error();
                log::warn!("Skipping {}: {e}", entry.path.display());
            }
        }
    }
    hashed
}
