//! Digest index and the collector that owns it.
//!
//! # Overview
//!
//! The [`DigestIndex`] maps each content digest to the paths that hashed
//! to it, in arrival order. It is deliberately a plain map with no
//! internal locking: [`collect`] runs on a single thread and is the only
//! writer, so concurrency-safety comes from funneling every
//! [`HashedFile`] through one channel consumer rather than from
//! synchronizing the map. The scan policies uphold the other half of the
//! contract: each regular file is discovered exactly once, so a path is
//! inserted at most once.
//!
//! Once the producing side closes the channel, [`collect`] drains what
//! remains and returns the finished index; from that point it is
//! immutable.

use std::collections::HashMap;
use std::path::PathBuf;

use crossbeam_channel::Receiver;

use super::groups::{sort_groups, DuplicateGroup};
use crate::scanner::Digest;

/// A successfully hashed file, en route to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFile {
    /// Content digest
    pub digest: Digest,
    /// Path that produced it
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

#[derive(Debug)]
struct IndexEntry {
    /// Byte size of the content behind this digest.
    size: u64,
    /// Paths in arrival order.
    paths: Vec<PathBuf>,
}

/// Mapping from digest to the paths that produced it.
#[derive(Debug, Default)]
pub struct DigestIndex {
    entries: HashMap<Digest, IndexEntry>,
}

impl DigestIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hashed file to the entry for its digest, creating the
    /// entry on first occurrence.
    pub fn insert(&mut self, file: HashedFile) {
        let entry = self.entries.entry(file.digest).or_insert(IndexEntry {
            size: file.size,
            paths: Vec::new(),
        });
        debug_assert_eq!(
            entry.size, file.size,
            "same digest from different sizes for {}",
            file.path.display()
        );
        entry.paths.push(file.path);
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn digest_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of paths across all entries.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.entries.values().map(|e| e.paths.len()).sum()
    }

    /// Check if the index holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths recorded for a digest, in arrival order.
    #[must_use]
    pub fn paths_for(&self, digest: &Digest) -> Option<&[PathBuf]> {
        self.entries.get(digest).map(|e| e.paths.as_slice())
    }

    /// Consume the index, keeping only digests with two or more paths,
    /// sorted into the deterministic report order.
    #[must_use]
    pub fn into_duplicate_groups(self) -> Vec<DuplicateGroup> {
        let mut groups: Vec<DuplicateGroup> = self
            .entries
            .into_iter()
            .filter(|(_, entry)| entry.paths.len() > 1)
            .map(|(digest, entry)| DuplicateGroup::new(digest, entry.size, entry.paths))
            .collect();
        sort_groups(&mut groups);
        groups
    }
}

/// Drain a channel of hashed files into a fresh index.
///
/// Runs until the sending side is fully dropped, then returns the
/// finished index. The scan policies spawn this on a dedicated thread and
/// recover the index through the join handle.
#[must_use]
pub fn collect(input: Receiver<HashedFile>) -> DigestIndex {
    let mut index = DigestIndex::new();
    for file in input {
        log::trace!(
            "Collected {} <- {}",
            crate::scanner::short_digest(&file.digest),
            file.path.display()
        );
        index.insert(file);
    }
    index
}
