//! Duplicate group data shapes and ordering.
//!
//! # Overview
//!
//! A [`DuplicateGroup`] is one entry of the digest index that ended up
//! with two or more paths: byte-identical files, one group per distinct
//! content. Groups carry the shared byte size of their members, so
//! redundancy accounting needs no extra stat calls.
//!
//! Because members share content, they necessarily share size; the
//! per-group `size` is recorded once.

use std::path::PathBuf;

use crate::scanner::{digest_to_hex, short_digest, Digest};

/// Confirmed duplicate group of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content digest shared by every member
    pub digest: Digest,
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Member paths, in the order the collector received them
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: Digest, size: u64, paths: Vec<PathBuf>) -> Self {
        Self {
            digest,
            size,
            paths,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (total minus one original).
    #[must_use]
    pub fn redundant_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Bytes occupied by the redundant copies.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.size * self.redundant_count() as u64
    }

    /// Bytes occupied by the whole group.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.size * self.paths.len() as u64
    }

    /// Digest as a full hexadecimal string.
    #[must_use]
    pub fn digest_hex(&self) -> String {
        digest_to_hex(&self.digest)
    }

    /// Digest in its short display form.
    #[must_use]
    pub fn digest_short(&self) -> String {
        short_digest(&self.digest)
    }
}

/// Sort groups into the report order: member count descending, then
/// digest bytes ascending.
///
/// The digest tiebreak makes the order total, so two runs over the same
/// tree render groups identically even though the index is built from
/// concurrent arrivals.
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.paths
            .len()
            .cmp(&a.paths.len())
            .then_with(|| a.digest.cmp(&b.digest))
    });
}
