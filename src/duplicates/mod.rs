//! Duplicate detection module.
//!
//! This module provides:
//! - Digest-keyed indexing of hashed files ([`DigestIndex`])
//! - The three concurrency policies that feed it (pool, fan-out, bounded fan-out)
//! - Group extraction and ordering ([`DuplicateGroup`])
//! - The [`DuplicateFinder`] orchestrator tying them together

pub mod finder;
pub mod groups;
pub mod index;

mod fanout;
mod pool;

pub use finder::{
    format_size, DuplicateFinder, FinderConfig, FinderError, ScanPolicy, ScanSummary,
};
pub use groups::{sort_groups, DuplicateGroup};
pub use index::{collect, DigestIndex, HashedFile};
