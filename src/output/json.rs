//! JSON report for duplicate scan results.
//!
//! Machine-readable counterpart of the text report, for scripting and
//! automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "digest": "abc123...",
//!       "size": 1024,
//!       "count": 2,
//!       "files": ["photos/img_0231.jpg", "backup/img_0231.jpg"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 100,
//!     "total_bytes": 1048576,
//!     "hashed_files": 100,
//!     "walk_errors": 0,
//!     "hash_errors": 0,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 2,
//!     "wasted_bytes": 1024,
//!     "peak_active_tasks": 7,
//!     "scan_duration_ms": 1234
//!   }
//! }
//! ```
//!
//! Paths are reported exactly as discovered, relative or absolute as the
//! scan root was.

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Full digest as a hexadecimal string (64 characters)
    pub digest: String,
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Number of files in the group
    pub count: usize,
    /// Paths of all members, in report order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Convert one group into its JSON form.
    #[must_use]
    pub fn from_group(group: &DuplicateGroup) -> Self {
        Self {
            digest: group.digest_hex(),
            size: group.size,
            count: group.len(),
            files: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Non-empty regular files discovered by the traversal
    pub total_files: usize,
    /// Combined size of the discovered files in bytes
    pub total_bytes: u64,
    /// Files whose digest made it into the index
    pub hashed_files: usize,
    /// Directory entries that could not be read
    pub walk_errors: usize,
    /// Files that could not be hashed
    pub hash_errors: usize,
    /// Number of duplicate groups found
    pub duplicate_groups: usize,
    /// Total number of files across all groups
    pub duplicate_files: usize,
    /// Bytes occupied by redundant copies
    pub wasted_bytes: u64,
    /// Peak concurrently live tasks; null for the pool policy
    pub peak_active_tasks: Option<usize>,
    /// Wall-clock duration of the scan in milliseconds
    pub scan_duration_ms: u64,
}

impl JsonSummary {
    /// Convert a scan summary into its JSON form.
    #[must_use]
    pub fn from_summary(summary: &ScanSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_bytes: summary.total_bytes,
            hashed_files: summary.hashed_files,
            walk_errors: summary.walk_errors,
            hash_errors: summary.hash_errors,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            wasted_bytes: summary.wasted_bytes,
            peak_active_tasks: summary.peak_active_tasks,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
        }
    }
}

/// Complete JSON report structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// List of duplicate groups, in report order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonReport {
    /// Build a report from sorted groups and the scan summary.
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary) -> Self {
        Self {
            duplicates: groups.iter().map(JsonDuplicateGroup::from_group).collect(),
            summary: JsonSummary::from_summary(summary),
        }
    }

    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report to a writer, followed by a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonReportError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur while producing the JSON report.
#[derive(thiserror::Error, Debug)]
pub enum JsonReportError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error while writing JSON report: {0}")]
    Io(#[from] std::io::Error),
}
