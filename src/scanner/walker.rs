//! Directory walker yielding regular, non-empty files.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and classifying its entries. Two traversal surfaces cover the two
//! shapes the scan policies need:
//!
//! - [`Walker::walk`] iterates the whole subtree and yields one
//!   [`FileEntry`] per regular non-empty file. The pool policy drives it
//!   from a single traversal pass.
//! - [`Walker::one_level`] iterates only the root's immediate children,
//!   classified as directory or file. The fan-out policies call it once
//!   per spawned traversal task, so each subdirectory is scanned by
//!   exactly one task.
//!
//! Per-entry failures (unreadable subdirectory, vanished file, metadata
//! error) are yielded as [`ScanError`] values and logged; the walk always
//! continues with the remaining siblings. Symbolic links are never
//! followed, and the root is visited exactly once.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileEntry, ScanError};

/// A classified entry from a single directory level.
///
/// Produced by [`Walker::one_level`]. Symlinks, zero-byte files, and
/// non-regular entries (sockets, FIFOs, devices) are filtered out before
/// classification and never appear here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkedEntry {
    /// A subdirectory, to be traversed by its own task.
    Directory(PathBuf),
    /// A regular, non-empty file, ready for hashing.
    File(FileEntry),
}

/// Directory walker for file discovery.
///
/// Construction is cheap (it stores only the root path), so fan-out tasks
/// create one per directory they scan.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker rooted at the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// The root this walker traverses.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the whole tree, yielding one entry per regular non-empty file.
    ///
    /// Returns an iterator over [`FileEntry`] results. Errors are yielded
    /// as [`ScanError`] values rather than stopping iteration. Children
    /// of each directory are visited in file-name order, which keeps
    /// discovery order reproducible run to run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupescan::scanner::Walker;
    /// use std::path::Path;
    ///
    /// let walker = Walker::new(Path::new("."));
    /// let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
    /// println!("Found {} files", files.len());
    /// ```
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        // min_depth(1) keeps the root itself out of the stream; walkdir
        // never revisits it, so the root cannot recurse into itself.
        WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        // walkdir descends on its own; nothing to yield.
                        return None;
                    }
                    self.classify_file(entry)
                }
                Err(e) => Some(Err(self.convert_walk_error(e))),
            })
    }

    /// Scan exactly one directory level, classifying each child.
    ///
    /// Yields [`WalkedEntry::Directory`] for subdirectories and
    /// [`WalkedEntry::File`] for regular non-empty files; everything else
    /// is skipped. Errors reading the level (including failure to open
    /// the directory itself) are yielded as [`ScanError`] values.
    pub fn one_level(&self) -> impl Iterator<Item = Result<WalkedEntry, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        return Some(Ok(WalkedEntry::Directory(entry.into_path())));
                    }
                    self.classify_file(entry)
                        .map(|result| result.map(WalkedEntry::File))
                }
                Err(e) => Some(Err(self.convert_walk_error(e))),
            })
    }

    /// Classify a non-directory entry, filtering out everything that is
    /// not a regular file with content.
    fn classify_file(
        &self,
        entry: walkdir::DirEntry,
    ) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        // Symlinks are "other": skipped, never followed. This also covers
        // links to directories, so link cycles cannot occur.
        if file_type.is_symlink() {
            log::trace!("Skipping symlink: {}", entry.path().display());
            return None;
        }

        // Sockets, FIFOs, devices.
        if !file_type.is_file() {
            log::trace!("Skipping non-regular entry: {}", entry.path().display());
            return None;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                let path = entry.path().to_path_buf();
                return Some(Err(self.convert_metadata_error(path, e)));
            }
        };

        // Empty files all hash identically; reporting them as duplicates
        // of each other is noise, so they are excluded up front.
        if size == 0 {
            log::debug!("Skipping empty file: {}", entry.path().display());
            return None;
        }

        Some(Ok(FileEntry::new(entry.into_path(), size)))
    }

    /// Convert a walkdir error into a [`ScanError`], logging it.
    fn convert_walk_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::warn!("Path vanished during walk: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walk error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: error
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
                }
            }
        }
    }

    /// Convert a metadata error into a [`ScanError`], logging it.
    fn convert_metadata_error(&self, path: PathBuf, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("File vanished before stat: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Metadata error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: error
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("metadata unavailable")),
                }
            }
        }
    }
}
