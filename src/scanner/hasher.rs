//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing BLAKE3 digests
//! of file contents using memory-efficient streaming: files are read
//! through a fixed 64 KiB buffer, so memory use is flat regardless of file
//! size. The digest is deterministic over content alone, so byte-identical
//! files anywhere on disk produce identical digests.
//!
//! Hash failures surface as [`HashError`]; callers exclude the failing
//! file from the index rather than substituting a placeholder digest.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{digest_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let digest = hasher.digest_file(Path::new("Cargo.toml")).unwrap();
//! println!("{}", digest_to_hex(&digest));
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::HashError;

/// Width of a digest in bytes (BLAKE3 default output).
pub const DIGEST_LEN: usize = blake3::OUT_LEN;

/// A fixed-width content digest.
pub type Digest = [u8; DIGEST_LEN];

/// Read buffer size for streaming hashing.
const READ_BUF_LEN: usize = 64 * 1024;

/// Number of trailing hex characters in the short display form.
const SHORT_DIGEST_LEN: usize = 7;

/// Streaming BLAKE3 file hasher.
///
/// Stateless and cheap to construct; one instance can be shared across
/// hashing workers behind an `Arc`.
#[derive(Debug, Default, Clone)]
pub struct Hasher;

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute the digest of a file's full content.
    ///
    /// Reads the file from start to end through a fixed-size buffer.
    /// Open and read failures are mapped to [`HashError`] with the path
    /// attached; no digest is produced for a file that cannot be fully
    /// read.
    pub fn digest_file(&self, path: &Path) -> Result<Digest, HashError> {
        let mut file = File::open(path).map_err(|e| Self::map_io_error(path, e))?;
        let mut hasher = blake3::Hasher::new();
        let mut buf = [0u8; READ_BUF_LEN];

        loop {
            let n = file
                .read(&mut buf)
                .map_err(|e| Self::map_io_error(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(*hasher.finalize().as_bytes())
    }

    /// Map an I/O error to a [`HashError`] with path context.
    fn map_io_error(path: &Path, error: std::io::Error) -> HashError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
            _ => HashError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Render a digest as a lowercase hex string.
#[must_use]
pub fn digest_to_hex(digest: &Digest) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(DIGEST_LEN * 2);
    for byte in digest {
        // Writing into a String cannot fail.
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Render the short display form of a digest: its last seven hex
/// characters, the way abbreviated VCS revisions are shown.
#[must_use]
pub fn short_digest(digest: &Digest) -> String {
    let hex = digest_to_hex(digest);
    hex[hex.len() - SHORT_DIGEST_LEN..].to_string()
}
