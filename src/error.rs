//! Process exit codes.

/// Exit codes for the dupescan binary.
///
/// - 0: Scan completed normally, whether or not duplicates were found
/// - 1: Fatal error (invalid root, unreadable root, unexpected failure)
/// - 2: Usage error (bad arguments, reported by clap)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed normally.
    Success = 0,
    /// A fatal error stopped the scan.
    GeneralError = 1,
    /// The command line did not parse.
    UsageError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
