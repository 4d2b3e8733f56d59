//! Output formatters for duplicate scan results.
//!
//! Two formats cover the two audiences:
//! - Text for humans reading a terminal
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::output::TextReport;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, _summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let mut stdout = std::io::stdout().lock();
//! TextReport::new(&groups).write_to(&mut stdout).unwrap();
//! ```

pub mod json;
pub mod text;

pub use json::{JsonReport, JsonReportError};
pub use text::TextReport;
