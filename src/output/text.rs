//! Plain-text report for duplicate scan results.
//!
//! One block per duplicate group: a header line with the short digest and
//! the member count, then each member path indented by two spaces. A scan
//! with no duplicates writes nothing at all.
//!
//! ```text
//! 9f86d08 2
//!   photos/img_0231.jpg
//!   backup/img_0231.jpg
//! ```

use std::io::{self, Write};

use crate::duplicates::DuplicateGroup;

/// Renders duplicate groups in the line-oriented text format.
#[derive(Debug)]
pub struct TextReport<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> TextReport<'a> {
    /// Create a report over already-sorted groups.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the report to a writer, in group order.
    ///
    /// Emits nothing when there are no groups; the caller decides whether
    /// silence needs an explanation.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in self.groups {
            writeln!(writer, "{} {}", group.digest_short(), group.len())?;
            for path in &group.paths {
                writeln!(writer, "  {}", path.display())?;
            }
        }
        Ok(())
    }
}
