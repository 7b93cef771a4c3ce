//! Printing of finished operations.

use std::io::{self, Write};

use crate::client::AnalysisOperation;

/// Write the full result body of a succeeded operation, pretty-printed with
/// two-space indentation. Any other status writes nothing.
///
/// Returns whether anything was written.
pub fn report<W: Write>(operation: &AnalysisOperation, out: &mut W) -> io::Result<bool> {
    if !operation.status.is_succeeded() {
        return Ok(false);
    }

    writeln!(out, "Analysis succeeded.")?;
    serde_json::to_writer_pretty(&mut *out, &operation.body)?;
    writeln!(out)?;
    out.flush()?;

    Ok(true)
}
