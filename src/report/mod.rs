//! Rendering of run summaries.
//!
//! - **Text**: one line per case plus an indented detail line for anything
//!   that did not pass, followed by a tally.
//! - **JSONL**: one JSON object per case, suitable for CI tooling.

mod jsonl;
mod text;

use std::io::Write;

use crate::config::ReportFormat;
use crate::error::HarnessError;
use crate::runner::RunSummary;

pub use jsonl::{CaseRecord, write_jsonl};
pub use text::{write_catalogue, write_text};

/// Writes `summary` to `writer` in the requested format.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if writing fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    summary: &RunSummary,
    format: ReportFormat,
) -> Result<(), HarnessError> {
    match format {
        ReportFormat::Text => write_text(writer, summary),
        ReportFormat::Jsonl => write_jsonl(writer, summary),
    }
}
