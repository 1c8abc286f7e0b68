//! Human-readable run summary.

use std::io::Write;

use crate::cases::ContractCase;
use crate::error::HarnessError;
use crate::runner::RunSummary;

const DETAIL_INDENT: &str = "        ";

/// Writes one line per case, a detail line for non-passing cases, and a tally.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if writing fails.
pub fn write_text<W: Write>(writer: &mut W, summary: &RunSummary) -> Result<(), HarnessError> {
    for report in summary.reports() {
        writeln!(
            writer,
            "{:<7} {} ({} ms)",
            report.outcome.label(),
            report.id,
            report.elapsed.as_millis()
        )?;
        if let Some(detail) = report.outcome.detail() {
            writeln!(writer, "{DETAIL_INDENT}{detail}")?;
        }
    }

    let tally = summary.tally();
    writeln!(
        writer,
        "\n{} cases: {} passed, {} skipped, {} failed, {} errored",
        tally.total(),
        tally.passed,
        tally.skipped,
        tally.failed,
        tally.errored
    )?;
    Ok(())
}

/// Writes the id, group and title of each case, one per line.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if writing fails.
pub fn write_catalogue<W: Write>(
    writer: &mut W,
    cases: &[&ContractCase],
) -> Result<(), HarnessError> {
    let width = cases.iter().map(|case| case.id().len()).max().unwrap_or(0);
    for case in cases {
        writeln!(
            writer,
            "{:<width$}  {:<15}  {}",
            case.id(),
            case.group().as_str(),
            case.title()
        )?;
    }
    Ok(())
}
