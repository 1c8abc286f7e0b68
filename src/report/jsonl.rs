//! JSONL (JSON Lines) rendering of run summaries.
//!
//! One object per case, in catalogue order, so that CI tooling can stream the
//! results without parsing the human summary.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cases::CaseGroup;
use crate::error::HarnessError;
use crate::runner::{CaseReport, RunSummary};

/// Serialised form of one [`CaseReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRecord<'a> {
    /// Stable case id.
    pub id: &'a str,
    /// Case group.
    pub group: CaseGroup,
    /// Case title.
    pub title: &'a str,
    /// `passed`, `skipped`, `failed` or `errored`.
    pub outcome: &'static str,
    /// Skip reason, violation, or error text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Wall time of the case in milliseconds.
    pub elapsed_ms: u64,
    /// When the record was written.
    pub recorded_at: DateTime<Utc>,
}

impl<'a> CaseRecord<'a> {
    /// Builds a record from a report, stamped with `recorded_at`.
    #[must_use]
    pub fn from_report(report: &'a CaseReport, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: report.id,
            group: report.group,
            title: report.title,
            outcome: report.outcome.label(),
            detail: report.outcome.detail(),
            elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            recorded_at,
        }
    }
}

/// Writes one JSON object per case.
///
/// # Errors
///
/// Returns [`HarnessError::Io`] if serialisation or writing fails.
pub fn write_jsonl<W: Write>(writer: &mut W, summary: &RunSummary) -> Result<(), HarnessError> {
    let recorded_at = Utc::now();
    for report in summary.reports() {
        let record = CaseRecord::from_report(report, recorded_at);
        serde_json::to_writer(&mut *writer, &record).map_err(|error| HarnessError::Io {
            message: format!("JSON serialisation failed: {error}"),
        })?;
        writeln!(writer)?;
    }
    Ok(())
}
