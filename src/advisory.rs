//! Seam for an optional, non-deterministic advisory collaborator.
//!
//! The engine never calls a reasoning service itself; a caller may plug one
//! in behind [`AdvisoryAnalyzer`]. Whatever the collaborator returns is
//! clamped to category `Advisory` and severity `Info` before it reaches a
//! report, and its failures are swallowed: advisories supplement a verdict,
//! they never compute or change one.

use crate::models::{Category, Finding, Report, Severity, SeveritySummary, StructuralSnapshot};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("advisory analyzer failed: {0}")]
pub struct AdvisoryError(pub String);

/// An out-of-band analyzer (e.g. a model-driven UX reviewer) that inspects a
/// snapshot and suggests loosely structured findings.
pub trait AdvisoryAnalyzer {
    fn analyze(&self, snapshot: &StructuralSnapshot) -> Result<Vec<Finding>, AdvisoryError>;
}

/// Produce a new report with the analyzer's suggestions appended.
///
/// The verdict is carried over untouched. Analyzer errors leave the report
/// as-is, and an `Error` report (no snapshot) is never analyzed.
pub fn append(report: Report, analyzer: &dyn AdvisoryAnalyzer) -> Report {
    let advisories = match report.current.as_ref() {
        Some(snapshot) => match analyzer.analyze(snapshot) {
            Ok(found) => found,
            Err(_) => return report,
        },
        None => return report,
    };
    if advisories.is_empty() {
        return report;
    }

    let Report {
        verdict,
        mut findings,
        baseline,
        current,
        error,
        summary: _,
    } = report;
    findings.extend(advisories.into_iter().map(clamp));
    findings.sort_by_key(Finding::sort_key);
    let summary = SeveritySummary::from_findings(&findings);
    Report {
        verdict,
        findings,
        summary,
        baseline,
        current,
        error,
    }
}

fn clamp(finding: Finding) -> Finding {
    Finding {
        category: Category::Advisory,
        severity: Severity::Info,
        ..finding
    }
}
