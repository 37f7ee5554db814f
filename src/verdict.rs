//! Verdict aggregation: findings in, deterministic report out.
//!
//! The default threshold marks the run `IssuesDetected` when any finding is
//! Critical or High. Medium, Low, Warning, and Info findings are always
//! reported and counted but never flip the verdict on their own. Advisory
//! findings never gate regardless of the configured threshold.

use crate::models::{Category, Finding, Report, Severity, SeveritySummary, StructuralSnapshot, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Gating policy for one evaluation run.
pub struct VerdictThresholds {
    /// Findings at this severity or worse fail the run.
    pub fail_on: Severity,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            fail_on: Severity::High,
        }
    }
}

/// Merge findings into a report with a pass/fail verdict.
pub fn aggregate(
    baseline: Option<StructuralSnapshot>,
    current: StructuralSnapshot,
    findings: Vec<Finding>,
    thresholds: &VerdictThresholds,
) -> Report {
    let mut findings = findings;
    findings.sort_by_key(Finding::sort_key);

    let gated = findings
        .iter()
        .any(|f| f.category != Category::Advisory && f.severity <= thresholds.fail_on);
    let verdict = if gated {
        Verdict::IssuesDetected
    } else {
        Verdict::Healthy
    };

    let summary = SeveritySummary::from_findings(&findings);
    Report {
        verdict,
        findings,
        summary,
        baseline,
        current: Some(current),
        error: None,
    }
}

/// Report for a run that could not check anything. Distinct from
/// `IssuesDetected` so callers can tell "found problems" from "could not
/// look".
pub fn error_report(message: impl Into<String>) -> Report {
    Report {
        verdict: Verdict::Error,
        findings: Vec::new(),
        summary: SeveritySummary::default(),
        baseline: None,
        current: None,
        error: Some(message.into()),
    }
}
