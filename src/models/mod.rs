//! Shared data models: findings, severities, verdicts, and the report shape
//! consumed by the printers and the CI exit-code mapping.

pub mod snapshot;

use serde::{Deserialize, Serialize};

pub use snapshot::StructuralSnapshot;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Finding severity. Declaration order is the ranking: `Critical` sorts and
/// gates ahead of everything else, `Info` never gates.
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// Parse a severity token as used in config files and `--fail-on`.
    pub fn parse(s: &str) -> Option<Severity> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "warning" | "warn" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
/// What kind of problem a finding describes. Used as the secondary sort key
/// after severity.
pub enum Category {
    MissingElement,
    MissingResource,
    DuplicateId,
    AccessibilityGap,
    StructuralDefect,
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One detected regression or quality defect.
pub struct Finding {
    pub category: Category,
    pub severity: Severity,
    /// Human-readable element/resource identifier, e.g. `button#increment`.
    pub subject: String,
    pub message: String,
    pub impact: String,
    pub remediation: String,
    /// Example markup snippet, when one helps the fix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Finding {
    /// Sort key: severity rank, then category, then subject.
    pub fn sort_key(&self) -> (Severity, Category, String) {
        (self.severity, self.category, self.subject.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Final classification for one evaluation run. `Error` means the run could
/// not check anything; it is distinct from "checked and found problems".
pub enum Verdict {
    Healthy,
    IssuesDetected,
    Error,
}

impl Verdict {
    /// Process exit status for CI gating: 0 pass, 1 issues, 2 could-not-check.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Healthy => 0,
            Verdict::IssuesDetected => 1,
            Verdict::Error => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Finding counts per severity.
pub struct SeveritySummary {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeveritySummary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut s = SeveritySummary::default();
        for f in findings {
            match f.severity {
                Severity::Critical => s.critical += 1,
                Severity::High => s.high += 1,
                Severity::Medium => s.medium += 1,
                Severity::Low => s.low += 1,
                Severity::Warning => s.warning += 1,
                Severity::Info => s.info += 1,
            }
        }
        s
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.warning + self.info
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Aggregate result of one evaluation run. Produced once, never mutated;
/// re-running an evaluation produces a new report.
pub struct Report {
    #[serde(rename = "status")]
    pub verdict: Verdict,
    /// Sorted by severity, then category, then subject.
    pub findings: Vec<Finding>,
    pub summary: SeveritySummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<StructuralSnapshot>,
    /// Absent only when `verdict` is `Error` and nothing was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<StructuralSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
