//! Baseline/current snapshot diffing.
//!
//! All comparisons are set operations over extracted keys, never deep
//! structural equality, so ordering and formatting noise cannot raise false
//! positives. Each regression event is one finding listing everything that
//! went missing; additions are informational and never gate a verdict.
//!
//! Findings are not deduplicated across categories: a button id that is both
//! a removed button and a removed critical id produces two findings, each
//! with its own remediation.

use crate::models::snapshot::StructuralSnapshot;
use crate::models::{Category, Finding, Severity};
use std::collections::{BTreeMap, BTreeSet};

/// Compare `current` against `baseline`.
///
/// `critical_ids` overrides the set of element ids that must survive a
/// deployment; when absent, the full baseline id set is the reference.
pub fn diff(
    baseline: &StructuralSnapshot,
    current: &StructuralSnapshot,
    critical_ids: Option<&BTreeSet<String>>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let baseline_buttons = baseline.button_ids();
    let current_buttons = current.button_ids();

    let missing_buttons: Vec<&String> = baseline_buttons.difference(&current_buttons).collect();
    if !missing_buttons.is_empty() {
        findings.push(Finding {
            category: Category::MissingElement,
            severity: Severity::High,
            subject: "buttons".into(),
            message: format!("Missing buttons: {}", join(&missing_buttons)),
            impact: "Users have lost access to these actions".into(),
            remediation: "Restore the removed buttons or update the baseline if intentional"
                .into(),
            evidence: None,
        });
    }

    let new_buttons: Vec<&String> = current_buttons.difference(&baseline_buttons).collect();
    if !new_buttons.is_empty() {
        findings.push(Finding {
            category: Category::Advisory,
            severity: Severity::Info,
            subject: "buttons".into(),
            message: format!("New buttons added: {}", join(&new_buttons)),
            impact: "New functionality is available; no action required".into(),
            remediation: "Capture a new baseline to include the additions".into(),
            evidence: None,
        });
    }

    let baseline_ids = baseline.id_set();
    let current_ids = current.id_set();
    let reference = critical_ids.unwrap_or(&baseline_ids);

    let missing_ids: Vec<&String> = reference.difference(&current_ids).collect();
    if !missing_ids.is_empty() {
        findings.push(Finding {
            category: Category::MissingElement,
            severity: Severity::High,
            subject: "elements".into(),
            message: format!("Missing element ids: {}", join(&missing_ids)),
            impact: "JavaScript that targets these ids will fail silently".into(),
            remediation: "Restore the elements with these ids".into(),
            evidence: None,
        });
    }

    let new_ids: Vec<&String> = current_ids.difference(&baseline_ids).collect();
    if !new_ids.is_empty() {
        findings.push(Finding {
            category: Category::Advisory,
            severity: Severity::Info,
            subject: "elements".into(),
            message: format!("New element ids: {}", join(&new_ids)),
            impact: "New structure is present; no action required".into(),
            remediation: "Capture a new baseline to include the additions".into(),
            evidence: None,
        });
    }

    let baseline_scripts = baseline.script_locations();
    let current_scripts = current.script_locations();
    let missing_scripts: Vec<&String> = baseline_scripts.difference(&current_scripts).collect();
    if !missing_scripts.is_empty() {
        // Scripts outrank styles: their absence silently disables
        // interactivity instead of degrading appearance.
        findings.push(Finding {
            category: Category::MissingResource,
            severity: Severity::Critical,
            subject: "scripts".into(),
            message: format!("Missing JavaScript files: {}", join(&missing_scripts)),
            impact: "Interactive behavior bound to these scripts no longer works".into(),
            remediation: "Ensure the script files are deployed and referenced".into(),
            evidence: None,
        });
    }

    let baseline_styles = baseline.stylesheet_locations();
    let current_styles = current.stylesheet_locations();
    let missing_styles: Vec<&String> = baseline_styles.difference(&current_styles).collect();
    if !missing_styles.is_empty() {
        findings.push(Finding {
            category: Category::MissingResource,
            severity: Severity::Medium,
            subject: "stylesheets".into(),
            message: format!("Missing CSS files: {}", join(&missing_styles)),
            impact: "The page renders unstyled or partially styled".into(),
            remediation: "Ensure the stylesheet files are deployed and referenced".into(),
            evidence: None,
        });
    }

    findings.extend(label_drift(baseline, current));
    findings
}

/// A button that keeps its id but changes its visible text signals silent
/// behavior drift rather than a removal.
fn label_drift(baseline: &StructuralSnapshot, current: &StructuralSnapshot) -> Vec<Finding> {
    let baseline_texts = button_texts(baseline);
    let current_texts = button_texts(current);
    baseline_texts
        .iter()
        .filter_map(|(id, old)| {
            let new = current_texts.get(id)?;
            if new == old {
                return None;
            }
            Some(Finding {
                category: Category::StructuralDefect,
                severity: Severity::Medium,
                subject: format!("button#{id}"),
                message: format!(
                    "Label changed for stable id: \"{old}\" is now \"{new}\""
                ),
                impact: "Users relying on the old label may no longer recognize the action".into(),
                remediation: "Confirm the relabel is intentional, then capture a new baseline"
                    .into(),
                evidence: None,
            })
        })
        .collect()
}

/// First text seen per button id. Duplicate button ids are already reported
/// by the quality engine, so the first occurrence wins here.
fn button_texts(snap: &StructuralSnapshot) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for b in &snap.buttons {
        if let Some(id) = b.id.as_deref().filter(|id| !id.is_empty()) {
            map.entry(id.to_string()).or_insert_with(|| b.text.clone());
        }
    }
    map
}

fn join(items: &[&String]) -> String {
    items
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;

    const BASELINE: &str = "<title>Counter</title>\
        <div id=\"count\">0</div>\
        <button id=\"increment\">+</button>\
        <button id=\"decrement\">-</button>\
        <button id=\"reset\">Reset</button>\
        <link rel=\"stylesheet\" href=\"style.css\">\
        <script src=\"app.js\"></script>";

    fn snap(markup: &str) -> StructuralSnapshot {
        extract(markup, "https://example.test/")
    }

    #[test]
    fn diff_against_self_is_empty() {
        let a = snap(BASELINE);
        assert!(diff(&a, &a, None).is_empty());
    }

    #[test]
    fn removed_button_is_one_high_missing_element_finding() {
        // Scenario: baseline {increment, decrement, reset}, current loses increment.
        let baseline = snap(BASELINE);
        let current = snap(
            "<title>Counter</title>\
             <div id=\"count\">0</div>\
             <button id=\"decrement\">-</button>\
             <button id=\"reset\">Reset</button>\
             <link rel=\"stylesheet\" href=\"style.css\">\
             <script src=\"app.js\"></script>",
        );
        let findings = diff(&baseline, &current, None);
        let missing: Vec<_> = findings
            .iter()
            .filter(|f| f.category == Category::MissingElement && f.subject == "buttons")
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::High);
        assert!(missing[0].message.contains("increment"));
        assert!(!missing[0].message.contains("decrement"));
    }

    #[test]
    fn removed_button_id_also_reports_as_missing_element_id() {
        // Same id removal surfaces under both subjects, with different
        // remediation text; no cross-category dedup.
        let baseline = snap(BASELINE);
        let current = snap(
            "<title>Counter</title>\
             <div id=\"count\">0</div>\
             <button id=\"decrement\">-</button>\
             <button id=\"reset\">Reset</button>\
             <link rel=\"stylesheet\" href=\"style.css\">\
             <script src=\"app.js\"></script>",
        );
        let findings = diff(&baseline, &current, None);
        let subjects: Vec<&str> = findings
            .iter()
            .filter(|f| f.category == Category::MissingElement)
            .map(|f| f.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["buttons", "elements"]);
    }

    #[test]
    fn new_buttons_are_informational_only() {
        let baseline = snap(BASELINE);
        let current = snap(&format!("{BASELINE}<button id=\"undo\">Undo</button>"));
        let findings = diff(&baseline, &current, None);
        assert!(findings
            .iter()
            .all(|f| f.category == Category::Advisory && f.severity == Severity::Info));
        assert!(findings
            .iter()
            .any(|f| f.subject == "buttons" && f.message.contains("undo")));
    }

    #[test]
    fn missing_script_is_critical_resource() {
        // Scenario: baseline scripts ["app.js"], current has none.
        let baseline = snap(BASELINE);
        let current = snap(
            "<title>Counter</title>\
             <div id=\"count\">0</div>\
             <button id=\"increment\">+</button>\
             <button id=\"decrement\">-</button>\
             <button id=\"reset\">Reset</button>\
             <link rel=\"stylesheet\" href=\"style.css\">",
        );
        let findings = diff(&baseline, &current, None);
        let scripts: Vec<_> = findings
            .iter()
            .filter(|f| f.category == Category::MissingResource)
            .collect();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].severity, Severity::Critical);
        assert!(scripts[0].message.contains("app.js"));
    }

    #[test]
    fn missing_stylesheet_is_medium_resource() {
        let baseline = snap(BASELINE);
        let current = snap(
            "<title>Counter</title>\
             <div id=\"count\">0</div>\
             <button id=\"increment\">+</button>\
             <button id=\"decrement\">-</button>\
             <button id=\"reset\">Reset</button>\
             <script src=\"app.js\"></script>",
        );
        let findings = diff(&baseline, &current, None);
        let styles: Vec<_> = findings
            .iter()
            .filter(|f| f.subject == "stylesheets")
            .collect();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].severity, Severity::Medium);
    }

    #[test]
    fn explicit_critical_ids_take_precedence_over_baseline_set() {
        let baseline = snap(BASELINE);
        // Current dropped "count" and "heading"; only "count" is critical.
        let current = snap(
            "<title>Counter</title>\
             <button id=\"increment\">+</button>\
             <button id=\"decrement\">-</button>\
             <button id=\"reset\">Reset</button>\
             <link rel=\"stylesheet\" href=\"style.css\">\
             <script src=\"app.js\"></script>",
        );
        let critical: BTreeSet<String> = ["count".to_string()].into_iter().collect();
        let findings = diff(&baseline, &current, Some(&critical));
        let missing: Vec<_> = findings
            .iter()
            .filter(|f| f.subject == "elements" && f.category == Category::MissingElement)
            .collect();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].message.contains("count"));
    }

    #[test]
    fn relabeled_button_with_stable_id_is_structural_drift() {
        let baseline = snap(BASELINE);
        let current = snap(&BASELINE.replace(">Reset<", ">Clear<"));
        let findings = diff(&baseline, &current, None);
        let drift: Vec<_> = findings
            .iter()
            .filter(|f| f.subject == "button#reset")
            .collect();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].severity, Severity::Medium);
        assert_eq!(drift[0].category, Category::StructuralDefect);
        assert!(drift[0].message.contains("Reset"));
        assert!(drift[0].message.contains("Clear"));
    }
}
