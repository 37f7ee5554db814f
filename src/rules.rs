//! Rule catalog and quality engine.
//!
//! Each rule is a pure predicate over one snapshot and may emit any number of
//! findings (one per offending element, or a single aggregate). Rules are
//! independent and order-free; the verdict aggregator sorts whatever they
//! produce. A rule that panics is converted into a warning finding naming the
//! rule, and evaluation continues with the remaining rules.

use crate::models::snapshot::StructuralSnapshot;
use crate::models::{Category, Finding, Severity};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// One structural/accessibility quality rule.
pub struct Rule {
    pub id: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub run: fn(&StructuralSnapshot) -> Vec<Finding>,
}

/// Types whose presence alone satisfies labeling requirements.
const UNLABELED_OK_TYPES: [&str; 3] = ["hidden", "submit", "button"];

/// Inline-style count above which the aggregate warning fires.
const INLINE_STYLE_LIMIT: usize = 5;

/// The fixed rule table evaluated by [`evaluate_quality`].
pub fn catalog() -> Vec<Rule> {
    vec![
        Rule {
            id: "empty-button",
            category: Category::AccessibilityGap,
            severity: Severity::High,
            run: empty_buttons,
        },
        Rule {
            id: "input-without-label",
            category: Category::AccessibilityGap,
            severity: Severity::Medium,
            run: inputs_without_labels,
        },
        Rule {
            id: "image-without-alt",
            category: Category::AccessibilityGap,
            severity: Severity::Medium,
            run: images_without_alt,
        },
        Rule {
            id: "missing-title",
            category: Category::StructuralDefect,
            severity: Severity::High,
            run: missing_title,
        },
        Rule {
            id: "duplicate-id",
            category: Category::DuplicateId,
            severity: Severity::Critical,
            run: duplicate_ids,
        },
        Rule {
            id: "empty-link",
            category: Category::AccessibilityGap,
            severity: Severity::Medium,
            run: empty_links,
        },
        Rule {
            id: "missing-viewport",
            category: Category::StructuralDefect,
            severity: Severity::Low,
            run: missing_viewport,
        },
        Rule {
            id: "missing-lang",
            category: Category::AccessibilityGap,
            severity: Severity::Low,
            run: missing_lang,
        },
        Rule {
            id: "inline-styles",
            category: Category::StructuralDefect,
            severity: Severity::Warning,
            run: excessive_inline_styles,
        },
        Rule {
            id: "button-without-id",
            category: Category::StructuralDefect,
            severity: Severity::Warning,
            run: buttons_without_id,
        },
    ]
}

/// Evaluate the full catalog against one snapshot.
pub fn evaluate_quality(snapshot: &StructuralSnapshot) -> Vec<Finding> {
    evaluate_rules(&catalog(), snapshot)
}

/// Evaluate an explicit rule set. Rules run independently (in parallel) and
/// their findings are concatenated in catalog order.
pub fn evaluate_rules(rules: &[Rule], snapshot: &StructuralSnapshot) -> Vec<Finding> {
    rules
        .par_iter()
        .map(|rule| {
            catch_unwind(AssertUnwindSafe(|| (rule.run)(snapshot))).unwrap_or_else(|_| {
                vec![Finding {
                    category: Category::StructuralDefect,
                    severity: Severity::Warning,
                    subject: format!("rule:{}", rule.id),
                    message: format!("Rule '{}' failed to evaluate and was skipped", rule.id),
                    impact: "One quality check did not run; its findings may be missing".into(),
                    remediation: "Report this rule failure; the remaining rules still ran".into(),
                    evidence: None,
                }]
            })
        })
        .flatten()
        .collect()
}

fn empty_buttons(snap: &StructuralSnapshot) -> Vec<Finding> {
    snap.buttons
        .iter()
        .filter(|b| b.text.is_empty() && b.aria_label.as_deref().map_or(true, str::is_empty))
        .map(|b| {
            let label = b.id.as_deref().filter(|id| !id.is_empty());
            let subject = match label {
                Some(id) => format!("button#{id}"),
                None => "button".to_string(),
            };
            let snippet_id = label.unwrap_or("unknown");
            Finding {
                category: Category::AccessibilityGap,
                severity: Severity::High,
                subject,
                message: format!(
                    "Button with id=\"{snippet_id}\" has no text or aria-label"
                ),
                impact: "Users cannot see what the button does. Screen readers cannot announce it."
                    .into(),
                remediation: "Add text inside the button or add an aria-label attribute".into(),
                evidence: Some(format!("<button id=\"{snippet_id}\">Add Text Here</button>")),
            }
        })
        .collect()
}

fn inputs_without_labels(snap: &StructuralSnapshot) -> Vec<Finding> {
    snap.inputs
        .iter()
        .filter(|i| {
            matches!(i.id.as_deref(), Some(id) if !id.is_empty())
                && !UNLABELED_OK_TYPES.contains(&i.kind.as_str())
                && !i.has_associated_label
        })
        .map(|i| {
            let id = i.id.as_deref().unwrap_or_default();
            Finding {
                category: Category::AccessibilityGap,
                severity: Severity::Medium,
                subject: format!("input#{id}"),
                message: format!("Input field \"{id}\" has no associated label"),
                impact: "Screen readers cannot identify the input purpose".into(),
                remediation: format!("Add <label for=\"{id}\">Label Text</label>"),
                evidence: None,
            }
        })
        .collect()
}

fn images_without_alt(snap: &StructuralSnapshot) -> Vec<Finding> {
    snap.images
        .iter()
        .filter(|i| !i.has_alt)
        .map(|i| {
            let subject = match i.src.as_deref() {
                Some(src) => format!("img[src=\"{src}\"]"),
                None => "img".to_string(),
            };
            Finding {
                category: Category::AccessibilityGap,
                severity: Severity::Medium,
                subject,
                message: "Image has no alt text".into(),
                impact: "Screen readers cannot describe the image".into(),
                remediation: "Add an alt=\"description\" attribute".into(),
                evidence: None,
            }
        })
        .collect()
}

fn missing_title(snap: &StructuralSnapshot) -> Vec<Finding> {
    let empty = snap
        .title
        .as_deref()
        .map_or(true, |t| t.trim().is_empty());
    if !empty {
        return Vec::new();
    }
    vec![Finding {
        category: Category::StructuralDefect,
        severity: Severity::High,
        subject: "title".into(),
        message: "Page has no title or an empty title".into(),
        impact: "Poor SEO and a bad browser-tab experience".into(),
        remediation: "Add <title>Your Page Title</title>".into(),
        evidence: None,
    }]
}

fn duplicate_ids(snap: &StructuralSnapshot) -> Vec<Finding> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for id in &snap.all_element_ids {
        *counts.entry(id.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, n)| Finding {
            category: Category::DuplicateId,
            severity: Severity::Critical,
            subject: format!("#{id}"),
            message: format!("{n} elements share id=\"{id}\""),
            impact: "JavaScript selectors will target the wrong element; invalid HTML".into(),
            remediation: "Ensure each id is unique".into(),
            evidence: None,
        })
        .collect()
}

fn empty_links(snap: &StructuralSnapshot) -> Vec<Finding> {
    snap.links
        .iter()
        .filter(|l| !l.has_visible_content)
        .map(|l| {
            let subject = match l.href.as_deref() {
                Some(href) => format!("a[href=\"{href}\"]"),
                None => "a".to_string(),
            };
            Finding {
                category: Category::AccessibilityGap,
                severity: Severity::Medium,
                subject,
                message: "Link has no text or image".into(),
                impact: "Users cannot see what the link does".into(),
                remediation: "Add text inside the link or use an image with alt text".into(),
                evidence: None,
            }
        })
        .collect()
}

fn missing_viewport(snap: &StructuralSnapshot) -> Vec<Finding> {
    if snap.has_viewport_meta {
        return Vec::new();
    }
    vec![Finding {
        category: Category::StructuralDefect,
        severity: Severity::Low,
        subject: "meta[name=\"viewport\"]".into(),
        message: "Missing viewport meta tag".into(),
        impact: "Page may not be mobile-responsive".into(),
        remediation:
            "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
                .into(),
        evidence: None,
    }]
}

fn missing_lang(snap: &StructuralSnapshot) -> Vec<Finding> {
    if snap.html_lang.is_some() {
        return Vec::new();
    }
    vec![Finding {
        category: Category::AccessibilityGap,
        severity: Severity::Low,
        subject: "html".into(),
        message: "<html> tag is missing the lang attribute".into(),
        impact: "Screen readers may not use the correct pronunciation".into(),
        remediation: "Add lang=\"en\" (or the page language) to the <html> tag".into(),
        evidence: None,
    }]
}

fn excessive_inline_styles(snap: &StructuralSnapshot) -> Vec<Finding> {
    if snap.inline_style_count <= INLINE_STYLE_LIMIT {
        return Vec::new();
    }
    vec![Finding {
        category: Category::StructuralDefect,
        severity: Severity::Warning,
        subject: "style".into(),
        message: format!("{} elements have inline styles", snap.inline_style_count),
        impact: "Harder to maintain; poor separation of concerns".into(),
        remediation: "Move styles to a CSS file".into(),
        evidence: None,
    }]
}

fn buttons_without_id(snap: &StructuralSnapshot) -> Vec<Finding> {
    let count = snap
        .buttons
        .iter()
        .filter(|b| b.id.as_deref().map_or(true, str::is_empty))
        .count();
    if count == 0 || snap.scripts.is_empty() {
        return Vec::new();
    }
    vec![Finding {
        category: Category::StructuralDefect,
        severity: Severity::Warning,
        subject: "button".into(),
        message: format!("{count} button(s) have no id while scripts are present"),
        impact: "JavaScript-bound interactivity may be unable to reach these buttons".into(),
        remediation: "Add an id attribute to buttons that need JavaScript interaction".into(),
        evidence: None,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::models::snapshot::ResourceRef;

    fn snap(markup: &str) -> StructuralSnapshot {
        extract(markup, "https://example.test/")
    }

    fn by_subject<'a>(findings: &'a [Finding], subject: &str) -> Vec<&'a Finding> {
        findings.iter().filter(|f| f.subject == subject).collect()
    }

    #[test]
    fn empty_button_without_aria_label_is_high() {
        let findings = evaluate_quality(&snap(
            "<title>t</title><button id=\"go\"></button><button aria-label=\"Close\"></button>",
        ));
        let hits = by_subject(&findings, "button#go");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].severity, Severity::High);
        assert_eq!(hits[0].category, Category::AccessibilityGap);
        assert!(hits[0].evidence.as_deref().unwrap().contains("<button"));
        // aria-label alone satisfies the rule
        assert!(by_subject(&findings, "button").is_empty());
    }

    #[test]
    fn input_without_label_is_medium_except_exempt_types() {
        let findings = evaluate_quality(&snap(
            "<title>t</title>\
             <input id=\"name\" type=\"text\">\
             <input id=\"tok\" type=\"hidden\">\
             <label for=\"mail\">Mail</label><input id=\"mail\" type=\"email\">",
        ));
        assert_eq!(by_subject(&findings, "input#name").len(), 1);
        assert!(by_subject(&findings, "input#tok").is_empty());
        assert!(by_subject(&findings, "input#mail").is_empty());
    }

    #[test]
    fn duplicate_id_yields_one_finding_per_value() {
        // Scenario: two buttons share id="submit".
        let findings = evaluate_quality(&snap(
            "<title>t</title>\
             <button id=\"submit\">A</button><button id=\"submit\">B</button>\
             <div id=\"x\"></div><span id=\"x\"></span>",
        ));
        let dups: Vec<_> = findings
            .iter()
            .filter(|f| f.category == Category::DuplicateId)
            .collect();
        assert_eq!(dups.len(), 2);
        assert!(dups.iter().all(|f| f.severity == Severity::Critical));
        assert_eq!(by_subject(&findings, "#submit").len(), 1);
        assert_eq!(by_subject(&findings, "#x").len(), 1);
    }

    #[test]
    fn missing_and_empty_titles_both_flag() {
        let none = evaluate_quality(&snap("<p>hi</p>"));
        assert_eq!(by_subject(&none, "title").len(), 1);
        let empty = evaluate_quality(&snap("<title>  </title><p>hi</p>"));
        assert_eq!(by_subject(&empty, "title").len(), 1);
        let ok = evaluate_quality(&snap("<title>Home</title>"));
        assert!(by_subject(&ok, "title").is_empty());
    }

    #[test]
    fn empty_link_flags_unless_text_or_image() {
        let findings = evaluate_quality(&snap(
            "<title>t</title>\
             <a href=\"/a\"></a>\
             <a href=\"/b\">read</a>\
             <a href=\"/c\"><img src=\"i.png\" alt=\"i\"></a>",
        ));
        assert_eq!(by_subject(&findings, "a[href=\"/a\"]").len(), 1);
        assert!(by_subject(&findings, "a[href=\"/b\"]").is_empty());
        assert!(by_subject(&findings, "a[href=\"/c\"]").is_empty());
    }

    #[test]
    fn viewport_and_lang_rules_are_low() {
        let findings = evaluate_quality(&snap("<title>t</title>"));
        let vp = by_subject(&findings, "meta[name=\"viewport\"]");
        assert_eq!(vp.len(), 1);
        assert_eq!(vp[0].severity, Severity::Low);
        let lang = by_subject(&findings, "html");
        assert_eq!(lang.len(), 1);
        assert_eq!(lang[0].category, Category::AccessibilityGap);

        let ok = evaluate_quality(&snap(
            "<html lang=\"en\"><head><meta name=\"viewport\" content=\"w\">\
             <title>t</title></head><body></body></html>",
        ));
        assert!(by_subject(&ok, "meta[name=\"viewport\"]").is_empty());
        assert!(by_subject(&ok, "html").is_empty());
    }

    #[test]
    fn inline_style_warning_needs_more_than_five() {
        let five = "<title>t</title>".to_string() + &"<div style=\"color:red\"></div>".repeat(5);
        assert!(by_subject(&evaluate_quality(&snap(&five)), "style").is_empty());
        let six = "<title>t</title>".to_string() + &"<div style=\"color:red\"></div>".repeat(6);
        let findings = evaluate_quality(&snap(&six));
        let hits = by_subject(&findings, "style");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.contains('6'));
        assert_eq!(hits[0].severity, Severity::Warning);
    }

    #[test]
    fn unidentified_buttons_warn_only_when_scripts_present() {
        let with_scripts =
            evaluate_quality(&snap("<title>t</title><button>Go</button><script></script>"));
        let hits = by_subject(&with_scripts, "button");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].message.starts_with("1 button"));

        let without_scripts = evaluate_quality(&snap("<title>t</title><button>Go</button>"));
        assert!(by_subject(&without_scripts, "button").is_empty());
    }

    #[test]
    fn panicking_rule_becomes_warning_and_others_still_run() {
        fn boom(_: &StructuralSnapshot) -> Vec<Finding> {
            panic!("broken rule");
        }
        let mut rules = catalog();
        rules.push(Rule {
            id: "boom",
            category: Category::StructuralDefect,
            severity: Severity::Warning,
            run: boom,
        });
        let findings = evaluate_rules(&rules, &snap("<p>hi</p>"));
        let failed = by_subject(&findings, "rule:boom");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].severity, Severity::Warning);
        // the missing-title rule still ran
        assert_eq!(by_subject(&findings, "title").len(), 1);
    }

    #[test]
    fn clean_page_produces_no_findings() {
        let clean = "<html lang=\"en\"><head>\
            <meta name=\"viewport\" content=\"w\"><title>Clean</title></head>\
            <body><button id=\"ok\">OK</button></body></html>";
        let s = snap(clean);
        assert_eq!(s.scripts, Vec::<ResourceRef>::new());
        assert!(evaluate_quality(&s).is_empty());
    }
}
