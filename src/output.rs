//! Output rendering for check, quality, and capture commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is the
//! serialized report: `status`, severity-sorted `findings`, and a `summary`
//! of counts per severity.

use crate::models::snapshot::StructuralSnapshot;
use crate::models::{Category, Report, Severity, Verdict};
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn severity_tag(severity: Severity, color: bool) -> String {
    let tag = format!("⟦{}⟧", severity.as_str());
    if !color {
        return tag;
    }
    match severity {
        Severity::Critical | Severity::High => tag.red().bold().to_string(),
        Severity::Medium | Severity::Warning => tag.yellow().bold().to_string(),
        Severity::Low => tag.cyan().bold().to_string(),
        Severity::Info => tag.blue().bold().to_string(),
    }
}

fn severity_icon(severity: Severity, color: bool) -> String {
    let (icon, paint): (&str, fn(&str) -> String) = match severity {
        Severity::Critical | Severity::High => ("✖", |s| s.red().to_string()),
        Severity::Medium | Severity::Warning => ("▲", |s| s.yellow().to_string()),
        Severity::Low => ("◆", |s| s.cyan().to_string()),
        Severity::Info => ("◆", |s| s.blue().to_string()),
    };
    if color {
        paint(icon)
    } else {
        icon.to_string()
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::MissingElement => "missing-element",
        Category::MissingResource => "missing-resource",
        Category::DuplicateId => "duplicate-id",
        Category::AccessibilityGap => "accessibility",
        Category::StructuralDefect => "structure",
        Category::Advisory => "advisory",
    }
}

/// Print a report in the requested format.
pub fn print_report(report: &Report, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report)).unwrap()
        ),
        _ => {
            let color = use_colors(output);
            if let Some(err) = &report.error {
                if color {
                    eprintln!("{} {}", "✖ error:".red().bold(), err);
                } else {
                    eprintln!("✖ error: {}", err);
                }
                return;
            }
            for f in &report.findings {
                let subject = if color {
                    f.subject.clone().bold().to_string()
                } else {
                    f.subject.clone()
                };
                println!(
                    "{} {} {} ❲{}❳ — {}",
                    severity_icon(f.severity, color),
                    severity_tag(f.severity, color),
                    subject,
                    category_label(f.category),
                    f.message
                );
                if !f.impact.is_empty() {
                    println!("    impact: {}", f.impact);
                }
                if !f.remediation.is_empty() {
                    println!("    fix: {}", f.remediation);
                }
                if let Some(code) = &f.evidence {
                    println!("    example: {}", code);
                }
            }
            let s = &report.summary;
            let summary = format!(
                "— Summary — critical={} high={} medium={} low={} warnings={} info={}",
                s.critical, s.high, s.medium, s.low, s.warning, s.info
            );
            let verdict = match report.verdict {
                Verdict::Healthy => {
                    if color {
                        "verdict: healthy".green().bold().to_string()
                    } else {
                        "verdict: healthy".to_string()
                    }
                }
                Verdict::IssuesDetected => {
                    if color {
                        "verdict: issues detected".red().bold().to_string()
                    } else {
                        "verdict: issues detected".to_string()
                    }
                }
                Verdict::Error => "verdict: error".to_string(),
            };
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
            println!("{}", verdict);
        }
    }
}

/// Print the outcome of a baseline capture.
pub fn print_capture(snapshot: &StructuralSnapshot, path: &str, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "saved": path,
                "url": snapshot.source_url,
                "captured_at": snapshot.captured_at,
                "buttons": snapshot.buttons.len(),
                "element_ids": snapshot.all_element_ids.len(),
                "scripts": snapshot.scripts.len(),
                "stylesheets": snapshot.stylesheets.len(),
            }))
            .unwrap()
        ),
        _ => {
            let color = use_colors(output);
            let head = "📸 baseline captured:";
            if color {
                println!("{} {}", head.green().bold(), path.bold());
            } else {
                println!("{} {}", head, path);
            }
            println!("    url: {}", snapshot.source_url);
            println!(
                "    buttons={} ids={} scripts={} stylesheets={}",
                snapshot.buttons.len(),
                snapshot.all_element_ids.len(),
                snapshot.scripts.len(),
                snapshot.stylesheets.len()
            );
        }
    }
}

/// Prefix for stderr notes, colored when the terminal allows it.
pub fn note_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "ℹ note:".blue().bold().to_string()
    } else {
        "ℹ note:".to_string()
    }
}

/// Prefix for stderr errors.
pub fn error_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "✖ error:".red().bold().to_string()
    } else {
        "✖ error:".to_string()
    }
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(report: &Report) -> JsonVal {
    // Directly serialize the report, keeping a stable shape.
    serde_json::to_value(report).unwrap()
}
