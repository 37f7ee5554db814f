//! Pagewatch CLI binary entry point.
//! Delegates to the engine modules and maps the verdict to an exit code.

mod advisory;
mod baseline;
mod cli;
mod config;
mod diff;
mod extract;
mod models;
mod output;
mod rules;
mod verdict;

use baseline::BaselineStore;
use clap::Parser;
use cli::{Cli, Commands};
use models::Report;
use std::fs;
use std::io::Read;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Capture {
            input,
            url,
            root,
            key,
            output,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                key.as_deref(),
                output.as_deref(),
                None,
                None,
            );
            let markup = match read_input(&input) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!(
                        "{} {}",
                        output::error_prefix(),
                        format!("could not read '{}': {}", input, e)
                    );
                    std::process::exit(2);
                }
            };
            let snapshot = extract::extract(&markup, &url);
            let store = BaselineStore::new(&eff.baseline_dir);
            if let Err(e) = store.save(&eff.key, &snapshot) {
                eprintln!(
                    "{} {}",
                    output::error_prefix(),
                    format!("could not save baseline: {}", e)
                );
                std::process::exit(2);
            }
            let path = store.path_for(&eff.key);
            output::print_capture(&snapshot, &path.to_string_lossy(), &eff.output);
        }
        Commands::Check {
            input,
            url,
            root,
            key,
            output,
            critical_ids,
            fail_on,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                key.as_deref(),
                output.as_deref(),
                critical_ids.as_deref(),
                fail_on.as_deref(),
            );
            if config::load_config(&eff.root).is_none() && eff.output != "json" {
                eprintln!(
                    "{} {}",
                    output::note_prefix(),
                    "No pagewatch.toml found; using defaults."
                );
            }
            let report = match read_input(&input) {
                Ok(markup) => {
                    let current = extract::extract(&markup, &url);
                    let store = BaselineStore::new(&eff.baseline_dir);
                    match store.load(&eff.key) {
                        Ok(Some(base)) => {
                            let mut findings =
                                diff::diff(&base, &current, eff.critical_ids.as_ref());
                            findings.extend(rules::evaluate_quality(&current));
                            verdict::aggregate(Some(base), current, findings, &eff.thresholds)
                        }
                        Ok(None) => {
                            // No baseline is not a failure: fall back to the
                            // quality rules alone.
                            if eff.output != "json" {
                                eprintln!(
                                    "{} {}",
                                    output::note_prefix(),
                                    format!(
                                        "No baseline for key '{}'; running quality rules only. \
                                         Run 'pagewatch capture' to create one.",
                                        eff.key
                                    )
                                );
                            }
                            let findings = rules::evaluate_quality(&current);
                            verdict::aggregate(None, current, findings, &eff.thresholds)
                        }
                        Err(e) => verdict::error_report(format!("could not load baseline: {}", e)),
                    }
                }
                Err(e) => verdict::error_report(format!("could not read '{}': {}", input, e)),
            };
            finish(report, &eff.output);
        }
        Commands::Quality {
            input,
            url,
            root,
            output,
            fail_on,
        } => {
            let eff = config::resolve_effective(
                root.as_deref(),
                None,
                output.as_deref(),
                None,
                fail_on.as_deref(),
            );
            let report = match read_input(&input) {
                Ok(markup) => {
                    let current = extract::extract(&markup, &url);
                    let findings = rules::evaluate_quality(&current);
                    verdict::aggregate(None, current, findings, &eff.thresholds)
                }
                Err(e) => verdict::error_report(format!("could not read '{}': {}", input, e)),
            };
            finish(report, &eff.output);
        }
    }
}

/// Read markup from a file, or stdin when the path is `-`.
fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}

fn finish(report: Report, output: &str) -> ! {
    output::print_report(&report, output);
    std::process::exit(report.verdict.exit_code());
}
