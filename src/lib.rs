//! Pagewatch core library.
//!
//! This crate exposes programmatic APIs for capturing structural snapshots
//! of deployed pages and detecting regressions against a stored baseline
//! and/or a fixed quality rulebook.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `extract`: Snapshot extraction from raw markup.
//! - `rules`: Quality rule catalog and evaluation.
//! - `diff`: Baseline/current snapshot diffing.
//! - `verdict`: Finding aggregation into a pass/fail report.
//! - `baseline`: Keyed JSON persistence for baselines.
//! - `advisory`: Seam for an optional non-deterministic analyzer.
//! - `models`: Data models for snapshots, findings, and reports.
//! - `output`: Human/JSON printers for reports and captures.
pub mod advisory;
pub mod baseline;
pub mod cli;
pub mod config;
pub mod diff;
pub mod extract;
pub mod models;
pub mod output;
pub mod rules;
pub mod verdict;
