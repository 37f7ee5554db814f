//! Configuration discovery and effective settings resolution.
//!
//! Pagewatch reads `pagewatch.toml|yaml|yml` from the working directory or
//! the closest ancestor and merges it with CLI flags.
//! Defaults:
//! - `baseline_dir`: `.pagewatch`
//! - `key`: `default`
//! - `output`: `human`
//! - `critical_ids`: none (the diff falls back to the full baseline id set)
//! - `verdict.fail_on`: `high`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::Severity;
use crate::verdict::VerdictThresholds;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Verdict-related configuration under `[verdict]`.
pub struct VerdictCfg {
    /// Severity token at which the run fails: critical|high|medium|low|warning|info.
    pub fail_on: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `pagewatch.toml|yaml|yml`.
pub struct PagewatchConfig {
    pub baseline_dir: Option<String>,
    pub key: Option<String>,
    pub output: Option<String>,
    /// Element ids that must survive every deployment for this app.
    #[serde(default)]
    pub critical_ids: Option<Vec<String>>,
    #[serde(default)]
    pub verdict: Option<VerdictCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub baseline_dir: PathBuf,
    pub key: String,
    pub output: String,
    pub critical_ids: Option<BTreeSet<String>>,
    pub thresholds: VerdictThresholds,
}

/// Load the nearest config file, walking up from `start`. Unreadable or
/// unparsable files are treated as absent.
pub fn load_config(start: &Path) -> Option<PagewatchConfig> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        for name in ["pagewatch.toml", "pagewatch.yaml", "pagewatch.yml"] {
            let candidate = d.join(name);
            let Ok(body) = fs::read_to_string(&candidate) else {
                continue;
            };
            let parsed = if name.ends_with(".toml") {
                toml::from_str::<PagewatchConfig>(&body).ok()
            } else {
                serde_yaml::from_str::<PagewatchConfig>(&body).ok()
            };
            if parsed.is_some() {
                return parsed;
            }
        }
        dir = d.parent();
    }
    None
}

/// Merge CLI overrides over the discovered config over defaults.
pub fn resolve_effective(
    root: Option<&str>,
    key: Option<&str>,
    output: Option<&str>,
    critical_ids: Option<&[String]>,
    fail_on: Option<&str>,
) -> Effective {
    let root = root
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let cfg = load_config(&root).unwrap_or_default();

    let baseline_dir = root.join(cfg.baseline_dir.as_deref().unwrap_or(".pagewatch"));
    let key = key
        .map(str::to_string)
        .or(cfg.key.clone())
        .unwrap_or_else(|| "default".to_string());
    let output = output
        .map(str::to_string)
        .or(cfg.output.clone())
        .unwrap_or_else(|| "human".to_string());

    let critical_ids: Option<BTreeSet<String>> = critical_ids
        .map(|ids| ids.iter().cloned().collect())
        .or_else(|| {
            cfg.critical_ids
                .as_ref()
                .map(|ids| ids.iter().cloned().collect())
        })
        .filter(|set: &BTreeSet<String>| !set.is_empty());

    let fail_on = fail_on
        .and_then(Severity::parse)
        .or_else(|| {
            cfg.verdict
                .as_ref()
                .and_then(|v| v.fail_on.as_deref())
                .and_then(Severity::parse)
        })
        .unwrap_or(Severity::High);

    Effective {
        root,
        baseline_dir,
        key,
        output,
        critical_ids,
        thresholds: VerdictThresholds { fail_on },
    }
}
