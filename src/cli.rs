//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pagewatch",
    version,
    about = "Structural snapshot & regression checks for deployed pages",
    long_about = "Pagewatch — capture a structural baseline of a deployed page and fail a \
release when critical elements, resources, or accessibility affordances regress.\n\n\
Markup is read from a file or stdin; fetch it however you like.\n\
Configuration precedence: CLI > pagewatch.toml > defaults.",
    after_help = "Examples:\n  curl -s $URL | pagewatch capture --input - --url $URL\n  \
curl -s $URL | pagewatch check --input - --url $URL --output json\n  \
pagewatch quality --input dist/index.html --url https://app.example/",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for capturing baselines and checking deployments.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current pagewatch version.")]
    Version,
    /// Capture the current page as the named baseline
    #[command(
        about = "Capture a baseline snapshot",
        long_about = "Extract a structural snapshot from the given markup and save it as the \
baseline for later comparison. Overwrites any prior baseline under the same key.",
        after_help = "Examples:\n  curl -s $URL | pagewatch capture --input - --url $URL\n  \
pagewatch capture --input dist/index.html --url $URL --key shop"
    )]
    Capture {
        #[arg(long, help = "Markup file to read, or '-' for stdin")]
        input: String,
        #[arg(long, help = "URL the markup was fetched from (recorded in the snapshot)")]
        url: String,
        #[arg(long, help = "Working root for config/baseline discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Baseline key, one per logical application (default: default)")]
        key: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Diff against the baseline and run the quality rules
    #[command(
        about = "Check a deployment for regressions",
        long_about = "Extract a snapshot, diff it against the stored baseline (when one \
exists), evaluate the quality rule catalog, and exit non-zero when the verdict gates. \
Without a baseline, only the quality rules run.",
        after_help = "Exit codes: 0 healthy, 1 issues detected, 2 could not check."
    )]
    Check {
        #[arg(long, help = "Markup file to read, or '-' for stdin")]
        input: String,
        #[arg(long, help = "URL the markup was fetched from")]
        url: String,
        #[arg(long, help = "Working root for config/baseline discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Baseline key (default: default)")]
        key: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Element ids that must survive, comma-separated (default: full baseline id set)"
        )]
        critical_ids: Option<Vec<String>>,
        #[arg(long, help = "Fail at this severity or worse: critical|high|medium|low|warning|info")]
        fail_on: Option<String>,
    },
    /// Run the quality rule catalog only, no baseline needed
    #[command(
        about = "Run quality rules against one page",
        long_about = "Evaluate the structural/accessibility rule catalog against the given \
markup without any baseline comparison."
    )]
    Quality {
        #[arg(long, help = "Markup file to read, or '-' for stdin")]
        input: String,
        #[arg(long, help = "URL the markup was fetched from")]
        url: String,
        #[arg(long, help = "Working root for config discovery (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Fail at this severity or worse (default: high)")]
        fail_on: Option<String>,
    },
}
