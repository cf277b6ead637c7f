//! relcheck - Component Release Verification CLI
//!
//! The `relcheck` command clones tagged releases of registered components,
//! runs each release's test suite in a throwaway sandbox, and writes
//! markdown/JSON reports plus per-release logs.
//!
//! Exit status is 0 when every executed test suite passed and 1 when any
//! failed or the run could not be set up.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;

use relcheck_core::{
    emit, init_tracing, Attempt, AttemptStatus, Orchestrator, ProcessRunner, Registry,
    ResolutionMode, RunDirs, SystemProcessRunner, VerifyOptions,
};

#[derive(Parser)]
#[command(name = "relcheck")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify tagged component releases against their test suites", long_about = None)]
struct Cli {
    /// Component registry YAML file
    #[arg(long, default_value = "components.yaml")]
    registry: PathBuf,

    /// Component to verify, or "all" for every registry entry
    #[arg(long, default_value = "all")]
    component: String,

    /// Version/tag prefix narrowing which releases are tested
    #[arg(long, default_value = "")]
    version_filter: String,

    /// Tag selection policy: "all-matching" or "single-latest"
    #[arg(long, default_value = "all-matching")]
    mode: String,

    /// Root directory for report artifacts
    #[arg(long, default_value = "build")]
    output: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    cmd_verify(&cli).await
}

async fn cmd_verify(cli: &Cli) -> Result<()> {
    let mode = parse_mode(&cli.mode)?;
    let registry =
        Registry::load(&cli.registry).context("failed to load component registry")?;
    let components = registry.select(&cli.component)?;

    // Report directories are part of run setup; failing to create them
    // aborts before any component is touched.
    let dirs = RunDirs::prepare(&cli.output, &cli.version_filter)
        .context("failed to prepare report directories")?;

    let options = VerifyOptions {
        version_filter: cli.version_filter.clone(),
        mode,
        install_command: registry.install_command.clone(),
        test_command: registry.test_command.clone(),
    };

    println!("Verifying {} component(s)", components.len());
    if !cli.version_filter.is_empty() {
        println!("Version filter: {}", cli.version_filter);
    }
    println!();

    let runner: Arc<dyn ProcessRunner> = Arc::new(SystemProcessRunner);
    let report = Orchestrator::run(runner, &components, &options).await;

    emit(&report, &dirs).context("failed to write reports")?;

    println!();
    for attempt in &report.attempts {
        println!(
            "  {} {} {} ({})",
            status_mark(attempt),
            attempt.component,
            attempt.version_label(),
            attempt.status.label()
        );
    }
    println!();
    println!(
        "Summary: {} passed, {} failed, {} skipped ({}ms)",
        report.passed_count(),
        report.failed_count(),
        report.skipped_count(),
        report.duration_ms
    );
    println!(
        "Reports: {:?} (mirrored to {:?})",
        dirs.run_dir, dirs.latest_dir
    );

    if report.exit_status == 0 {
        Ok(())
    } else {
        anyhow::bail!("{} release verification(s) failed", report.failed_count())
    }
}

fn parse_mode(raw: &str) -> Result<ResolutionMode> {
    match raw {
        "all-matching" => Ok(ResolutionMode::AllMatching),
        "single-latest" => Ok(ResolutionMode::SingleLatest),
        other => anyhow::bail!(
            "Unknown mode: {} (expected \"all-matching\" or \"single-latest\")",
            other
        ),
    }
}

fn status_mark(attempt: &Attempt) -> &'static str {
    match attempt.status {
        AttemptStatus::Passed => "✓",
        AttemptStatus::Failed => "✗",
        _ => "-",
    }
}
