//! Sequential verification pipeline: resolve, sandbox, execute, aggregate.
//!
//! Components are processed in registry order, one attempt at a time.
//! A failing or unresolvable component is recorded and the loop moves on;
//! only the final report decides the process exit status.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::aggregator::ResultAggregator;
use crate::attempt::{Attempt, AttemptStatus, RunReport};
use crate::obs;
use crate::process::{git_argv, ProcessRunner};
use crate::registry::Component;
use crate::resolver::{resolve, Resolution, ResolutionMode};
use crate::sandbox::Sandbox;

/// Settings for one verification run.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Version filter prefix; empty means component defaults apply.
    pub version_filter: String,

    /// Tag selection policy.
    pub mode: ResolutionMode,

    /// Dependency installation argv, run inside each sandbox.
    pub install_command: Vec<String>,

    /// Test suite argv, run inside each sandbox.
    pub test_command: Vec<String>,
}

/// Drives the full verification pipeline for a set of components.
pub struct Orchestrator;

impl Orchestrator {
    /// Process every component in order and fold all outcomes into a
    /// report. Never fails: per-component problems become attempt
    /// outcomes, and an empty component list yields an empty passing
    /// report.
    pub async fn run(
        runner: Arc<dyn ProcessRunner>,
        components: &[Component],
        options: &VerifyOptions,
    ) -> RunReport {
        let mut aggregator = ResultAggregator::new();
        let run_id = aggregator.run_id().to_string();
        obs::emit_run_started(&run_id, components.len(), &options.version_filter);

        for component in components {
            obs::emit_component_started(&component.name, &component.repo);

            match resolve(
                runner.as_ref(),
                component,
                &options.version_filter,
                options.mode,
            )
            .await
            {
                Resolution::NoVersion => {
                    let attempt =
                        Attempt::skipped(&component.name, AttemptStatus::NoVersion, &component.repo);
                    obs::emit_attempt_finished(
                        &component.name,
                        attempt.version_label(),
                        &attempt.status.label(),
                    );
                    aggregator.record(attempt);
                }
                Resolution::NoMatchingTag { prefix } => {
                    let attempt = Attempt::skipped(
                        &component.name,
                        AttemptStatus::NoMatchingTag { prefix },
                        &component.repo,
                    );
                    obs::emit_attempt_finished(
                        &component.name,
                        attempt.version_label(),
                        &attempt.status.label(),
                    );
                    aggregator.record(attempt);
                }
                Resolution::Tags(tags) => {
                    for tag in tags {
                        let attempt =
                            Self::execute_attempt(runner.as_ref(), component, &tag, options).await;
                        obs::emit_attempt_finished(&component.name, &tag, &attempt.status.label());
                        aggregator.record(attempt);
                    }
                }
            }
        }

        let report = aggregator.summary();
        obs::emit_run_finished(
            &run_id,
            report.duration_ms,
            report.attempts.len(),
            report.failed_count(),
            report.exit_status,
        );
        report
    }

    /// Run one (component, tag) attempt inside a fresh sandbox.
    ///
    /// Steps run in order (clone, checkout, install, test); the first
    /// non-zero step concludes the attempt with its exit code and output.
    /// The sandbox is removed when this returns, on every path.
    async fn execute_attempt(
        runner: &dyn ProcessRunner,
        component: &Component,
        tag: &str,
        options: &VerifyOptions,
    ) -> Attempt {
        let _span = obs::AttemptSpan::enter(&component.name, tag);

        let sandbox = match Sandbox::create(&component.name) {
            Ok(sandbox) => sandbox,
            Err(err) => {
                warn!(component = %component.name, tag = %tag, error = %err, "sandbox creation failed");
                return Attempt::executed(
                    &component.name,
                    tag,
                    -1,
                    err.to_string(),
                    &component.repo,
                );
            }
        };

        info!(
            component = %component.name,
            tag = %tag,
            sandbox = %sandbox.path().display(),
            "checking out release"
        );

        let setup: [Vec<String>; 3] = [
            git_argv(&["clone", "--quiet", "--no-checkout", &component.repo, "."]),
            git_argv(&["checkout", "--quiet", &format!("tags/{tag}")]),
            options.install_command.clone(),
        ];
        for argv in &setup {
            let (exit_code, output) = run_step(runner, argv, sandbox.path()).await;
            if exit_code != 0 {
                return Attempt::executed(&component.name, tag, exit_code, output, &component.repo);
            }
        }

        info!(component = %component.name, tag = %tag, "running test suite");
        let (exit_code, output) = run_step(runner, &options.test_command, sandbox.path()).await;
        Attempt::executed(&component.name, tag, exit_code, output, &component.repo)
    }
}

/// Run one step, folding spawn failures into a synthetic -1 exit.
async fn run_step(runner: &dyn ProcessRunner, argv: &[String], cwd: &Path) -> (i32, String) {
    match runner.execute(argv, cwd).await {
        Ok(out) => (out.exit_code, out.output),
        Err(err) => {
            warn!(command = %argv.join(" "), error = %err, "step could not be started");
            (-1, err.to_string())
        }
    }
}
