//! Structured observability hooks for verification run lifecycle events.
//!
//! This module provides:
//! - Attempt-scoped tracing spans via the `AttemptSpan` RAII guard
//! - Emission functions for key lifecycle events: run start, component
//!   start, attempt finish, run finish
//!
//! Events are emitted at `info!` level and respect `RUST_LOG` filtering.

use tracing::info;

/// RAII guard that enters a tracing span for the duration of one
/// (component, tag) attempt.
///
/// # Example
///
/// ```ignore
/// let _span = AttemptSpan::enter("lib-parser", "1.2.3");
/// // Tracing calls are now associated with component and tag fields
/// ```
pub struct AttemptSpan {
    _span: tracing::span::EnteredSpan,
}

impl AttemptSpan {
    /// Create and enter a span tagged with the component and tag.
    pub fn enter(component: &str, tag: &str) -> Self {
        let span = tracing::info_span!("relcheck.attempt", component = %component, tag = %tag);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: verification run started.
pub fn emit_run_started(run_id: &str, components: usize, version_filter: &str) {
    info!(
        event = "run.started",
        run_id = %run_id,
        components = components,
        version_filter = %version_filter,
    );
}

/// Emit event: one component's processing started.
pub fn emit_component_started(component: &str, repo: &str) {
    info!(event = "component.started", component = %component, repo = %repo);
}

/// Emit event: one attempt finished with its outcome.
pub fn emit_attempt_finished(component: &str, version: &str, status: &str) {
    info!(
        event = "attempt.finished",
        component = %component,
        version = %version,
        status = %status,
    );
}

/// Emit event: verification run finished with aggregate counts.
pub fn emit_run_finished(run_id: &str, duration_ms: u64, attempts: usize, failed: usize, exit_status: i32) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        attempts = attempts,
        failed = failed,
        exit_status = exit_status,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_span_create() {
        // Just ensure AttemptSpan::enter doesn't panic
        let _span = AttemptSpan::enter("lib-parser", "1.2.3");
    }
}
