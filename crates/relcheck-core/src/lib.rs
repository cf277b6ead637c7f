//! relcheck Core Library
//!
//! Re-exports core components for programmatic access to relcheck
//! functionality: component registries, release tag resolution, sandboxed
//! test execution, and report emission.

pub mod aggregator;
pub mod ansi;
pub mod attempt;
pub mod error;
pub mod fakes;
pub mod obs;
pub mod orchestrator;
pub mod process;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod sandbox;
pub mod telemetry;

pub use aggregator::ResultAggregator;

pub use ansi::ansi_to_html;

pub use attempt::{Attempt, AttemptStatus, ReportRecord, RunReport};

pub use error::{RelcheckError, Result};

pub use fakes::ScriptedRunner;

pub use obs::{
    emit_attempt_finished, emit_component_started, emit_run_finished, emit_run_started,
    AttemptSpan,
};

pub use orchestrator::{Orchestrator, VerifyOptions};

pub use process::{ProcessOutput, ProcessRunner, SystemProcessRunner};

pub use registry::{Component, Registry};

pub use report::{emit, records, render_markdown, RunDirs};

pub use resolver::{resolve, Resolution, ResolutionMode};

pub use sandbox::Sandbox;

pub use telemetry::init_tracing;

/// relcheck version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
