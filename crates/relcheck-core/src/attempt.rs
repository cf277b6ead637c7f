//! Attempt outcomes and the aggregate run report.

use serde::Serialize;
use uuid::Uuid;

/// Outcome classification for one component/tag pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// The test suite exited with code 0.
    Passed,

    /// Checkout, installation, or the test suite exited non-zero, or a
    /// step could not be started.
    Failed,

    /// The repository had no tag matching the effective prefix, or tags
    /// could not be enumerated at all.
    NoMatchingTag { prefix: String },

    /// Neither a version filter nor a component default was available;
    /// the repository was never contacted.
    NoVersion,
}

impl AttemptStatus {
    /// Fixed display string, stable across runs so reports diff cleanly.
    pub fn label(&self) -> String {
        match self {
            AttemptStatus::Passed => "Passed".to_string(),
            AttemptStatus::Failed => "Failed".to_string(),
            AttemptStatus::NoMatchingTag { prefix } => {
                format!("No matching tag for {prefix}*")
            }
            AttemptStatus::NoVersion => "No version specified".to_string(),
        }
    }

    /// Whether a sandbox execution concluded for this status.
    pub fn executed(&self) -> bool {
        matches!(self, AttemptStatus::Passed | AttemptStatus::Failed)
    }
}

/// One verification attempt: a component paired with at most one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub component: String,

    /// Resolved tag; `None` when resolution produced nothing to execute.
    pub tag: Option<String>,

    pub status: AttemptStatus,

    /// Exit code of the concluding step; `None` when nothing executed.
    pub exit_code: Option<i32>,

    /// Captured output of the concluding step (the test suite for
    /// completed attempts, the failing setup step otherwise).
    pub log: String,

    /// Repository locator, carried through for report links.
    pub repo: String,
}

impl Attempt {
    /// Attempt that reached execution; exit code 0 passes, anything else
    /// fails.
    pub fn executed(component: &str, tag: &str, exit_code: i32, log: String, repo: &str) -> Self {
        let status = if exit_code == 0 {
            AttemptStatus::Passed
        } else {
            AttemptStatus::Failed
        };
        Self {
            component: component.to_string(),
            tag: Some(tag.to_string()),
            status,
            exit_code: Some(exit_code),
            log,
            repo: repo.to_string(),
        }
    }

    /// Attempt that never reached execution.
    pub fn skipped(component: &str, status: AttemptStatus, repo: &str) -> Self {
        Self {
            component: component.to_string(),
            tag: None,
            status,
            exit_code: None,
            log: String::new(),
            repo: repo.to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == AttemptStatus::Passed
    }

    pub fn failed(&self) -> bool {
        self.status == AttemptStatus::Failed
    }

    /// Whether a sandbox execution concluded for this attempt.
    pub fn reached_execution(&self) -> bool {
        self.status.executed()
    }

    /// Version cell for reports: the tag, or `-` for skipped attempts.
    pub fn version_label(&self) -> &str {
        self.tag.as_deref().unwrap_or("-")
    }
}

/// Flat record serialized into the machine-readable report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRecord {
    pub name: String,
    pub version: String,
    pub status: String,
    pub log: String,
    pub repo: String,
}

impl From<&Attempt> for ReportRecord {
    fn from(attempt: &Attempt) -> Self {
        Self {
            name: attempt.component.clone(),
            version: attempt.version_label().to_string(),
            status: attempt.status.label(),
            log: attempt.log.clone(),
            repo: attempt.repo.clone(),
        }
    }
}

/// Finalized, ordered aggregate of every attempt in one invocation.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,

    /// Attempts in processing order: registry order, then descending
    /// version order within a component.
    pub attempts: Vec<Attempt>,

    /// 0 when no attempt failed, 1 otherwise. Skipped attempts do not
    /// count as failures.
    pub exit_status: i32,

    pub duration_ms: u64,
}

impl RunReport {
    pub fn passed_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.attempts.iter().filter(|a| !a.reached_execution()).count()
    }
}
