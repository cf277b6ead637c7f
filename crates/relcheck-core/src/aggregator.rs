//! Run-scoped collection of attempt outcomes.

use std::time::Instant;

use uuid::Uuid;

use crate::attempt::{Attempt, RunReport};

/// Accumulates attempts for one run and folds them into a [`RunReport`].
///
/// Owned by the orchestration loop for exactly one invocation; nothing is
/// shared or retained across runs. Recording preserves insertion order and
/// never deduplicates, so repeated tags appear as separate rows.
#[derive(Debug)]
pub struct ResultAggregator {
    run_id: Uuid,
    attempts: Vec<Attempt>,
    started: Instant,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            attempts: Vec::new(),
            started: Instant::now(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn record(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }

    /// Finalize into a report. Consumes the aggregator so a run can only
    /// be summarized once.
    pub fn summary(self) -> RunReport {
        let exit_status = if self.attempts.iter().any(|a| a.failed()) {
            1
        } else {
            0
        };
        RunReport {
            run_id: self.run_id,
            attempts: self.attempts,
            exit_status,
            duration_ms: self.started.elapsed().as_millis() as u64,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}
