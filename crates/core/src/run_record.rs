//! Run record model - the immutable outcome of one supervised job execution.

use serde::{Deserialize, Serialize};

use crate::TimeInstant;

/// How a supervised job execution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Process terminated with a success exit status.
    Success,
    /// Process terminated with a non-success exit status, or never started.
    Failed,
}

/// The outcome of one supervised job execution.
///
/// Created when the job's process terminates; immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    /// Job name
    pub job: String,

    /// When the batch this job belonged to was launched
    pub started_at: TimeInstant,

    /// When the job's process was observed terminated
    pub finished_at: TimeInstant,

    /// Wall-clock delta since the previous completion checkpoint.
    ///
    /// Deliberately not the job's individual runtime: the batch shares one
    /// stopwatch, so out-of-order completions report inter-completion deltas.
    pub elapsed: std::time::Duration,

    /// Outcome classification
    pub outcome: RunOutcome,

    /// Sanitized error message, present only on failure
    pub error: Option<String>,
}

impl RunRecord {
    /// Whether this execution succeeded.
    pub fn succeeded(&self) -> bool {
        self.outcome == RunOutcome::Success
    }
}

/// Aggregate result of one supervised batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Per-job records, in completion order
    pub records: Vec<RunRecord>,

    /// Jobs that finished with a success exit status
    pub succeeded: usize,

    /// Jobs that failed (non-success exit or failed launch)
    pub failed: usize,

    /// Size of the due set when the batch was launched
    pub attempted: usize,
}

impl RunSummary {
    /// Build a summary from completed records.
    ///
    /// `attempted` is the due-set size at launch; `succeeded + failed`
    /// always equals it once every record has been collected.
    pub fn from_records(records: Vec<RunRecord>, attempted: usize) -> Self {
        let succeeded = records.iter().filter(|r| r.succeeded()).count();
        let failed = records.len() - succeeded;
        Self {
            records,
            succeeded,
            failed,
            attempted,
        }
    }

    /// Whether every attempted job succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
