//! The concurrent supervision loop.

use std::sync::Arc;
use std::time::Instant;

use cronmux_core::{RunOutcome, RunRecord, RunSummary, TimeInstant};
use cronmux_schedule::JobRegistry;
use tokio::sync::mpsc;

use crate::spawn::{ExitReport, JobSpawner, SpawnError};

/// Error type for a supervised batch.
///
/// Launch and job failures are recovered locally into run records; only a
/// broken invariant between launch and reap surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// A supervising task died without reporting its process's termination
    #[error("supervision lost {0} job process report(s)")]
    MissingReports(usize),
}

/// Strip known noise from a failed job's stderr.
///
/// Removes every `[Exception]` marker literal, then every verbatim
/// occurrence of the job's own name, then trims surrounding whitespace -
/// in that order.
pub fn sanitize_error(stderr: &str, job_name: &str) -> String {
    let without_marker = stderr.replace("[Exception]", "");
    let without_name = without_marker.replace(job_name, "");
    without_name.trim().to_string()
}

/// Runs every due job as an independent process and supervises the batch
/// to completion.
///
/// One coordinating task fans out all launches, then collects terminations
/// as they happen: each launched process gets its own supervising task that
/// blocks on natural termination and reports over a channel, so a record is
/// produced as soon as any one process finishes. There is no concurrency
/// cap, and no timeout - a process that never terminates blocks its batch
/// indefinitely.
pub struct Supervisor {
    spawner: Arc<dyn JobSpawner>,
}

impl Supervisor {
    /// Create a supervisor using the given spawner.
    pub fn new(spawner: Arc<dyn JobSpawner>) -> Self {
        Self { spawner }
    }

    /// Run all jobs due at `now` and supervise them to completion.
    ///
    /// `now` is captured once by the caller and shared by the whole batch:
    /// selection happens against it and every record carries it as
    /// `started_at`. Elapsed times are deltas between consecutive
    /// completions measured from one batch stopwatch, not per-job runtimes.
    pub async fn run_due_jobs(
        &self,
        registry: &JobRegistry,
        now: TimeInstant,
    ) -> Result<RunSummary, SupervisorError> {
        let due: Vec<String> = registry
            .jobs()
            .filter(|job| job.is_due(now.date(), now.time()))
            .map(|job| job.name().to_string())
            .collect();
        let attempted = due.len();

        tracing::info!(due = attempted, total = registry.len(), "launching due cron jobs");

        // Batch stopwatch resets here; every launch precedes any collection.
        let mut checkpoint = Instant::now();
        let mut records = Vec::with_capacity(attempted);
        let mut launched = Vec::new();

        for name in due {
            match self.spawner.launch(&name).await {
                Ok(process) => launched.push((name, process)),
                Err(e) => {
                    tracing::error!(job = %name, error_message = %e, "cron job failed to launch");
                    records.push(RunRecord {
                        job: name,
                        started_at: now,
                        finished_at: TimeInstant::now(),
                        elapsed: std::time::Duration::ZERO,
                        outcome: RunOutcome::Failed,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let expected = launched.len();
        let (tx, mut rx) = mpsc::channel::<(String, Result<ExitReport, SpawnError>)>(expected.max(1));

        for (name, process) in launched {
            let tx = tx.clone();
            tokio::spawn(async move {
                let report = process.wait().await;
                let _ = tx.send((name, report)).await;
            });
        }
        drop(tx);

        let mut received = 0;
        while let Some((name, report)) = rx.recv().await {
            received += 1;
            let finished_at = TimeInstant::now();
            let elapsed = checkpoint.elapsed();
            checkpoint = Instant::now();

            let record = match report {
                Ok(exit) if exit.success => {
                    tracing::info!(
                        job = %name,
                        started_at = %now,
                        finished_at = %finished_at,
                        elapsed = ?elapsed,
                        "cron job successfully finished"
                    );
                    RunRecord {
                        job: name,
                        started_at: now,
                        finished_at,
                        elapsed,
                        outcome: RunOutcome::Success,
                        error: None,
                    }
                }
                Ok(exit) => {
                    let message = sanitize_error(&exit.stderr, &name);
                    tracing::error!(
                        job = %name,
                        started_at = %now,
                        finished_at = %finished_at,
                        elapsed = ?elapsed,
                        exit_code = ?exit.code,
                        error_message = %message,
                        "cron job failed"
                    );
                    RunRecord {
                        job: name,
                        started_at: now,
                        finished_at,
                        elapsed,
                        outcome: RunOutcome::Failed,
                        error: Some(message),
                    }
                }
                Err(e) => {
                    tracing::error!(
                        job = %name,
                        started_at = %now,
                        finished_at = %finished_at,
                        elapsed = ?elapsed,
                        error_message = %e,
                        "cron job process could not be reaped"
                    );
                    RunRecord {
                        job: name,
                        started_at: now,
                        finished_at,
                        elapsed,
                        outcome: RunOutcome::Failed,
                        error: Some(e.to_string()),
                    }
                }
            };
            records.push(record);
        }

        if received != expected {
            return Err(SupervisorError::MissingReports(expected - received));
        }

        Ok(RunSummary::from_records(records, attempted))
    }
}
