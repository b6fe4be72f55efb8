//! Job capability trait and registry.

use chrono::{NaiveDate, NaiveTime};

/// Error type for job registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A job with the same name is already registered
    #[error("job '{0}' is already registered")]
    DuplicateName(String),

    /// The name cannot be dispatched as a single command-line token
    #[error("invalid job name '{0}': must be a non-empty token without whitespace")]
    InvalidName(String),
}

/// A schedulable unit of work.
///
/// Each job exposes a pure due-predicate; the business logic behind it and
/// the command the name dispatches to live outside this crate. `is_due`
/// must return the same result for identical arguments - both the sweep and
/// the supervisor call it repeatedly.
pub trait CronJob: Send + Sync {
    /// Unique job name, resolvable by the command dispatcher.
    fn name(&self) -> &str;

    /// Whether the job should run at the given date and time.
    fn is_due(&self, date: NaiveDate, time: NaiveTime) -> bool;
}

/// Ordered registry of cron jobs.
///
/// Jobs are owned by the registry for the process lifetime and iterated in
/// registration order. Name validation happens here: with a closed
/// capability trait a job cannot be malformed at run time, so the only
/// representable configuration errors are bad names.
#[derive(Default)]
pub struct JobRegistry {
    jobs: Vec<Box<dyn CronJob>>,
}

impl JobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job.
    ///
    /// Rejects empty or whitespace-containing names (the dispatcher passes
    /// the name as one process argument) and duplicates. Rejections are
    /// configuration errors: logged, never fatal to a running batch.
    pub fn register<J: CronJob + 'static>(&mut self, job: J) -> Result<(), RegistryError> {
        let name = job.name().to_string();

        if name.is_empty() || name.contains(char::is_whitespace) {
            tracing::error!(job = %name, "rejected job with undispatchable name");
            return Err(RegistryError::InvalidName(name));
        }
        if self.jobs.iter().any(|j| j.name() == name) {
            tracing::error!(job = %name, "rejected duplicate job registration");
            return Err(RegistryError::DuplicateName(name));
        }

        self.jobs.push(Box::new(job));
        Ok(())
    }

    /// Iterate jobs in registration order.
    pub fn jobs(&self) -> impl Iterator<Item = &dyn CronJob> {
        self.jobs.iter().map(|j| j.as_ref())
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRegistry")
            .field("jobs", &self.jobs.iter().map(|j| j.name()).collect::<Vec<_>>())
            .finish()
    }
}
