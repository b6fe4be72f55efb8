//! Job scheduling.
//!
//! The [`CronJob`] capability trait, the ordered [`JobRegistry`], and the
//! time-range simulation sweep used by the debugger.

#![warn(missing_docs)]

mod job;
mod sweep;

pub use job::{CronJob, JobRegistry, RegistryError};
pub use sweep::{simulate, SimulationResult, SWEEP_STEP_MINUTES};
