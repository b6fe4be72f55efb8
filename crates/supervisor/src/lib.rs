//! Process supervision.
//!
//! Launches every due job as an independent external process and tracks
//! each one from launch to termination, converting terminations into
//! structured run records.

#![warn(missing_docs)]

mod spawn;
mod supervisor;

pub use spawn::{CommandSpawner, ExitReport, JobProcess, JobSpawner, SpawnError};
pub use supervisor::{sanitize_error, Supervisor, SupervisorError};
