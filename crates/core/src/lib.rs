//! cronmux core data models.
//!
//! This crate defines the value types shared by the scheduler and the
//! process supervisor: calendar instants and per-run outcome records.

#![warn(missing_docs)]

mod instant;
mod run_record;

pub use instant::TimeInstant;
pub use run_record::{RunOutcome, RunRecord, RunSummary};
