//! cronmux command-line surface.
//!
//! Host applications embed these subcommands into their console binary,
//! wiring in their own populated [`JobRegistry`] and spawner configuration:
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use cronmux_schedule::JobRegistry;
//! use cronmux_supervisor::CommandSpawner;
//!
//! let registry = JobRegistry::new(); // populated by the host
//! let spawner = Arc::new(CommandSpawner::new("/srv/app/bin/console").with_environment("prod"));
//!
//! cronmux_cli::init_tracing();
//! cronmux_cli::run(&registry, spawner).await
//! # }
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use cronmux_core::{RunOutcome, TimeInstant};
use cronmux_schedule::{simulate, JobRegistry};
use cronmux_supervisor::{JobSpawner, Supervisor};
use tracing::Level;

/// Cron runner and debugger.
#[derive(Debug, Parser)]
#[command(name = "cron")]
#[command(about = "Run or preview scheduled cron jobs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// The two cron entry points.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Run all cron jobs scheduled for the current time
    Run,
    /// Print crons that are invoked on the given date or period of time
    Debug {
        /// Date to simulate (YYYY-MM-DD)
        date: String,
        /// Range start (HH:MM:SS, combined with the date); defaults to 00:00:00
        start_time: Option<String>,
        /// Range end (HH:MM:SS, combined with the date); defaults to the next
        /// day at 00:00:00
        end_time: Option<String>,
    },
}

/// Initialize the default tracing subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

/// Parse the process arguments and dispatch.
pub async fn run(registry: &JobRegistry, spawner: Arc<dyn JobSpawner>) -> Result<()> {
    execute(Cli::parse(), registry, spawner).await
}

/// Dispatch an already-parsed invocation.
///
/// `run` always exits successfully once the batch completes; whether any
/// job failed is visible in the aggregate line only. `debug` fails only on
/// unparsable date/time input.
pub async fn execute(cli: Cli, registry: &JobRegistry, spawner: Arc<dyn JobSpawner>) -> Result<()> {
    match cli.command {
        Commands::Run => {
            let now = TimeInstant::now();
            let supervisor = Supervisor::new(spawner);
            let summary = supervisor.run_due_jobs(registry, now).await?;

            for record in &summary.records {
                match record.outcome {
                    RunOutcome::Success => println!("{} successfully finished", record.job),
                    RunOutcome::Failed => {
                        println!("{} failed", record.job);
                        if let Some(error) = &record.error {
                            println!("- error: {error}");
                        }
                    }
                }
            }

            println!(
                "{} cron jobs successfully completed, {} failed (total jobs: {})",
                summary.succeeded, summary.failed, summary.attempted
            );
            Ok(())
        }
        Commands::Debug {
            date,
            start_time,
            end_time,
        } => {
            let (start, end) = debug_range(&date, start_time.as_deref(), end_time.as_deref())?;
            let result = simulate(registry, start, end);

            for (instant, jobs) in result.matches() {
                println!("{instant}");
                for job in jobs {
                    println!(" * {job}");
                }
            }
            Ok(())
        }
    }
}

/// Resolve the debugger's simulated range.
///
/// With no explicit times the range covers the full day: the date at
/// 00:00:00 through the next date at 00:00:00, both inclusive.
fn debug_range(
    date: &str,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<(TimeInstant, TimeInstant)> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{date}', expected YYYY-MM-DD"))?;

    let start = match start_time {
        Some(time) => TimeInstant::new(date, parse_time(time)?),
        None => TimeInstant::new(date, NaiveTime::MIN),
    };
    let end = match end_time {
        Some(time) => TimeInstant::new(date, parse_time(time)?),
        None => TimeInstant::new(
            date.succ_opt().context("date has no following day")?,
            NaiveTime::MIN,
        ),
    };

    Ok((start, end))
}

fn parse_time(time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M:%S")
        .with_context(|| format!("invalid time '{time}', expected HH:MM:SS"))
}
