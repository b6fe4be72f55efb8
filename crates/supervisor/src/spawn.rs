//! External process seam.
//!
//! The supervisor only needs to start "run job X" as an OS process and
//! later learn its exit status and captured stderr; this module is that
//! seam plus the `tokio::process` implementation.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

/// Error type for launching and reaping job processes.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    /// The process could not be started or reaped
    #[error("process error: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal state of a job process.
#[derive(Debug, Clone)]
pub struct ExitReport {
    /// Whether the exit status was success
    pub success: bool,

    /// Raw exit code, when the platform reports one
    pub code: Option<i32>,

    /// Captured standard-error text
    pub stderr: String,
}

/// A launched job process, exclusively owned until its termination is observed.
#[async_trait]
pub trait JobProcess: Send {
    /// Block until the process terminates naturally and report its exit.
    async fn wait(self: Box<Self>) -> Result<ExitReport, SpawnError>;
}

/// Launches one external process per job.
#[async_trait]
pub trait JobSpawner: Send + Sync {
    /// Start the process that runs `job_name`. Returns immediately after launch.
    async fn launch(&self, job_name: &str) -> Result<Box<dyn JobProcess>, SpawnError>;
}

/// Spawner that dispatches jobs through a console binary.
///
/// Runs `<program> <base args..> <job name> [--env=<environment>]` with
/// stderr captured, mirroring how the job names registered in the registry
/// resolve back to invocable commands.
#[derive(Debug, Clone)]
pub struct CommandSpawner {
    program: PathBuf,
    args: Vec<String>,
    environment: Option<String>,
}

impl CommandSpawner {
    /// Create a spawner for the given dispatch program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            environment: None,
        }
    }

    /// Arguments inserted before the job name.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Deployment environment passed through to every job process.
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }
}

#[async_trait]
impl JobSpawner for CommandSpawner {
    async fn launch(&self, job_name: &str) -> Result<Box<dyn JobProcess>, SpawnError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(job_name);
        if let Some(environment) = &self.environment {
            cmd.arg(format!("--env={environment}"));
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = cmd.spawn()?;
        Ok(Box::new(ChildProcess { child }))
    }
}

struct ChildProcess {
    child: tokio::process::Child,
}

#[async_trait]
impl JobProcess for ChildProcess {
    async fn wait(self: Box<Self>) -> Result<ExitReport, SpawnError> {
        let output = self.child.wait_with_output().await?;
        Ok(ExitReport {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawner_configuration() {
        let spawner = CommandSpawner::new("/srv/app/bin/console")
            .with_args(["cron-job".to_string()])
            .with_environment("prod");

        assert_eq!(spawner.program, PathBuf::from("/srv/app/bin/console"));
        assert_eq!(spawner.args, ["cron-job"]);
        assert_eq!(spawner.environment.as_deref(), Some("prod"));
    }

    #[tokio::test]
    async fn test_launch_missing_program_fails() {
        let spawner = CommandSpawner::new("/nonexistent/cronmux-dispatch");
        assert!(spawner.launch("app.cleanup").await.is_err());
    }
}
