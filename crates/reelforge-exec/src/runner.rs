//! External process runner.
//!
//! Runs one [`Job`] to completion and reports every outcome as a
//! [`JobResult`]. Nothing here returns an error: launch failures and failing
//! exits are data.

use crate::{ErrorKind, Job, JobCommand, JobResult};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::{debug, warn};

/// Exit statuses POSIX shells use when the target cannot be executed (126)
/// or cannot be found (127).
#[cfg(not(windows))]
const SHELL_LAUNCH_STATUSES: [i32; 2] = [126, 127];

/// Runs a single job. Implementations must not panic for ordinary process
/// failures; the pool relies on one result per job.
#[async_trait]
pub trait ProcessRunner: Send + Sync + 'static {
    async fn run(&self, job: Job) -> JobResult;
}

/// Runs jobs as real child processes.
///
/// Output is buffered in memory until the child exits. Children are spawned
/// with kill-on-drop, so abandoning the future terminates the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn run(&self, job: Job) -> JobResult {
        let started = Instant::now();

        if job.command().is_empty() {
            warn!(identity = %job.identity(), "Refusing to launch an empty command");
            return JobResult::launch_failure(job.identity(), "empty command", started.elapsed());
        }

        let mut command = build_command(job.command());
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(identity = %job.identity(), command = %job.command(), "Launching process");

        match command.output().await {
            Ok(output) => {
                let mut result = JobResult::from_output(job.identity(), output, started.elapsed());
                if is_shell_launch_failure(job.command(), result.exit_code) {
                    result.error = Some(ErrorKind::LaunchFailure);
                    result.message = Some(format!(
                        "shell could not run command (status {})",
                        result.exit_code.unwrap_or_default()
                    ));
                }

                debug!(
                    identity = %result.identity,
                    succeeded = result.succeeded,
                    exit_code = ?result.exit_code,
                    elapsed_ms = result.elapsed.as_millis() as u64,
                    "Process finished"
                );
                result
            }
            Err(e) => {
                warn!(identity = %job.identity(), error = %e, "Failed to launch process");
                JobResult::launch_failure(job.identity(), e.to_string(), started.elapsed())
            }
        }
    }
}

fn build_command(command: &JobCommand) -> Command {
    match command {
        JobCommand::Argv { program, args } => {
            let mut cmd = Command::new(program);
            cmd.args(args);
            cmd
        }
        JobCommand::Shell { line } => shell_command(line),
    }
}

#[cfg(not(windows))]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

#[cfg(windows)]
fn shell_command(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

#[cfg(not(windows))]
fn is_shell_launch_failure(command: &JobCommand, exit_code: Option<i32>) -> bool {
    matches!(command, JobCommand::Shell { .. })
        && exit_code.is_some_and(|code| SHELL_LAUNCH_STATUSES.contains(&code))
}

#[cfg(windows)]
fn is_shell_launch_failure(_command: &JobCommand, _exit_code: Option<i32>) -> bool {
    false
}
