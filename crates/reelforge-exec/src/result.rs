//! Outcome of running one job.

use bytes::Bytes;
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::process::Output;
use std::time::Duration;

/// Why a job failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The process could not be started (missing binary, permission, empty
    /// command).
    LaunchFailure,
    /// The process ran and exited with a failing status or was killed by a
    /// signal.
    NonZeroExit,
    /// The task executing the job panicked.
    WorkerPanic,
}

/// The result of one job, owned by whoever receives it from the pool.
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub identity: String,
    pub succeeded: bool,
    /// Process exit status; `None` when the process never started or was
    /// terminated by a signal.
    pub exit_code: Option<i32>,
    #[serde(skip)]
    pub stdout: Bytes,
    #[serde(skip)]
    pub stderr: Bytes,
    pub error: Option<ErrorKind>,
    /// Human readable detail for launch failures and panics.
    pub message: Option<String>,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl JobResult {
    /// Build a result from a finished process.
    pub fn from_output(identity: impl Into<String>, output: Output, elapsed: Duration) -> Self {
        let exit_code = output.status.code();
        let succeeded = output.status.success();
        Self {
            identity: identity.into(),
            succeeded,
            exit_code,
            stdout: Bytes::from(output.stdout),
            stderr: Bytes::from(output.stderr),
            error: (!succeeded).then_some(ErrorKind::NonZeroExit),
            message: None,
            elapsed,
        }
    }

    /// Build a result for a process that could not be started.
    pub fn launch_failure(
        identity: impl Into<String>,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            identity: identity.into(),
            succeeded: false,
            exit_code: None,
            stdout: Bytes::new(),
            stderr: Bytes::new(),
            error: Some(ErrorKind::LaunchFailure),
            message: Some(message.into()),
            elapsed,
        }
    }

    /// Build a result for a job whose execution task panicked.
    pub fn worker_panic(identity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            succeeded: false,
            exit_code: None,
            stdout: Bytes::new(),
            stderr: Bytes::new(),
            error: Some(ErrorKind::WorkerPanic),
            message: Some(message.into()),
            elapsed: Duration::ZERO,
        }
    }

    /// Captured stdout decoded lossily as UTF-8.
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Captured stderr decoded lossily as UTF-8.
    pub fn stderr_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// One-line description of the failure, if any.
    ///
    /// Uses the launch/panic message when present, otherwise the last
    /// non-empty stderr line.
    pub fn failure_summary(&self) -> Option<String> {
        let kind = self.error?;
        let detail = self.message.clone().or_else(|| {
            self.stderr_lossy()
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.trim().to_string())
        });

        let head = match (kind, self.exit_code) {
            (ErrorKind::NonZeroExit, Some(code)) => format!("exited with status {}", code),
            (ErrorKind::NonZeroExit, None) => "terminated by signal".to_string(),
            (ErrorKind::LaunchFailure, _) => "failed to launch".to_string(),
            (ErrorKind::WorkerPanic, _) => "worker panicked".to_string(),
        };

        Some(match detail {
            Some(detail) => format!("{}: {}", head, detail),
            None => head,
        })
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_failure() {
        let result = JobResult::launch_failure("a", "No such file or directory", Duration::ZERO);
        assert!(!result.succeeded);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.error, Some(ErrorKind::LaunchFailure));
        assert_eq!(
            result.failure_summary().as_deref(),
            Some("failed to launch: No such file or directory")
        );
    }

    #[test]
    fn test_failure_summary_uses_last_stderr_line() {
        let mut result = JobResult::worker_panic("a", "boom");
        result.error = Some(ErrorKind::NonZeroExit);
        result.exit_code = Some(1);
        result.message = None;
        result.stderr = Bytes::from_static(b"frame=1\nInvalid data found\n\n");
        assert_eq!(
            result.failure_summary().as_deref(),
            Some("exited with status 1: Invalid data found")
        );
    }

    #[test]
    fn test_serialize_skips_buffers() {
        let result = JobResult::launch_failure("a", "missing", Duration::from_millis(1500));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["identity"], "a");
        assert_eq!(json["error"], "launch_failure");
        assert_eq!(json["elapsed_ms"], 1500);
        assert!(json.get("stdout").is_none());
    }
}
