//! Batch progress reporting.
//!
//! The orchestrator never logs batch progress on its own; it calls the
//! observer it was given. [`TracingObserver`] is the default.

use crate::{BatchReport, CleanupFailure, JobHandle, JobResult};
use std::path::Path;
use tracing::{info, warn};

/// Receives batch progress events. Every method defaults to a no-op.
///
/// Called from the task driving the batch, never concurrently.
pub trait BatchObserver: Send + Sync {
    fn job_submitted(&self, _handle: &JobHandle) {}

    fn job_finished(&self, _result: &JobResult) {}

    fn source_removed(&self, _identity: &str, _path: &Path) {}

    fn cleanup_failed(&self, _failure: &CleanupFailure) {}

    fn batch_finished(&self, _report: &BatchReport) {}
}

/// Logs batch progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl BatchObserver for TracingObserver {
    fn job_submitted(&self, handle: &JobHandle) {
        tracing::debug!(sequence = handle.sequence, identity = %handle.identity, "Job queued");
    }

    fn job_finished(&self, result: &JobResult) {
        match result.failure_summary() {
            None => info!(
                identity = %result.identity,
                elapsed_ms = result.elapsed.as_millis() as u64,
                "Job succeeded"
            ),
            Some(summary) => warn!(
                identity = %result.identity,
                error = ?result.error,
                exit_code = ?result.exit_code,
                "Job failed: {}",
                summary
            ),
        }
    }

    fn source_removed(&self, identity: &str, path: &Path) {
        info!(identity, path = %path.display(), "Removed source");
    }

    fn cleanup_failed(&self, failure: &CleanupFailure) {
        warn!(
            identity = %failure.identity,
            path = %failure.path.display(),
            "Failed to remove source: {}",
            failure.message
        );
    }

    fn batch_finished(&self, report: &BatchReport) {
        info!(
            total = report.len(),
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            cleanup_failures = report.cleanup_failures.len(),
            "Batch finished"
        );
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}
