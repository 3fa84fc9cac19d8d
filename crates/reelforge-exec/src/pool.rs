//! Bounded worker pool for external commands.
//!
//! The pool owns K execution slots. Jobs are started in submission order on
//! the first free slot and their results are yielded in completion order.

use crate::executor::{BoundedExecutor, Outputs};
use crate::{CommandRunner, Job, JobResult, ProcessRunner, Result};
use futures::{FutureExt, Stream};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

/// Receipt for a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// Zero-based submission position.
    pub sequence: usize,
    /// Identity the job's result will carry.
    pub identity: String,
}

/// Runs jobs with at most `max_workers` processes alive at once.
///
/// Must be created inside a tokio runtime. Dropping the pool, or the
/// [`JobResults`] stream returned by [`WorkerPool::collect`], before every
/// result has been received abandons the remaining work and kills running
/// children.
pub struct WorkerPool<R: ProcessRunner = CommandRunner> {
    executor: BoundedExecutor<JobResult>,
    runner: Arc<R>,
    max_workers: usize,
    submitted: usize,
}

impl WorkerPool<CommandRunner> {
    /// Create a pool that launches real child processes.
    pub fn new(max_workers: usize) -> Result<Self> {
        Self::with_runner(max_workers, Arc::new(CommandRunner::new()))
    }
}

impl<R: ProcessRunner> WorkerPool<R> {
    /// Create a pool driven by a custom runner.
    pub fn with_runner(max_workers: usize, runner: Arc<R>) -> Result<Self> {
        let executor = BoundedExecutor::new(max_workers)?;
        debug!(max_workers, "Worker pool started");
        Ok(Self {
            executor,
            runner,
            max_workers,
            submitted: 0,
        })
    }

    /// Queue a job. Returns immediately; the job starts once a slot frees up
    /// and every earlier submission has started.
    pub fn submit(&mut self, job: Job) -> Result<JobHandle> {
        let identity = job.identity().to_string();
        let runner = Arc::clone(&self.runner);
        let panicked = identity.clone();

        self.executor.submit(
            async move { runner.run(job).await }.boxed(),
            Box::new(move |message| JobResult::worker_panic(panicked, message)),
        )?;

        let handle = JobHandle {
            sequence: self.submitted,
            identity,
        };
        self.submitted += 1;
        Ok(handle)
    }

    /// Stop accepting submissions. Queued jobs still run.
    pub fn close(&mut self) {
        self.executor.close();
    }

    pub fn is_closed(&self) -> bool {
        self.executor.is_closed()
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of jobs accepted so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Close the pool and stream every result in completion order.
    ///
    /// The stream ends after the last submitted job has reported.
    pub fn collect(self) -> JobResults {
        JobResults {
            outputs: self.executor.into_outputs(),
            remaining: self.submitted,
        }
    }

    /// Close the pool and wait for all submitted jobs, discarding results.
    pub async fn shutdown(self) {
        let mut results = self.collect();
        while results.next().await.is_some() {}
    }
}

/// Results of a closed pool in completion order.
///
/// Finite and not restartable.
pub struct JobResults {
    outputs: Outputs<JobResult>,
    remaining: usize,
}

impl JobResults {
    /// Wait for the next completed job.
    pub async fn next(&mut self) -> Option<JobResult> {
        let result = self.outputs.recv().await;
        if result.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
        }
        result
    }

    /// Jobs that have not reported yet.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Stream for JobResults {
    type Item = JobResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let polled = this.outputs.poll_recv(cx);
        if let Poll::Ready(Some(_)) = &polled {
            this.remaining = this.remaining.saturating_sub(1);
        }
        polled
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::{Error, ErrorKind};
    use futures::StreamExt;
    use std::collections::BTreeSet;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_collect_reports_every_job() {
        let mut pool = WorkerPool::new(3).unwrap();
        for i in 0..6 {
            let handle = pool
                .submit(Job::shell(format!("exit {}", i % 2), format!("job-{}", i)))
                .unwrap();
            assert_eq!(handle.sequence, i);
        }

        let results: Vec<JobResult> = pool.collect().collect().await;
        assert_eq!(results.len(), 6);

        let identities: BTreeSet<_> = results.iter().map(|r| r.identity.clone()).collect();
        assert_eq!(identities.len(), 6);

        let failed = results.iter().filter(|r| !r.succeeded).count();
        assert_eq!(failed, 3);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_pool_stream_ends() {
        let pool = WorkerPool::new(2).unwrap();
        let mut results = pool.collect();
        assert_eq!(results.remaining(), 0);
        assert!(results.next().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_submit_after_close() {
        let mut pool = WorkerPool::new(1).unwrap();
        pool.close();
        assert!(pool.is_closed());
        let err = pool.submit(Job::shell("true", "a")).unwrap_err();
        assert!(matches!(err, Error::PoolClosed));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_zero_workers_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(Error::InvalidConcurrency(0))
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_launch_failure_does_not_block_siblings() {
        let mut pool = WorkerPool::new(2).unwrap();
        pool.submit(Job::argv("/nonexistent/ffmpeg", ["-version"], "missing"))
            .unwrap();
        pool.submit(Job::shell("true", "ok")).unwrap();

        let mut results = pool.collect();
        let mut seen = Vec::new();
        while let Some(result) = results.next().await {
            seen.push(result);
        }
        seen.sort_by(|a, b| a.identity.cmp(&b.identity));

        assert_eq!(seen[0].identity, "missing");
        assert_eq!(seen[0].error, Some(ErrorKind::LaunchFailure));
        assert_eq!(seen[1].identity, "ok");
        assert!(seen[1].succeeded);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_shutdown_waits_for_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");

        let mut pool = WorkerPool::new(1).unwrap();
        pool.submit(Job::shell(
            format!("sleep 0.1; touch '{}'", marker.display()),
            "slow",
        ))
        .unwrap();
        pool.shutdown().await;

        assert!(marker.exists());
    }
}
