//! Batch orchestration: run every job, aggregate results, clean up sources.

use crate::{
    BatchObserver, BatchReport, CleanupFailure, CommandRunner, Error, Job, ProcessRunner, Result,
    TracingObserver, WorkerPool,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// Default number of concurrent jobs.
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

/// Batch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Worker slots; at least 1.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Delete each succeeded job's source once the whole batch has run.
    #[serde(default)]
    pub delete_source_on_success: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            delete_source_on_success: false,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(Error::InvalidConcurrency(self.max_concurrency));
        }
        Ok(())
    }
}

/// Runs batches of jobs on a fresh [`WorkerPool`] each time.
pub struct BatchOrchestrator<R: ProcessRunner = CommandRunner> {
    config: BatchConfig,
    runner: Arc<R>,
    observer: Arc<dyn BatchObserver>,
}

impl BatchOrchestrator<CommandRunner> {
    pub fn new(config: BatchConfig) -> Result<Self> {
        Self::with_runner(config, Arc::new(CommandRunner::new()))
    }
}

impl<R: ProcessRunner> BatchOrchestrator<R> {
    pub fn with_runner(config: BatchConfig, runner: Arc<R>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            observer: Arc::new(TracingObserver),
        })
    }

    /// Replace the default [`TracingObserver`].
    pub fn with_observer(mut self, observer: Arc<dyn BatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run every job and wait for all of them.
    ///
    /// Job failures are reported in the returned [`BatchReport`]; only a
    /// batch that cannot start (duplicate identities, no runtime) is an
    /// error.
    pub async fn run_batch(&self, jobs: Vec<Job>) -> Result<BatchReport> {
        check_unique_identities(&jobs)?;

        let mut pool =
            WorkerPool::with_runner(self.config.max_concurrency, Arc::clone(&self.runner))?;
        let mut sources = BTreeMap::new();

        for job in jobs {
            if let Some(source) = job.source() {
                sources.insert(job.identity().to_string(), source.to_path_buf());
            }
            let handle = pool.submit(job)?;
            self.observer.job_submitted(&handle);
        }

        let mut report = BatchReport::default();
        let mut results = pool.collect();
        while let Some(result) = results.next().await {
            self.observer.job_finished(&result);
            report.record(result);
        }

        if self.config.delete_source_on_success {
            self.remove_sources(&mut report, &sources).await;
        }

        self.observer.batch_finished(&report);
        Ok(report)
    }

    /// Delete the sources of succeeded jobs. Failed jobs are never touched
    /// and one failed deletion does not stop the rest.
    async fn remove_sources(&self, report: &mut BatchReport, sources: &BTreeMap<String, PathBuf>) {
        let succeeded: Vec<String> = report.succeeded.iter().cloned().collect();
        for identity in succeeded {
            let Some(path) = sources.get(&identity) else {
                continue;
            };
            match tokio::fs::remove_file(path).await {
                Ok(()) => {
                    self.observer.source_removed(&identity, path);
                    report.removed_sources.push(path.clone());
                }
                Err(e) => {
                    let failure = CleanupFailure {
                        identity,
                        path: path.clone(),
                        message: e.to_string(),
                    };
                    self.observer.cleanup_failed(&failure);
                    report.cleanup_failures.push(failure);
                }
            }
        }
    }
}

fn check_unique_identities(jobs: &[Job]) -> Result<()> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(job.identity()) {
            return Err(Error::DuplicateIdentity(job.identity().to_string()));
        }
    }
    Ok(())
}
