//! Concurrent command execution for reelforge.
//!
//! This crate runs external conversion commands on a bounded worker pool:
//!
//! - [`Job`]: one command plus the identity used to report on it
//! - [`ProcessRunner`] / [`CommandRunner`]: launch one job, capture its output
//! - [`WorkerPool`]: at most K jobs at once, FIFO start, completion-order results
//! - [`BatchOrchestrator`]: run a whole batch, aggregate, delete sources of
//!   succeeded jobs
//!
//! Job failures are values ([`JobResult`] with an [`ErrorKind`]), never
//! errors; [`Error`] only covers batches that cannot start.
//!
//! # Example
//!
//! ```no_run
//! use reelforge_exec::{BatchConfig, BatchOrchestrator, Job};
//!
//! # async fn example() -> reelforge_exec::Result<()> {
//! let orchestrator = BatchOrchestrator::new(BatchConfig {
//!     max_concurrency: 4,
//!     delete_source_on_success: false,
//! })?;
//!
//! let jobs = vec![
//!     Job::argv("ffmpeg", ["-n", "-i", "a.avi", "a.mkv"], "a.avi").with_source("a.avi"),
//!     Job::argv("ffmpeg", ["-n", "-i", "b.avi", "b.mkv"], "b.avi").with_source("b.avi"),
//! ];
//! let report = orchestrator.run_batch(jobs).await?;
//! for failure in report.failures() {
//!     eprintln!("{}: {:?}", failure.identity, failure.failure_summary());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod executor;
pub mod job;
pub mod observer;
pub mod orchestrator;
pub mod pool;
pub mod report;
pub mod result;
pub mod runner;

pub use error::{Error, Result};
pub use job::{Job, JobCommand};
pub use observer::{BatchObserver, NullObserver, TracingObserver};
pub use orchestrator::{BatchConfig, BatchOrchestrator, DEFAULT_MAX_CONCURRENCY};
pub use pool::{JobHandle, JobResults, WorkerPool};
pub use report::{BatchReport, CleanupFailure};
pub use result::{ErrorKind, JobResult};
pub use runner::{CommandRunner, ProcessRunner};
