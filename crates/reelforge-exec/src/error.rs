//! Error types for reelforge-exec.
//!
//! Per-job failures are data ([`crate::ErrorKind`] on a
//! [`crate::JobResult`]); this type covers the few conditions that stop a
//! batch before it runs or misuse of a pool.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the pool and orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pool needs at least one worker slot.
    #[error("worker count must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    /// The pool no longer accepts submissions.
    #[error("worker pool is closed")]
    PoolClosed,

    /// Two jobs in one batch share an identity.
    #[error("duplicate job identity in batch: {0}")]
    DuplicateIdentity(String),

    /// Pools spawn their dispatcher onto the current tokio runtime.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),
}
