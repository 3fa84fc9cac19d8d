//! Aggregated outcome of a batch.

use crate::JobResult;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A source file that could not be deleted after its job succeeded.
///
/// Does not change the job's success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFailure {
    pub identity: String,
    pub path: PathBuf,
    pub message: String,
}

/// Everything a batch produced, keyed by job identity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub results: BTreeMap<String, JobResult>,
    pub succeeded: BTreeSet<String>,
    pub failed: BTreeSet<String>,
    pub removed_sources: Vec<PathBuf>,
    pub cleanup_failures: Vec<CleanupFailure>,
}

impl BatchReport {
    pub(crate) fn record(&mut self, result: JobResult) {
        if result.succeeded {
            self.succeeded.insert(result.identity.clone());
        } else {
            self.failed.insert(result.identity.clone());
        }
        self.results.insert(result.identity.clone(), result);
    }

    /// Number of jobs reported.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when every job succeeded and every requested deletion happened.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty() && self.cleanup_failures.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.all_succeeded()
    }

    /// Results of failed jobs, ordered by identity.
    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.failed
            .iter()
            .filter_map(move |identity| self.results.get(identity))
    }

    pub fn get(&self, identity: &str) -> Option<&JobResult> {
        self.results.get(identity)
    }
}
