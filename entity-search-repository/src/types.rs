//! Result types for query build operations.

use serde_json::Value;

use crate::errors::QueryBuildError;

/// Result of building the query for a single record in a batch.
///
/// Exactly one of `query` and `error` is set.
#[derive(Debug)]
pub struct BuildResult {
    /// Position of the record in the batch.
    pub index: usize,
    /// The record's id, if it has one.
    pub record_id: Option<String>,
    /// The search request body, if the build succeeded.
    pub query: Option<Value>,
    /// Error if the build failed.
    pub error: Option<QueryBuildError>,
}

impl BuildResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a batch build containing aggregate statistics and individual results.
///
/// A failure for one record does not stop the batch; callers inspect
/// `results` to handle partial failures.
#[derive(Debug, Default)]
pub struct BatchBuildSummary {
    /// Total number of records in the batch.
    pub total: usize,
    /// Number of queries built.
    pub succeeded: usize,
    /// Number of records that failed.
    pub failed: usize,
    /// Individual results for each record, in batch order.
    pub results: Vec<BuildResult>,
}

impl BatchBuildSummary {
    pub fn push(&mut self, result: BuildResult) {
        self.total += 1;
        if result.success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }
}
