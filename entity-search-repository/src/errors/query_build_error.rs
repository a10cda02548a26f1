//! Query build error types.
//!
//! This module defines the errors that can occur while building a search
//! query for an entity record.

use thiserror::Error;

use entity_search_shared::ConfigError;

/// Errors that can occur while building entity queries.
#[derive(Error, Debug)]
pub enum QueryBuildError {
    /// The entity configuration failed validation.
    #[error("Invalid entity configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The record or request is invalid.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// No field produced a clause, so the query would match everything.
    #[error("No clauses built for entity '{0}'")]
    EmptyQuery(String),

    /// The query has more clauses than the configured maximum.
    #[error("Query has {provided} clauses, exceeding maximum {max}")]
    ClauseLimitExceeded { provided: usize, max: usize },

    /// Batch size exceeds configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },
}

impl QueryBuildError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an empty query error.
    pub fn empty_query(entity: impl Into<String>) -> Self {
        Self::EmptyQuery(entity.into())
    }

    /// Create a clause limit exceeded error.
    pub fn clause_limit_exceeded(provided: usize, max: usize) -> Self {
        Self::ClauseLimitExceeded { provided, max }
    }

    /// Create a batch size exceeded error.
    pub fn batch_size_exceeded(provided: usize, max: usize) -> Self {
        Self::BatchSizeExceeded { provided, max }
    }
}
