//! # Entity Search
//!
//! Command line front end for building OpenSearch candidate queries from
//! entity configurations.
//!
//! This crate provides the configuration, dependency wiring and record
//! input/output used by the `entity-search` binary.

pub mod config;
pub mod records;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur while running the tool.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The entity configuration could not be loaded.
    #[error("Entity configuration error: {0}")]
    EntityConfigError(#[from] entity_search_shared::ConfigError),

    /// Query build error.
    #[error("Query build error: {0}")]
    QueryBuildError(#[from] entity_search_repository::QueryBuildError),

    /// Record input is not valid JSON or not a record.
    #[error("Record parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
