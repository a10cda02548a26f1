//! Configuration error types.
//!
//! This module defines the errors that can occur while loading or
//! validating an entity configuration.

use thiserror::Error;

/// Errors that can occur while loading or validating entity configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration is not valid JSON or does not match the model.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A field or entity attribute has an invalid value.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Two fields of the same entity share a name.
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),
}

impl ConfigError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a validation error scoped to a single field.
    pub fn invalid_field(field: &str, msg: impl std::fmt::Display) -> Self {
        Self::ValidationError(format!("field '{}': {}", field, msg))
    }

    /// Create a duplicate field error.
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField(name.into())
    }
}
