//! Error types for the entity configuration model.

mod config_error;

pub use config_error::ConfigError;
