//! Error types for the entity search repository.

mod query_build_error;

pub use query_build_error::QueryBuildError;
