//! # Entity Search Repository
//!
//! This crate implements the field query contract from
//! `entity-search-shared` for OpenSearch. It includes error definitions,
//! the bool query document and clause builders, index mappings, and a
//! client that builds candidate queries for entity records.

pub mod client;
pub mod config;
pub mod errors;
pub mod opensearch;
pub mod types;

pub use client::EntityQueryClient;
pub use config::QueryBuilderConfig;
pub use errors::QueryBuildError;
pub use opensearch::{BoolQueryDocument, IndexSettings, OpenSearchQueryBuilder};
pub use types::{BatchBuildSummary, BuildResult};
