//! OpenSearch implementation of the field query contract.
//!
//! This module provides the bool query document, the per-kind clause
//! builders and index mappings for OpenSearch.

mod document;
mod index_config;
mod queries;

pub use document::{occur_key, BoolQueryDocument};
pub use index_config::{get_index_settings, IndexSettings, INDEX_DATE_FORMAT};
pub use queries::{build_ids_query, build_search_body, OpenSearchQueryBuilder};
