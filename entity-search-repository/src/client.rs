//! Entity query client implementation.
//!
//! This module provides the main client for building search queries.
//! Application code hands it an entity configuration and one or more
//! records, and gets back OpenSearch request bodies that find candidate
//! matches for each record.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use entity_search_shared::{EntityConfig, EntityRecord, Occur, QueryDocument};

use crate::config::QueryBuilderConfig;
use crate::errors::QueryBuildError;
use crate::opensearch::{
    build_ids_query, build_search_body, get_index_settings, BoolQueryDocument,
    OpenSearchQueryBuilder,
};
use crate::types::{BatchBuildSummary, BuildResult};

/// The main client for building entity queries.
#[derive(Debug, Clone, Default)]
pub struct EntityQueryClient {
    config: QueryBuilderConfig,
}

impl EntityQueryClient {
    /// Create a new EntityQueryClient with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EntityQueryClient with custom configuration.
    pub fn with_config(config: QueryBuilderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryBuilderConfig {
        &self.config
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), QueryBuildError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(QueryBuildError::batch_size_exceeded(size, max));
            }
        }
        Ok(())
    }

    /// Check if a query exceeds the configured clause limit.
    fn validate_clause_count(&self, count: usize) -> Result<(), QueryBuildError> {
        if let Some(max) = self.config.max_clauses {
            if count > max {
                return Err(QueryBuildError::clause_limit_exceeded(count, max));
            }
        }
        Ok(())
    }

    /// Build the search request body that finds candidates for `record`.
    /// Input: EntityConfig (validated here), EntityRecord
    /// Output: Result<Value, QueryBuildError>
    pub fn build_query(
        &self,
        entity: &EntityConfig,
        record: &EntityRecord,
    ) -> Result<Value, QueryBuildError> {
        entity.validate()?;
        self.build_validated(entity, record)
    }

    /// Build a query for an entity that has already been validated.
    fn build_validated(
        &self,
        entity: &EntityConfig,
        record: &EntityRecord,
    ) -> Result<Value, QueryBuildError> {
        if let Some(id) = &record.id {
            if id.trim().is_empty() {
                return Err(QueryBuildError::validation("record id must not be blank"));
            }
        }

        // One document per query; every field contributes into it
        let builder = OpenSearchQueryBuilder::new(record);
        let mut document = BoolQueryDocument::new();
        entity.accept_all(&builder, &mut document);

        if document.is_empty() {
            return Err(QueryBuildError::empty_query(&entity.name));
        }

        if self.config.exclude_self {
            if let Some(id) = &record.id {
                document.add_clause(Occur::MustNot, build_ids_query(&[id.as_str()]));
            }
        }

        self.validate_clause_count(document.clause_count())?;

        debug!(
            entity = %entity.name,
            record_id = ?record.id,
            clause_count = document.clause_count(),
            "Built entity query"
        );

        Ok(build_search_body(
            &document,
            self.config.size,
            self.config.minimum_should_match.as_deref(),
        ))
    }

    /// Build queries for multiple records of the same entity.
    /// Input: EntityConfig, slice of EntityRecord
    /// Output: Result<BatchBuildSummary, QueryBuildError>
    ///
    /// The batch fails as a whole only when the configuration is invalid or
    /// the batch is too large. Per-record failures are reported in the summary.
    ///
    /// The batch size is limited by the configured max_batch_size (default: 1000).
    #[instrument(skip(self, entity, records), fields(entity = %entity.name, record_count = records.len()))]
    pub fn batch_build(
        &self,
        entity: &EntityConfig,
        records: &[EntityRecord],
    ) -> Result<BatchBuildSummary, QueryBuildError> {
        entity.validate()?;
        if records.is_empty() {
            return Ok(BatchBuildSummary::default());
        }

        self.validate_batch_size(records.len())?;

        let mut summary = BatchBuildSummary::default();
        for (index, record) in records.iter().enumerate() {
            let result = match self.build_validated(entity, record) {
                Ok(query) => BuildResult {
                    index,
                    record_id: record.id.clone(),
                    query: Some(query),
                    error: None,
                },
                Err(e) => {
                    warn!(index, record_id = ?record.id, error = %e, "Failed to build query");
                    BuildResult {
                        index,
                        record_id: record.id.clone(),
                        query: None,
                        error: Some(e),
                    }
                }
            };
            summary.push(result);
        }

        debug!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Built query batch"
        );
        Ok(summary)
    }

    /// Index settings and mappings for the entity, using the configured sharding.
    pub fn index_settings(&self, entity: &EntityConfig) -> Result<Value, QueryBuildError> {
        entity.validate()?;
        Ok(get_index_settings(entity, &self.config.index))
    }
}
