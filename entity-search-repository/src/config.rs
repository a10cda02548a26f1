//! Configuration types for the EntityQueryClient.

use crate::opensearch::IndexSettings;

/// Default maximum number of clauses in one bool query, matching the
/// OpenSearch `indices.query.bool.max_clause_count` default.
pub const DEFAULT_MAX_CLAUSES: usize = 1024;

/// Configuration for the EntityQueryClient.
#[derive(Debug, Clone)]
pub struct QueryBuilderConfig {
    /// Number of candidate hits requested per query.
    pub size: usize,
    /// `minimum_should_match` for the top-level bool query.
    /// Only applied when the query has should clauses.
    pub minimum_should_match: Option<String>,
    /// Maximum number of clauses in a single query.
    /// Set to None to disable the limit.
    pub max_clauses: Option<usize>,
    /// Maximum number of records allowed in a single batch.
    /// Set to None to disable the limit (not recommended for production).
    pub max_batch_size: Option<usize>,
    /// Exclude the source record itself from its candidates when it has an id.
    pub exclude_self: bool,
    /// Sharding settings used when generating index mappings.
    pub index: IndexSettings,
}

impl Default for QueryBuilderConfig {
    fn default() -> Self {
        Self {
            size: 10,
            minimum_should_match: Some("1".to_string()),
            max_clauses: Some(DEFAULT_MAX_CLAUSES),
            max_batch_size: Some(1000),
            exclude_self: true,
            index: IndexSettings::default(),
        }
    }
}

impl QueryBuilderConfig {
    /// Create a config with no clause or batch size limit (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_clauses: None,
            max_batch_size: None,
            ..Self::default()
        }
    }

    /// Create a config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
            ..Self::default()
        }
    }

    /// Create a config with a custom clause limit.
    pub fn with_max_clauses(max_clauses: usize) -> Self {
        Self {
            max_clauses: Some(max_clauses),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let config = QueryBuilderConfig::default();
        assert_eq!(config.size, 10);
        assert_eq!(config.max_clauses, Some(DEFAULT_MAX_CLAUSES));
        assert_eq!(config.max_batch_size, Some(1000));
        assert!(config.exclude_self);
    }

    #[test]
    fn test_unlimited() {
        let config = QueryBuilderConfig::unlimited();
        assert!(config.max_clauses.is_none());
        assert!(config.max_batch_size.is_none());
        assert_eq!(config.minimum_should_match.as_deref(), Some("1"));
    }
}
