//! Dependency initialization and wiring for the entity search tool.

use std::path::Path;
use tracing::info;

use crate::AppError;
use entity_search_repository::{EntityQueryClient, QueryBuilderConfig};
use entity_search_shared::EntityConfig;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The validated entity configuration.
    pub entity: EntityConfig,
    /// The query client configured for this run.
    pub client: EntityQueryClient,
}

impl Dependencies {
    /// Load the entity configuration and build the query client.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Path to the entity configuration JSON file
    /// * `query_config` - Query builder settings for this run
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the configuration cannot be loaded or is invalid
    pub fn new(config_path: &Path, query_config: QueryBuilderConfig) -> Result<Self, AppError> {
        if query_config.size == 0 {
            return Err(AppError::config("query size must be at least 1"));
        }

        let entity = EntityConfig::from_path(config_path)?;

        info!(
            config_path = %config_path.display(),
            entity = %entity.name,
            field_count = entity.fields.len(),
            size = query_config.size,
            "Initializing dependencies"
        );

        let client = EntityQueryClient::with_config(query_config);

        Ok(Self { entity, client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "entity-search-deps-{}-{}.json",
            std::process::id(),
            name
        ));
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_new_loads_entity() {
        let path = write_config(
            "valid",
            r#"{ "name": "company", "fields": [ { "kind": "text", "name": "legal_name" } ] }"#,
        );

        let deps = Dependencies::new(&path, QueryBuilderConfig::default()).unwrap();
        assert_eq!(deps.entity.name, "company");
        assert_eq!(deps.client.config().size, 10);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_new_rejects_zero_size() {
        let path = write_config("zero", r#"{ "name": "company" }"#);
        let config = QueryBuilderConfig {
            size: 0,
            ..QueryBuilderConfig::default()
        };

        assert!(matches!(
            Dependencies::new(&path, config),
            Err(AppError::ConfigError(_))
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_new_invalid_entity() {
        let path = write_config(
            "invalid",
            r#"{ "name": "company", "fields": [ { "kind": "number", "name": "revenue", "tolerance": -5 } ] }"#,
        );

        assert!(matches!(
            Dependencies::new(&path, QueryBuilderConfig::default()),
            Err(AppError::EntityConfigError(_))
        ));

        fs::remove_file(&path).unwrap();
    }
}
