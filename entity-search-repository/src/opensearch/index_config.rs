//! OpenSearch index configuration and mappings.
//!
//! This module derives index settings and mappings from an entity
//! configuration, so that every field is indexed with the type its queries
//! expect.

use serde_json::{json, Map, Value};

use entity_search_shared::{EntityConfig, FieldConfig};

/// Date formats accepted by date fields in the index.
pub const INDEX_DATE_FORMAT: &str = "yyyy-MM-dd||strict_date_optional_time";

/// Sharding settings for an entity index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
        }
    }
}

/// Mapping for a single field.
fn field_mapping(field: &FieldConfig) -> Value {
    match field {
        FieldConfig::Keyword(_) => json!({ "type": "keyword" }),
        FieldConfig::Text(_) => json!({
            "type": "text",
            "fields": {
                "raw": {
                    "type": "keyword"
                }
            }
        }),
        FieldConfig::Number(_) => json!({ "type": "double" }),
        FieldConfig::Date(_) => json!({
            "type": "date",
            "format": INDEX_DATE_FORMAT
        }),
        FieldConfig::Location(_) => json!({ "type": "geo_point" }),
        FieldConfig::Boolean(_) => json!({ "type": "boolean" }),
    }
}

/// Get the index settings and mappings for an entity index.
///
/// | Kind     | Mapping                            |
/// |----------|------------------------------------|
/// | keyword  | `keyword`                          |
/// | text     | `text` with a `raw` keyword field  |
/// | number   | `double`                           |
/// | date     | `date`                             |
/// | location | `geo_point`                        |
/// | boolean  | `boolean`                          |
pub fn get_index_settings(entity: &EntityConfig, settings: &IndexSettings) -> Value {
    let properties: Map<String, Value> = entity
        .fields
        .iter()
        .map(|field| (field.name().to_string(), field_mapping(field)))
        .collect();

    json!({
        "settings": {
            "number_of_shards": settings.number_of_shards,
            "number_of_replicas": settings.number_of_replicas
        },
        "mappings": {
            "properties": properties
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity_search_shared::{
        BooleanField, DateField, KeywordField, LocationField, NumberField, TextField,
    };

    fn person() -> EntityConfig {
        EntityConfig::new("person")
            .with_field(KeywordField::new("national_id"))
            .with_field(TextField::new("full_name"))
            .with_field(NumberField::new("age"))
            .with_field(DateField::new("birth_date"))
            .with_field(LocationField::new("home", 10.0))
            .with_field(BooleanField::new("deceased"))
    }

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings(&person(), &IndexSettings::default());

        assert_eq!(settings["settings"]["number_of_shards"], 1);
        assert_eq!(settings["settings"]["number_of_replicas"], 1);

        let properties = settings["mappings"]["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 6);
    }

    #[test]
    fn test_field_types() {
        let settings = get_index_settings(&person(), &IndexSettings::default());
        let properties = &settings["mappings"]["properties"];

        assert_eq!(properties["national_id"]["type"], "keyword");
        assert_eq!(properties["full_name"]["type"], "text");
        assert_eq!(properties["full_name"]["fields"]["raw"]["type"], "keyword");
        assert_eq!(properties["age"]["type"], "double");
        assert_eq!(properties["birth_date"]["type"], "date");
        assert_eq!(properties["birth_date"]["format"], INDEX_DATE_FORMAT);
        assert_eq!(properties["home"]["type"], "geo_point");
        assert_eq!(properties["deceased"]["type"], "boolean");
    }

    #[test]
    fn test_custom_sharding() {
        let settings = get_index_settings(
            &EntityConfig::new("empty"),
            &IndexSettings {
                number_of_shards: 3,
                number_of_replicas: 0,
            },
        );

        assert_eq!(settings["settings"]["number_of_shards"], 3);
        assert_eq!(settings["settings"]["number_of_replicas"], 0);
        assert!(settings["mappings"]["properties"]
            .as_object()
            .unwrap()
            .is_empty());
    }
}
