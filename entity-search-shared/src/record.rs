//! Entity records.
//!
//! A record carries the attribute values of one entity. Query builders read
//! the value of each configured field from the record they are given.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single attribute value.
///
/// Deserialized untagged: JSON booleans, numbers and strings map to the
/// matching variant, and `{"lat": .., "lon": ..}` objects map to
/// [`FieldValue::Location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Location { lat: f64, lon: f64 },
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `(lat, lon)`.
    pub fn as_location(&self) -> Option<(f64, f64)> {
        match self {
            FieldValue::Location { lat, lon } => Some((*lat, *lon)),
            _ => None,
        }
    }

    /// Short name of the variant, for log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::Location { .. } => "location",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// The attribute values of one entity, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Identifier of the record in the search index, if it is indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `null` entries are dropped, so they read as missing values.
    #[serde(default, deserialize_with = "deserialize_values")]
    pub values: BTreeMap<String, FieldValue>,
}

fn deserialize_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: BTreeMap<String, Option<FieldValue>> = BTreeMap::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect())
}

impl EntityRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn with_location(mut self, field: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.values.insert(field.into(), FieldValue::Location { lat, lon });
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_untagged_values() {
        let record: EntityRecord = serde_json::from_value(json!({
            "id": "p-1",
            "values": {
                "active": true,
                "age": 42,
                "name": "Ada Lovelace",
                "home": { "lat": 51.5, "lon": -0.12 }
            }
        }))
        .unwrap();

        assert_eq!(record.id.as_deref(), Some("p-1"));
        assert_eq!(record.get("active").and_then(FieldValue::as_bool), Some(true));
        assert_eq!(record.get("age").and_then(FieldValue::as_number), Some(42.0));
        assert_eq!(
            record.get("name").and_then(FieldValue::as_text),
            Some("Ada Lovelace")
        );
        assert_eq!(
            record.get("home").and_then(FieldValue::as_location),
            Some((51.5, -0.12))
        );
    }

    #[test]
    fn test_null_values_are_missing() {
        let record: EntityRecord = serde_json::from_value(json!({
            "id": "b",
            "values": { "name": "Bob", "nickname": null }
        }))
        .unwrap();

        assert_eq!(record.values.len(), 1);
        assert_eq!(record.get("name").and_then(FieldValue::as_text), Some("Bob"));
        assert!(record.get("nickname").is_none());
    }

    #[test]
    fn test_missing_sections_default() {
        let record: EntityRecord = serde_json::from_value(json!({})).unwrap();
        assert!(record.id.is_none());
        assert!(record.values.is_empty());
    }

    #[test]
    fn test_accessors_reject_other_variants() {
        let value = FieldValue::from("42");
        assert!(value.as_number().is_none());
        assert!(value.as_bool().is_none());
        assert!(value.as_location().is_none());
        assert_eq!(value.type_name(), "text");
    }

    #[test]
    fn test_builder() {
        let record = EntityRecord::new()
            .with_id("x")
            .with_value("name", "Grace")
            .with_value("age", 85.0)
            .with_location("home", 40.7, -74.0);

        assert_eq!(record.values.len(), 3);
        assert_eq!(record.get("name"), Some(&FieldValue::Text("Grace".to_string())));
        assert!(record.get("missing").is_none());
    }
}
