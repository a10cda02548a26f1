//! Entity configuration.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;
use crate::fields::{FieldConfig, FieldKind};
use crate::visitor::FieldQueryVisitor;

/// The searchable fields of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityConfig {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

impl EntityConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<FieldConfig>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Parse and validate a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        debug!(
            entity = %config.name,
            field_count = config.fields.len(),
            "Loaded entity configuration"
        );
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Check the entity name, every field, and field name uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation("entity name is required"));
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            field.validate()?;
            if !seen.insert(field.name()) {
                return Err(ConfigError::duplicate_field(field.name()));
            }
        }

        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn fields_of_kind(&self, kind: FieldKind) -> impl Iterator<Item = &FieldConfig> {
        self.fields.iter().filter(move |f| f.kind() == kind)
    }

    /// Dispatch every field to `visitor`, in declaration order, into one document.
    pub fn accept_all<V>(&self, visitor: &V, document: &mut V::Document)
    where
        V: FieldQueryVisitor + ?Sized,
    {
        for field in &self.fields {
            field.accept(visitor, document);
        }
    }
}
