//! Raw and validated batches.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, Result};
use crate::instance::{EntityInstance, EntityRef};

use super::registry::Registry;

/// Untyped submission data: entity type name to a list of raw field maps.
///
/// ```json
/// {"schema_version": "0.5.0", "Study": [{"id": "STU:1", ...}], "Sample": [...]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBatch {
    /// Declared schema version of the whole batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    /// Raw entities grouped by declared type, in input order. Entries that
    /// are not JSON objects are kept and reported when validated.
    #[serde(flatten)]
    pub entities: IndexMap<String, Vec<Value>>,
}

impl RawBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the batch schema version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = Some(version.into());
        self
    }

    /// Append a raw entity of the given type.
    pub fn push(&mut self, entity_type: impl Into<String>, raw: Value) {
        self.entities.entry(entity_type.into()).or_default().push(raw);
    }

    /// Builder form of [`RawBatch::push`].
    pub fn with_entity(mut self, entity_type: impl Into<String>, raw: Value) -> Self {
        self.push(entity_type, raw);
        self
    }

    /// Parse a batch from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a batch from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Serialize the batch as JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of raw entities.
    pub fn len(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }

    /// Returns true if the batch holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A non-fatal observation made while validating a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWarning {
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub field: String,
    pub message: String,
}

/// A fully validated batch in which every relationship is resolved.
#[derive(Debug, Clone)]
pub struct ValidatedBatch {
    schema_version: String,
    registry: Registry,
    warnings: Vec<BatchWarning>,
}

impl ValidatedBatch {
    pub(crate) fn new(schema_version: String, registry: Registry, warnings: Vec<BatchWarning>) -> Self {
        Self {
            schema_version,
            registry,
            warnings,
        }
    }

    /// Schema version the batch was validated against.
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Warnings raised while validating.
    pub fn warnings(&self) -> &[BatchWarning] {
        &self.warnings
    }

    /// Look up an entity by id.
    pub fn get(&self, id: &str) -> Option<&EntityInstance> {
        self.registry.get(id)
    }

    /// Follow a resolved link.
    pub fn follow(&self, link: &EntityRef) -> Option<&EntityInstance> {
        self.registry.follow(link)
    }

    /// Entities whose concrete type is exactly `entity_type`.
    pub fn of_type<'a>(&'a self, entity_type: &'a str) -> impl Iterator<Item = &'a EntityInstance> {
        self.registry
            .iter()
            .filter(move |e| e.entity_type() == entity_type)
    }

    /// Iterate over all entities, embedded ones included, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityInstance> {
        self.registry.iter()
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns true if the batch holds no entities.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Render the batch in wire form with every link written as an id.
    ///
    /// Embedded entities appear under their own type, so the result
    /// validates back to an equivalent batch.
    pub fn to_raw_batch(&self) -> RawBatch {
        let mut raw = RawBatch::new().with_version(self.schema_version.clone());
        for entity in self.registry.iter() {
            raw.entities
                .entry(entity.entity_type().to_string())
                .or_default()
                .push(Value::Object(entity.to_raw()));
        }
        raw
    }
}

impl Serialize for ValidatedBatch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_raw_batch().serialize(serializer)
    }
}
