//! Validated entity instances.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::relationship::{EntityRef, RelationshipValue};
use super::value::{FieldValue, Timestamp};

/// A value conforming to one entity type.
///
/// Instances are only produced by validation and are never edited in place;
/// a corrected entity is a new validation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInstance {
    entity_type: String,
    id: String,
    fields: IndexMap<String, FieldValue>,
}

impl EntityInstance {
    pub(crate) fn new(
        entity_type: impl Into<String>,
        id: impl Into<String>,
        fields: IndexMap<String, FieldValue>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            fields,
        }
    }

    /// Entity type this instance was validated as.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Globally unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Local alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.string("alias")
    }

    /// Schema version recorded on the instance, if any.
    pub fn schema_version(&self) -> Option<&str> {
        self.string("schema_version")
    }

    /// Link to this instance.
    pub fn reference(&self) -> EntityRef {
        EntityRef::new(&self.entity_type, &self.id)
    }

    /// Get a field value. The identifier is not part of the field table.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns true if the field has a value.
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Get a string or enumeration field.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Get a timestamp field.
    pub fn timestamp(&self, name: &str) -> Option<Timestamp> {
        self.get(name).and_then(FieldValue::as_timestamp)
    }

    /// Resolved targets of a relationship field, in order.
    pub fn links(&self, name: &str) -> Vec<&EntityRef> {
        self.get(name)
            .map(|value| {
                value
                    .relationships()
                    .iter()
                    .filter_map(RelationshipValue::target)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Iterate over field names and values in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn fields_mut(&mut self) -> &mut IndexMap<String, FieldValue> {
        &mut self.fields
    }

    /// Render the instance in wire form, identifier first.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert("id".to_string(), Value::String(self.id.clone()));
        for (name, value) in &self.fields {
            raw.insert(name.clone(), value.to_json());
        }
        raw
    }
}

impl Serialize for EntityInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}
