//! Relationship values: embedded entities, reference tokens and resolved links.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::EntityInstance;

/// A non-owning link to an entity held by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Concrete type of the target.
    pub entity_type: String,
    /// Identifier of the target.
    pub id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.entity_type, self.id)
    }
}

/// The value of one relationship slot.
///
/// Raw data yields `Embedded` for nested objects and `Reference` for bare
/// strings. Registration moves embedded entities into the registry and
/// resolution turns references into links, so a fully validated instance
/// only holds `Resolved` values.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipValue {
    /// A nested entity validated in place.
    Embedded(Box<EntityInstance>),
    /// A token naming an entity by id or alias, not yet looked up.
    Reference(String),
    /// A link to a registered entity.
    Resolved(EntityRef),
}

impl RelationshipValue {
    /// The link target, once resolved.
    pub fn target(&self) -> Option<&EntityRef> {
        match self {
            RelationshipValue::Resolved(target) => Some(target),
            _ => None,
        }
    }

    /// Returns true if the value is a resolved link.
    pub fn is_resolved(&self) -> bool {
        matches!(self, RelationshipValue::Resolved(_))
    }

    /// Render the value in wire form. Links render as the target id.
    pub fn to_json(&self) -> Value {
        match self {
            RelationshipValue::Embedded(instance) => Value::Object(instance.to_raw()),
            RelationshipValue::Reference(token) => Value::String(token.clone()),
            RelationshipValue::Resolved(target) => Value::String(target.id.clone()),
        }
    }
}
