//! Declarative entity type definitions, before composition.

use serde::{Deserialize, Serialize};

use super::field::FieldSpec;

/// One entity type as declared: its parent, the mixins composed at this
/// level and the fields it declares itself. Inherited fields are not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeDef {
    /// Type name.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Direct ancestor; `None` only for the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Abstract types cannot be instantiated.
    #[serde(default)]
    pub is_abstract: bool,
    /// Mixins composed at this level, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,
    /// Fields declared (or redeclared) at this level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl EntityTypeDef {
    /// Create a concrete type with no parent, mixins or fields.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parent: None,
            is_abstract: false,
            mixins: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Set the direct ancestor.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Mark the type as abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Compose mixins at this level.
    pub fn mixins<I, S>(mut self, mixins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mixins.extend(mixins.into_iter().map(Into::into));
        self
    }

    /// Declare a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }
}
