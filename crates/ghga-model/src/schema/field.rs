//! Field specifications and value kinds.

use serde::{Deserialize, Serialize};

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// Text; numbers are coerced to their decimal form.
    String,
    /// Whole numbers; numeric strings are coerced.
    Integer,
    /// ISO-8601 date or date-time.
    Timestamp,
}

impl ScalarKind {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Timestamp => "ISO-8601 timestamp",
        }
    }
}

/// How many values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// Value kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// A single primitive value.
    Scalar { scalar: ScalarKind },
    /// A list of primitive values.
    ScalarList { scalar: ScalarKind },
    /// A member of a named enumeration.
    Enumeration { enumeration: String },
    /// An embedded value object (no identity, never referenced).
    Record {
        object: String,
        cardinality: Cardinality,
    },
    /// An embedded entity or a reference token naming one.
    Relationship {
        target: String,
        cardinality: Cardinality,
    },
}

impl FieldKind {
    /// Returns true if values of this kind link to other entities.
    pub fn is_relationship(&self) -> bool {
        matches!(self, FieldKind::Relationship { .. })
    }

    /// Describe the kind for error messages.
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Scalar { scalar } => scalar.label().to_string(),
            FieldKind::ScalarList { scalar } => format!("list of {}", scalar.label()),
            FieldKind::Enumeration { enumeration } => format!("{} value", enumeration),
            FieldKind::Record {
                object,
                cardinality: Cardinality::One,
            } => format!("{} object", object),
            FieldKind::Record {
                object,
                cardinality: Cardinality::Many,
            } => format!("list of {} objects", object),
            FieldKind::Relationship {
                target,
                cardinality: Cardinality::One,
            } => format!("{} object or identifier", target),
            FieldKind::Relationship {
                target,
                cardinality: Cardinality::Many,
            } => format!("list of {} objects or identifiers", target),
        }
    }
}

/// Specification of a single field in an entity type or value object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears on the wire.
    pub name: String,
    /// Value kind.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Whether a value must be present.
    pub required: bool,
    /// Documentation only; never validated.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl FieldSpec {
    /// Create an optional field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            description: description.into(),
        }
    }

    /// Optional string field.
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Scalar {
                scalar: ScalarKind::String,
            },
            description,
        )
    }

    /// Optional integer field.
    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Scalar {
                scalar: ScalarKind::Integer,
            },
            description,
        )
    }

    /// Optional timestamp field.
    pub fn timestamp(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Scalar {
                scalar: ScalarKind::Timestamp,
            },
            description,
        )
    }

    /// Optional list-of-strings field.
    pub fn string_list(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::ScalarList {
                scalar: ScalarKind::String,
            },
            description,
        )
    }

    /// Optional enumeration field.
    pub fn enumeration(
        name: impl Into<String>,
        enumeration: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Enumeration {
                enumeration: enumeration.into(),
            },
            description,
        )
    }

    /// Optional list of embedded value objects.
    pub fn records(
        name: impl Into<String>,
        object: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Record {
                object: object.into(),
                cardinality: Cardinality::Many,
            },
            description,
        )
    }

    /// Optional single-valued relationship.
    pub fn link(
        name: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Relationship {
                target: target.into(),
                cardinality: Cardinality::One,
            },
            description,
        )
    }

    /// Optional list-valued relationship.
    pub fn links(
        name: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Relationship {
                target: target.into(),
                cardinality: Cardinality::Many,
            },
            description,
        )
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns true if this field links to other entities.
    pub fn is_relationship(&self) -> bool {
        self.kind.is_relationship()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let field = FieldSpec::links("has_member", "Individual", "Members.").required();

        assert!(field.required);
        assert!(field.is_relationship());
        assert_eq!(
            field.kind,
            FieldKind::Relationship {
                target: "Individual".into(),
                cardinality: Cardinality::Many,
            }
        );
        assert!(!FieldSpec::string("name", "").required);
    }

    #[test]
    fn test_describe() {
        assert_eq!(FieldSpec::integer("age", "").kind.describe(), "integer");
        assert_eq!(
            FieldSpec::link("has_study", "Study", "").kind.describe(),
            "Study object or identifier"
        );
        assert_eq!(
            FieldSpec::records("has_attribute", "Attribute", "").kind.describe(),
            "list of Attribute objects"
        );
    }

    #[test]
    fn test_serializes_flat() {
        let json = serde_json::to_value(FieldSpec::enumeration("sex", "BiologicalSex", "")).unwrap();
        assert_eq!(json["kind"], "enumeration");
        assert_eq!(json["enumeration"], "BiologicalSex");
        assert_eq!(json["required"], false);
    }
}
