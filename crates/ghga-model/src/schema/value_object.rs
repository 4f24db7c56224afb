//! Value objects: small embedded records with no identity.

use serde::{Deserialize, Serialize};

use super::field::FieldSpec;

/// An embedded record type. Value objects never carry relationship fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueObject {
    /// Type name, referenced by record fields.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Fields of the record.
    pub fields: Vec<FieldSpec>,
}

impl ValueObject {
    /// Create a value object with no fields.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// A key/value pair that further characterizes an entity.
    pub fn attribute() -> Self {
        Self::new("Attribute", "A key/value pair that further characterizes an entity.")
            .field(FieldSpec::string("key", "The key for an attribute.").required())
            .field(FieldSpec::string(
                "key_type",
                "A semantic type that characterizes the attribute key, usually an ontology term.",
            ))
            .field(FieldSpec::string("value", "The value for an attribute.").required())
            .field(FieldSpec::string(
                "value_type",
                "The value type that characterizes the attribute value.",
            ))
    }

    /// A parameter used in a workflow step.
    pub fn workflow_parameter() -> Self {
        Self::new(
            "WorkflowParameter",
            "A key/value pair that represents a parameter used in a Workflow Step.",
        )
        .field(FieldSpec::string("key", "Key that represents the parameter name."))
        .field(FieldSpec::string("value", "Value corresponding to the parameter key."))
    }

    /// Use conditions attached to a data access policy.
    pub fn data_use_condition() -> Self {
        Self::new(
            "DataUseCondition",
            "Use conditions associated with a Dataset, interpreted through the modifier.",
        )
        .field(FieldSpec::string(
            "permission",
            "Data use permission, typically one or more DUO terms.",
        ))
        .field(FieldSpec::string(
            "modifier",
            "Modifier for the data use permission.",
        ))
    }

    /// All value objects of the GHGA catalogue.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::attribute(),
            Self::workflow_parameter(),
            Self::data_use_condition(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_requires_key_and_value() {
        let attribute = ValueObject::attribute();
        assert!(attribute.get_field("key").unwrap().required);
        assert!(attribute.get_field("value").unwrap().required);
        assert!(!attribute.get_field("key_type").unwrap().required);
    }

    #[test]
    fn test_builtin_has_no_relationships() {
        for object in ValueObject::builtin() {
            assert!(object.fields.iter().all(|f| !f.is_relationship()));
        }
    }
}
