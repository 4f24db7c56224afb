//! Capability mixins: reusable field bundles composed into entity types.

use serde::{Deserialize, Serialize};

use super::field::FieldSpec;

/// A named field bundle that is composed into entity types without being
/// part of their inheritance chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mixin {
    /// Mixin name, referenced by entity type definitions.
    pub name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Fields contributed to every composing type.
    pub fields: Vec<FieldSpec>,
}

impl Mixin {
    /// Create a mixin with no fields.
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

    pub fn accession() -> Self {
        Self::new("Accession", "Entities that can be assigned a GHGA accession.")
            .field(FieldSpec::string("accession", "A unique GHGA identifier for an entity."))
    }

    pub fn ega_accession() -> Self {
        Self::new(
            "EgaAccession",
            "Entities that can be assigned an EGA accession, in addition to a GHGA accession.",
        )
        .field(FieldSpec::string("ega_accession", "A unique EGA identifier for an entity."))
    }

    pub fn attribute() -> Self {
        Self::new("Attribute", "Entities that can have one or more attributes.").field(
            FieldSpec::records(
                "has_attribute",
                "Attribute",
                "Key/value pairs corresponding to an entity.",
            ),
        )
    }

    pub fn publication() -> Self {
        Self::new("Publication", "Entities that can be linked to publications.").field(
            FieldSpec::links(
                "has_publication",
                "Publication",
                "One or more Publication entities associated with this entity.",
            ),
        )
    }

    pub fn deprecated() -> Self {
        Self::new("Deprecated", "Entities that can be deprecated in favour of another.")
            .field(FieldSpec::string(
                "replaced_by",
                "Identifier of the entity that replaces this one.",
            ))
            .field(FieldSpec::timestamp(
                "deprecation_date",
                "Timestamp (in ISO 8601 format) when the entity was deprecated.",
            ))
    }

    pub fn release_status() -> Self {
        Self::new("ReleaseStatus", "Entities that are released to the public.")
            .field(FieldSpec::enumeration(
                "release_status",
                "ReleaseStatus",
                "The release status of an entity.",
            ))
            .field(FieldSpec::timestamp(
                "release_date",
                "Timestamp (in ISO 8601 format) when the entity was released for public consumption.",
            ))
    }

    pub fn ontology_class() -> Self {
        Self::new(
            "OntologyClass",
            "Entities that represent a class, term or concept from an ontology.",
        )
        .field(
            FieldSpec::string(
                "id",
                "The CURIE that uniquely identifies this ontology class.",
            )
            .required(),
        )
        .field(FieldSpec::string(
            "name",
            "The name or label (rdfs:label) of an ontology class.",
        ))
        .field(FieldSpec::string(
            "description",
            "The description or definition of an ontology class.",
        ))
    }

    pub fn metadata() -> Self {
        Self::new("Metadata", "Schema specific metadata about an instance.")
            .field(FieldSpec::string(
                "schema_type",
                "The schema type an instance corresponds to.",
            ))
            .field(FieldSpec::string(
                "schema_version",
                "The version of the schema an instance corresponds to.",
            ))
    }

    /// All mixins of the GHGA catalogue.
    pub fn builtin() -> Vec<Self> {
        vec![
            Self::accession(),
            Self::ega_accession(),
            Self::attribute(),
            Self::publication(),
            Self::deprecated(),
            Self::release_status(),
            Self::ontology_class(),
            Self::metadata(),
        ]
    }
}
