//! Error types for the GHGA metadata model.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Category of a reported defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The schema catalogue itself is inconsistent.
    SchemaCompositionError,
    /// A required field has no value.
    MissingRequiredField,
    /// A value cannot be coerced to the field's kind.
    TypeMismatch,
    /// A value is not a member of the field's enumeration.
    InvalidEnumerationValue,
    /// The raw data names a field the entity type does not declare.
    UnknownField,
    /// A cross-field or identity invariant does not hold.
    InvariantViolation,
    /// A reference token matches no entity of the target type.
    DanglingReference,
    /// A reference token matches more than one entity by alias.
    AmbiguousReference,
    /// The declared schema version is not accepted.
    UnsupportedSchemaVersion,
    /// The batch names an entity type that is not in the catalogue.
    UnknownEntityType,
}

impl ErrorKind {
    /// Get a human-readable label for the error kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::SchemaCompositionError => "Schema Composition Error",
            ErrorKind::MissingRequiredField => "Missing Required Field",
            ErrorKind::TypeMismatch => "Type Mismatch",
            ErrorKind::InvalidEnumerationValue => "Invalid Enumeration Value",
            ErrorKind::UnknownField => "Unknown Field",
            ErrorKind::InvariantViolation => "Invariant Violation",
            ErrorKind::DanglingReference => "Dangling Reference",
            ErrorKind::AmbiguousReference => "Ambiguous Reference",
            ErrorKind::UnsupportedSchemaVersion => "Unsupported Schema Version",
            ErrorKind::UnknownEntityType => "Unknown Entity Type",
        }
    }
}

/// A single defect found while validating or resolving a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Kind of defect.
    pub kind: ErrorKind,
    /// Entity type the defect was found in.
    pub entity_type: String,
    /// Identifier of the offending entity, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Offending field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Offending raw value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(kind: ErrorKind, entity_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_type: entity_type.into(),
            entity_id: None,
            field: None,
            value: None,
            message: message.into(),
        }
    }

    /// Set the entity identifier.
    pub fn with_entity_id(mut self, id: Option<impl Into<String>>) -> Self {
        self.entity_id = id.map(Into::into);
        self
    }

    /// Set the field name.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the offending value.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.kind.label(), self.entity_type)?;
        if let Some(id) = &self.entity_id {
            write!(f, " '{}'", id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " field '{}'", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Defects in the schema catalogue, raised when it is loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Two declarations of a field cannot be merged.
    #[error("Schema composition error in '{entity_type}' field '{field}': {message}")]
    Composition {
        entity_type: String,
        field: String,
        message: String,
    },

    /// A definition refers to a name the catalogue does not contain.
    #[error("'{owner}' refers to undefined {what} '{name}'")]
    UndefinedName {
        owner: String,
        what: &'static str,
        name: String,
    },

    /// The same name is defined twice.
    #[error("Duplicate definition of {what} '{name}'")]
    Duplicate { what: &'static str, name: String },

    /// The inheritance graph is not a single tree.
    #[error("Invalid inheritance hierarchy: {0}")]
    Hierarchy(String),
}

impl SchemaError {
    /// Every catalogue defect reports as a composition error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::SchemaCompositionError
    }
}

/// A batch that failed validation, with every defect found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("batch rejected with {} error(s)", .errors.len())]
pub struct BatchRejection {
    /// Defects in the order they were found.
    pub errors: Vec<ValidationError>,
}

impl BatchRejection {
    /// Check whether any defect has the given kind.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Iterate over defects of the given kind.
    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(move |e| e.kind == kind)
    }
}

/// Main error type for model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Error reading a batch file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema catalogue could not be composed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A batch failed validation.
    #[error(transparent)]
    Rejected(#[from] BatchRejection),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    /// Defects carried by a rejected batch; empty for other errors.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            ModelError::Rejected(rejection) => &rejection.errors,
            _ => &[],
        }
    }
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
