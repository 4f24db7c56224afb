//! First pass: check raw field maps against flattened schemas.
//!
//! Every defect of an instance is collected before giving up on it, so a
//! rejected batch reports all of its problems at once. Nested entities are
//! validated recursively as the relationship target (or the subtype named
//! by their `schema_type`). Bare strings in relationship fields are kept as
//! tokens for the resolver.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::config::{EngineConfig, StringForListPolicy};
use crate::error::{ErrorKind, ValidationError};
use crate::instance::{EntityInstance, FieldValue, Record, RelationshipValue, Timestamp};
use crate::schema::{Cardinality, Catalogue, FieldKind, FieldSpec, FlattenedSchema, ScalarKind};

use super::batch::BatchWarning;

/// Compact URI: `PREFIX:local`, e.g. `HP:0001250` or `MONDO:0005015`.
static CURIE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*:[^\s:][^\s]*$").expect("valid CURIE pattern")
});

/// Mixin whose entities are identified by ontology terms.
const ONTOLOGY_MIXIN: &str = "OntologyClass";

/// Errors and warnings gathered during a pass.
#[derive(Debug, Default)]
pub(crate) struct Findings {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<BatchWarning>,
}

/// Where a defect was found.
struct Location<'a> {
    entity_type: &'a str,
    entity_id: Option<&'a str>,
}

impl Location<'_> {
    fn error(&self, kind: ErrorKind, field: &str, message: impl Into<String>) -> ValidationError {
        ValidationError::new(kind, self.entity_type, message)
            .with_entity_id(self.entity_id)
            .with_field(field)
    }
}

/// Validates raw entities against a catalogue.
pub(crate) struct InstanceValidator<'a> {
    catalogue: &'a Catalogue,
    config: &'a EngineConfig,
}

impl<'a> InstanceValidator<'a> {
    pub fn new(catalogue: &'a Catalogue, config: &'a EngineConfig) -> Self {
        Self { catalogue, config }
    }

    /// Validate one raw entity. Returns `None` if any defect was recorded.
    pub fn validate(
        &self,
        schema: &FlattenedSchema,
        raw: &Map<String, Value>,
        findings: &mut Findings,
    ) -> Option<EntityInstance> {
        let raw_id = match raw.get("id") {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let at = Location {
            entity_type: &schema.entity_type,
            entity_id: raw_id.as_deref(),
        };
        let before = findings.errors.len();

        for (name, value) in raw {
            if schema.field(name).is_none() {
                findings.errors.push(
                    at.error(
                        ErrorKind::UnknownField,
                        name,
                        format!("{} has no field '{}'", schema.entity_type, name),
                    )
                    .with_value(value.clone()),
                );
            }
        }

        let mut fields = IndexMap::new();
        for spec in schema.fields.values() {
            match raw.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        findings.errors.push(at.error(
                            ErrorKind::MissingRequiredField,
                            &spec.name,
                            format!("a {} is required", spec.kind.describe()),
                        ));
                    }
                }
                Some(value) => {
                    if let Some(value) = self.field_value(spec, &spec.name, value, &at, findings) {
                        fields.insert(spec.name.clone(), value);
                    }
                }
            }
        }

        self.check_invariants(schema, &fields, &at, findings);

        if findings.errors.len() > before {
            return None;
        }

        let Some(FieldValue::String(id)) = fields.shift_remove("id") else {
            findings.errors.push(at.error(
                ErrorKind::MissingRequiredField,
                "id",
                "an identifier is required",
            ));
            return None;
        };
        Some(EntityInstance::new(&schema.entity_type, id, fields))
    }

    fn field_value(
        &self,
        spec: &FieldSpec,
        path: &str,
        value: &Value,
        at: &Location<'_>,
        findings: &mut Findings,
    ) -> Option<FieldValue> {
        let mismatch = |message: String| {
            at.error(ErrorKind::TypeMismatch, path, message)
                .with_value(value.clone())
        };

        match &spec.kind {
            FieldKind::Scalar { scalar } => match coerce_scalar(*scalar, value) {
                Some(value) => Some(value),
                None => {
                    findings.errors.push(mismatch(format!("expected {}", scalar.label())));
                    None
                }
            },

            FieldKind::ScalarList { scalar } => {
                let Value::Array(items) = value else {
                    findings
                        .errors
                        .push(mismatch(format!("expected a list of {}", scalar.label())));
                    return None;
                };
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match coerce_scalar(*scalar, item) {
                        Some(value) => values.push(value),
                        None => {
                            findings.errors.push(mismatch(format!(
                                "element {} is not a {}",
                                index,
                                scalar.label()
                            )));
                            return None;
                        }
                    }
                }
                Some(FieldValue::List(values))
            }

            FieldKind::Enumeration { enumeration } => {
                let Value::String(member) = value else {
                    findings
                        .errors
                        .push(mismatch(format!("expected a {} value", enumeration)));
                    return None;
                };
                let allowed = self.catalogue.enumeration(enumeration);
                if allowed.is_some_and(|e| e.contains(member)) {
                    return Some(FieldValue::Enumeration(member.clone()));
                }
                let expected = allowed.map(|e| e.values.join(", ")).unwrap_or_default();
                findings.errors.push(
                    at.error(
                        ErrorKind::InvalidEnumerationValue,
                        path,
                        format!(
                            "'{}' is not a valid {} value (expected one of: {})",
                            member, enumeration, expected
                        ),
                    )
                    .with_value(value.clone()),
                );
                None
            }

            FieldKind::Record {
                object,
                cardinality: Cardinality::One,
            } => self.record(object, path, value, at, findings).map(FieldValue::Record),

            FieldKind::Record {
                object,
                cardinality: Cardinality::Many,
            } => {
                let Value::Array(items) = value else {
                    findings
                        .errors
                        .push(mismatch(format!("expected a list of {} objects", object)));
                    return None;
                };
                let mut records = Vec::with_capacity(items.len());
                let mut valid = true;
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    match self.record(object, &item_path, item, at, findings) {
                        Some(record) => records.push(record),
                        None => valid = false,
                    }
                }
                valid.then_some(FieldValue::Records(records))
            }

            FieldKind::Relationship {
                target,
                cardinality: Cardinality::One,
            } => {
                if value.is_array() {
                    findings.errors.push(mismatch(format!(
                        "expected a single {} object or identifier",
                        target
                    )));
                    return None;
                }
                self.relationship(target, path, value, at, findings)
                    .map(FieldValue::Relationship)
            }

            FieldKind::Relationship {
                target,
                cardinality: Cardinality::Many,
            } => match value {
                Value::Array(items) => {
                    let mut slots = Vec::with_capacity(items.len());
                    let mut valid = true;
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, index);
                        if item.is_array() {
                            findings.errors.push(
                                at.error(
                                    ErrorKind::TypeMismatch,
                                    &item_path,
                                    "nested lists are not allowed",
                                )
                                .with_value(item.clone()),
                            );
                            valid = false;
                            continue;
                        }
                        match self.relationship(target, &item_path, item, at, findings) {
                            Some(slot) => slots.push(slot),
                            None => valid = false,
                        }
                    }
                    valid.then_some(FieldValue::Relationships(slots))
                }
                Value::String(_) => match self.config.string_for_list {
                    StringForListPolicy::AcceptAsSingle => {
                        findings.warnings.push(BatchWarning {
                            entity_type: at.entity_type.to_string(),
                            entity_id: at.entity_id.map(str::to_string),
                            field: path.to_string(),
                            message: format!(
                                "a single {} identifier was given where a list is expected",
                                target
                            ),
                        });
                        self.relationship(target, path, value, at, findings)
                            .map(|slot| FieldValue::Relationships(vec![slot]))
                    }
                    StringForListPolicy::Reject => {
                        findings.errors.push(mismatch(format!(
                            "expected a list of {} objects or identifiers",
                            target
                        )));
                        None
                    }
                },
                _ => {
                    findings.errors.push(mismatch(format!(
                        "expected a list of {} objects or identifiers",
                        target
                    )));
                    None
                }
            },
        }
    }

    fn record(
        &self,
        object: &str,
        path: &str,
        value: &Value,
        at: &Location<'_>,
        findings: &mut Findings,
    ) -> Option<Record> {
        let Value::Object(raw) = value else {
            findings.errors.push(
                at.error(
                    ErrorKind::TypeMismatch,
                    path,
                    format!("expected a {} object", object),
                )
                .with_value(value.clone()),
            );
            return None;
        };
        let definition = self.catalogue.value_object(object)?;
        let before = findings.errors.len();

        for (name, value) in raw {
            if definition.get_field(name).is_none() {
                findings.errors.push(
                    at.error(
                        ErrorKind::UnknownField,
                        &format!("{}.{}", path, name),
                        format!("{} has no field '{}'", object, name),
                    )
                    .with_value(value.clone()),
                );
            }
        }

        let mut fields = IndexMap::new();
        for spec in &definition.fields {
            let field_path = format!("{}.{}", path, spec.name);
            match raw.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        findings.errors.push(at.error(
                            ErrorKind::MissingRequiredField,
                            &field_path,
                            format!("a {} is required", spec.kind.describe()),
                        ));
                    }
                }
                Some(value) => {
                    if let Some(value) = self.field_value(spec, &field_path, value, at, findings) {
                        fields.insert(spec.name.clone(), value);
                    }
                }
            }
        }

        (findings.errors.len() == before).then(|| Record {
            object: object.to_string(),
            fields,
        })
    }

    fn relationship(
        &self,
        target: &str,
        path: &str,
        value: &Value,
        at: &Location<'_>,
        findings: &mut Findings,
    ) -> Option<RelationshipValue> {
        match value {
            Value::String(token) if token.trim().is_empty() => {
                findings.errors.push(
                    at.error(ErrorKind::TypeMismatch, path, "empty reference")
                        .with_value(value.clone()),
                );
                None
            }
            Value::String(token) => Some(RelationshipValue::Reference(token.clone())),
            Value::Object(raw) => {
                let declared = raw.get("schema_type").and_then(Value::as_str);
                let entity_type = declared.unwrap_or(target);
                let schema = self
                    .catalogue
                    .schema(entity_type)
                    .filter(|s| !s.is_abstract && s.is_a(target));
                let Some(schema) = schema else {
                    findings.errors.push(
                        at.error(
                            ErrorKind::InvariantViolation,
                            &format!("{}.schema_type", path),
                            format!(
                                "embedded value of type '{}' cannot stand for a {}",
                                entity_type, target
                            ),
                        )
                        .with_value(entity_type),
                    );
                    return None;
                };
                self.validate(schema, raw, findings)
                    .map(|child| RelationshipValue::Embedded(Box::new(child)))
            }
            _ => {
                findings.errors.push(
                    at.error(
                        ErrorKind::TypeMismatch,
                        path,
                        format!("expected a {} object or identifier", target),
                    )
                    .with_value(value.clone()),
                );
                None
            }
        }
    }

    fn check_invariants(
        &self,
        schema: &FlattenedSchema,
        fields: &IndexMap<String, FieldValue>,
        at: &Location<'_>,
        findings: &mut Findings,
    ) {
        let timestamp = |name: &str| fields.get(name).and_then(FieldValue::as_timestamp);
        let string = |name: &str| fields.get(name).and_then(FieldValue::as_str);

        if let Some(id) = string("id") {
            if id.trim().is_empty() {
                findings.errors.push(
                    at.error(ErrorKind::InvariantViolation, "id", "identifier must not be empty")
                        .with_value(id),
                );
            } else if schema.has_mixin(ONTOLOGY_MIXIN) && !CURIE_PATTERN.is_match(id) {
                findings.errors.push(
                    at.error(
                        ErrorKind::InvariantViolation,
                        "id",
                        format!("'{}' is not an ontology term identifier (PREFIX:local)", id),
                    )
                    .with_value(id),
                );
            }
        }

        if let Some(created) = timestamp("creation_date") {
            for later in ["update_date", "deprecation_date"] {
                if let Some(date) = timestamp(later).filter(|date| *date < created) {
                    findings.errors.push(
                        at.error(
                            ErrorKind::InvariantViolation,
                            later,
                            format!("{} precedes creation_date {}", later, created),
                        )
                        .with_value(date.to_string()),
                    );
                }
            }
        }

        if let (Some(replaced_by), Some(id)) = (string("replaced_by"), string("id")) {
            if replaced_by == id {
                findings.errors.push(
                    at.error(
                        ErrorKind::InvariantViolation,
                        "replaced_by",
                        "an entity cannot be replaced by itself",
                    )
                    .with_value(replaced_by),
                );
            }
        }

        if let Some(declared) = string("schema_type") {
            if declared != schema.entity_type {
                findings.errors.push(
                    at.error(
                        ErrorKind::InvariantViolation,
                        "schema_type",
                        format!(
                            "declared type '{}' does not match {}",
                            declared, schema.entity_type
                        ),
                    )
                    .with_value(declared),
                );
            }
        }

        if let Some(version) = string("schema_version") {
            if !self.config.accepts_version(self.catalogue.version(), version) {
                findings.errors.push(
                    at.error(
                        ErrorKind::UnsupportedSchemaVersion,
                        "schema_version",
                        self.config.version_rejection(self.catalogue.version(), version),
                    )
                    .with_value(version),
                );
            }
        }
    }
}

/// Coerce a raw value to a scalar kind.
fn coerce_scalar(kind: ScalarKind, value: &Value) -> Option<FieldValue> {
    match (kind, value) {
        (ScalarKind::String, Value::String(s)) => Some(FieldValue::String(s.clone())),
        (ScalarKind::String, Value::Number(n)) => Some(FieldValue::String(n.to_string())),
        (ScalarKind::Integer, Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                    .map(|f| f as i64)
            })
            .map(FieldValue::Integer),
        (ScalarKind::Integer, Value::String(s)) => {
            s.trim().parse::<i64>().ok().map(FieldValue::Integer)
        }
        (ScalarKind::Timestamp, Value::String(s)) => Timestamp::parse(s).map(FieldValue::Timestamp),
        _ => None,
    }
}
