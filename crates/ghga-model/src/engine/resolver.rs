//! Second pass: turn reference tokens into links.

use tracing::{debug, warn};

use crate::error::{ErrorKind, ValidationError};
use crate::instance::{EntityRef, FieldValue, RelationshipValue};
use crate::schema::{Catalogue, FieldKind};

use super::registry::{Lookup, Registry};

/// A token that resolved, waiting to be written back.
struct Binding {
    id: String,
    field: String,
    index: usize,
    target: EntityRef,
}

/// Resolve every reference token held by the registry.
///
/// Lookups run against the complete registry before anything is written,
/// so the outcome does not depend on registration order. List fields stop
/// at their first unresolved element. When any token fails the registry is
/// left untouched.
pub(crate) fn resolve(registry: &mut Registry, catalogue: &Catalogue) -> Vec<ValidationError> {
    let mut bindings = Vec::new();
    let mut errors = Vec::new();

    for entity in registry.iter() {
        let Some(schema) = catalogue.schema(entity.entity_type()) else {
            continue;
        };
        for spec in schema.relationship_fields() {
            let FieldKind::Relationship { target, .. } = &spec.kind else {
                continue;
            };
            let Some(value) = entity.get(&spec.name) else {
                continue;
            };

            for (index, slot) in value.relationships().iter().enumerate() {
                let RelationshipValue::Reference(token) = slot else {
                    continue;
                };
                let error = |kind: ErrorKind, message: String| {
                    ValidationError::new(kind, entity.entity_type(), message)
                        .with_entity_id(Some(entity.id()))
                        .with_field(spec.name.as_str())
                        .with_value(token.as_str())
                };

                match registry.lookup(token, target, catalogue) {
                    Lookup::Found(found) => bindings.push(Binding {
                        id: entity.id().to_string(),
                        field: spec.name.clone(),
                        index,
                        target: found.reference(),
                    }),
                    Lookup::Missing => {
                        errors.push(error(
                            ErrorKind::DanglingReference,
                            format!("no {} has id or alias '{}'", target, token),
                        ));
                        break;
                    }
                    Lookup::WrongType(found) => {
                        errors.push(error(
                            ErrorKind::DanglingReference,
                            format!(
                                "no {} has id or alias '{}' (it names a {})",
                                target,
                                token,
                                found.entity_type()
                            ),
                        ));
                        break;
                    }
                    Lookup::Ambiguous(ids) => {
                        warn!(
                            entity = entity.id(),
                            field = %spec.name,
                            alias = %token,
                            candidates = ids.len(),
                            "ambiguous alias reference"
                        );
                        errors.push(error(
                            ErrorKind::AmbiguousReference,
                            format!(
                                "alias '{}' matches {} {} entities ({})",
                                token,
                                ids.len(),
                                target,
                                ids.join(", ")
                            ),
                        ));
                        break;
                    }
                }
            }
        }
    }

    if !errors.is_empty() {
        return errors;
    }

    debug!(links = bindings.len(), "resolved reference tokens");
    for binding in bindings {
        let Some(value) = registry
            .get_mut(&binding.id)
            .and_then(|entity| entity.fields_mut().get_mut(&binding.field))
        else {
            continue;
        };
        let slot = match value {
            FieldValue::Relationship(slot) if binding.index == 0 => Some(slot),
            FieldValue::Relationships(slots) => slots.get_mut(binding.index),
            _ => None,
        };
        if let Some(slot) = slot {
            *slot = RelationshipValue::Resolved(binding.target);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::EntityInstance;
    use indexmap::IndexMap;

    fn entity(entity_type: &str, id: &str, fields: Vec<(&str, FieldValue)>) -> EntityInstance {
        let fields: IndexMap<String, FieldValue> = fields
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        EntityInstance::new(entity_type, id, fields)
    }

    fn reference(token: &str) -> RelationshipValue {
        RelationshipValue::Reference(token.to_string())
    }

    #[test]
    fn test_resolves_forward_and_backward_references() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry
            .register(entity(
                "Individual",
                "IND:1",
                vec![(
                    "has_children",
                    FieldValue::Relationships(vec![reference("IND:2")]),
                )],
            ))
            .unwrap();
        registry
            .register(entity(
                "Individual",
                "IND:2",
                vec![(
                    "has_parent",
                    FieldValue::Relationships(vec![reference("IND:1")]),
                )],
            ))
            .unwrap();

        let errors = resolve(&mut registry, catalogue);

        assert!(errors.is_empty());
        let parent = registry.get("IND:1").unwrap();
        assert_eq!(parent.links("has_children")[0].id, "IND:2");
        let child = registry.get("IND:2").unwrap();
        assert_eq!(child.links("has_parent")[0].id, "IND:1");
    }

    #[test]
    fn test_many_field_stops_at_first_unresolved() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry
            .register(entity(
                "Individual",
                "IND:1",
                vec![(
                    "has_parent",
                    FieldValue::Relationships(vec![reference("nope-1"), reference("nope-2")]),
                )],
            ))
            .unwrap();

        let errors = resolve(&mut registry, catalogue);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::DanglingReference);
        assert_eq!(errors[0].value, Some(serde_json::json!("nope-1")));
    }

    #[test]
    fn test_wrong_type_is_dangling() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry.register(entity("Study", "STU:1", vec![])).unwrap();
        registry
            .register(entity(
                "Sample",
                "SAM:1",
                vec![(
                    "has_individual",
                    FieldValue::Relationship(reference("STU:1")),
                )],
            ))
            .unwrap();

        let errors = resolve(&mut registry, catalogue);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::DanglingReference);
        assert_eq!(errors[0].field.as_deref(), Some("has_individual"));
        assert!(errors[0].message.contains("it names a Study"));
    }

    #[test]
    fn test_failure_leaves_registry_unresolved() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry.register(entity("Individual", "IND:1", vec![])).unwrap();
        registry
            .register(entity(
                "Sample",
                "SAM:1",
                vec![("has_individual", FieldValue::Relationship(reference("IND:1")))],
            ))
            .unwrap();
        registry
            .register(entity(
                "Sample",
                "SAM:2",
                vec![("has_individual", FieldValue::Relationship(reference("IND:9")))],
            ))
            .unwrap();

        let errors = resolve(&mut registry, catalogue);

        assert_eq!(errors.len(), 1);
        assert!(registry.get("SAM:1").unwrap().links("has_individual").is_empty());
    }
}
