//! Per-batch entity registry.
//!
//! The registry owns every validated instance of a batch. Embedded entities
//! are moved out of their parents on registration and replaced by links, so
//! each instance is stored once however many times it is referenced.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ErrorKind, ValidationError};
use crate::instance::{EntityInstance, EntityRef, FieldValue, RelationshipValue};
use crate::schema::Catalogue;

/// Outcome of looking up a reference token.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    /// Exactly one compatible entity matches.
    Found(&'a EntityInstance),
    /// Several compatible entities share the token as alias.
    Ambiguous(Vec<&'a str>),
    /// Only entities of an incompatible type match.
    WrongType(&'a EntityInstance),
    /// Nothing matches.
    Missing,
}

/// Identifier and alias index over the entities of one batch.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: IndexMap<String, EntityInstance>,
    aliases: HashMap<String, Vec<String>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an instance together with every entity embedded in it.
    ///
    /// Embedded entities are registered first and replaced by links. An
    /// identifier that is already taken by an identical instance is skipped;
    /// one taken by a different instance is an invariant violation, and
    /// then nothing from this instance is registered.
    ///
    /// Returns the number of newly registered entities.
    pub fn register(&mut self, instance: EntityInstance) -> Result<usize, Vec<ValidationError>> {
        let mut pending = Vec::new();
        hoist(instance, &mut pending);

        let mut errors = Vec::new();
        let mut fresh: Vec<EntityInstance> = Vec::with_capacity(pending.len());
        for entity in pending {
            let existing = self
                .entities
                .get(entity.id())
                .or_else(|| fresh.iter().find(|e| e.id() == entity.id()));
            match existing {
                Some(existing) if *existing == entity => {
                    debug!(id = entity.id(), "skipping repeated entity");
                }
                Some(existing) => errors.push(
                    ValidationError::new(
                        ErrorKind::InvariantViolation,
                        entity.entity_type(),
                        format!(
                            "identifier is already used by a different {}",
                            existing.entity_type()
                        ),
                    )
                    .with_entity_id(Some(entity.id()))
                    .with_field("id")
                    .with_value(entity.id()),
                ),
                None => fresh.push(entity),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let added = fresh.len();
        for entity in fresh {
            if let Some(alias) = entity.alias() {
                self.aliases
                    .entry(alias.to_string())
                    .or_default()
                    .push(entity.id().to_string());
            }
            self.entities.insert(entity.id().to_string(), entity);
        }
        Ok(added)
    }

    /// Look up an entity by id.
    pub fn get(&self, id: &str) -> Option<&EntityInstance> {
        self.entities.get(id)
    }

    /// Follow a link; the target must still have the linked type.
    pub fn follow(&self, link: &EntityRef) -> Option<&EntityInstance> {
        self.get(&link.id)
            .filter(|e| e.entity_type() == link.entity_type)
    }

    /// Look up a token by id, then by alias, among entities that are
    /// `target` or one of its descendants.
    pub fn lookup<'a>(&'a self, token: &str, target: &str, catalogue: &Catalogue) -> Lookup<'a> {
        let compatible = |e: &EntityInstance| catalogue.is_a(e.entity_type(), target);

        let by_id = self.entities.get(token);
        if let Some(entity) = by_id.filter(|e| compatible(*e)) {
            return Lookup::Found(entity);
        }

        let by_alias: Vec<&EntityInstance> = self
            .aliases
            .get(token)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entities.get(id))
            .collect();
        let mut matching = by_alias.iter().copied().filter(|e| compatible(*e));
        match (matching.next(), matching.next()) {
            (Some(entity), None) => Lookup::Found(entity),
            (Some(_), Some(_)) => Lookup::Ambiguous(
                by_alias
                    .iter()
                    .copied()
                    .filter(|e| compatible(*e))
                    .map(EntityInstance::id)
                    .collect(),
            ),
            (None, _) => match by_id.or_else(|| by_alias.first().copied()) {
                Some(entity) => Lookup::WrongType(entity),
                None => Lookup::Missing,
            },
        }
    }

    /// Iterate over entities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityInstance> {
        self.entities.values()
    }

    /// Number of registered entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut EntityInstance> {
        self.entities.get_mut(id)
    }
}

/// Move embedded entities out of `instance`, children before parents.
fn hoist(mut instance: EntityInstance, out: &mut Vec<EntityInstance>) {
    for value in instance.fields_mut().values_mut() {
        match value {
            FieldValue::Relationship(slot) => hoist_slot(slot, out),
            FieldValue::Relationships(slots) => {
                for slot in slots {
                    hoist_slot(slot, out);
                }
            }
            _ => {}
        }
    }
    out.push(instance);
}

fn hoist_slot(slot: &mut RelationshipValue, out: &mut Vec<EntityInstance>) {
    let RelationshipValue::Embedded(child) = slot else {
        return;
    };
    let link = RelationshipValue::Resolved(child.reference());
    if let RelationshipValue::Embedded(child) = std::mem::replace(slot, link) {
        hoist(*child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(entity_type: &str, id: &str, alias: Option<&str>) -> EntityInstance {
        let mut fields = IndexMap::new();
        if let Some(alias) = alias {
            fields.insert("alias".to_string(), FieldValue::String(alias.to_string()));
        }
        EntityInstance::new(entity_type, id, fields)
    }

    fn with_child(parent: EntityInstance, field: &str, child: EntityInstance) -> EntityInstance {
        let mut parent = parent;
        parent.fields_mut().insert(
            field.to_string(),
            FieldValue::Relationship(RelationshipValue::Embedded(Box::new(child))),
        );
        parent
    }

    #[test]
    fn test_register_hoists_embedded() {
        let mut registry = Registry::new();
        let sample = with_child(
            entity("Sample", "SAM:1", None),
            "has_individual",
            entity("Individual", "IND:1", None),
        );

        assert_eq!(registry.register(sample).unwrap(), 2);

        let sample = registry.get("SAM:1").unwrap();
        assert_eq!(
            sample.links("has_individual"),
            vec![&EntityRef::new("Individual", "IND:1")]
        );
        let individual = registry.follow(sample.links("has_individual")[0]).unwrap();
        assert_eq!(individual.id(), "IND:1");
    }

    #[test]
    fn test_repeated_identical_entity_registered_once() {
        let mut registry = Registry::new();
        let child = entity("Individual", "IND:1", Some("i1"));
        registry
            .register(with_child(entity("Sample", "SAM:1", None), "has_individual", child.clone()))
            .unwrap();
        let added = registry
            .register(with_child(entity("Sample", "SAM:2", None), "has_individual", child))
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_conflicting_id_registers_nothing() {
        let mut registry = Registry::new();
        registry.register(entity("Individual", "X:1", None)).unwrap();

        let errors = registry
            .register(with_child(
                entity("Sample", "SAM:1", None),
                "has_individual",
                entity("Individual", "X:1", Some("other")),
            ))
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::InvariantViolation);
        assert_eq!(errors[0].field.as_deref(), Some("id"));
        assert!(registry.get("SAM:1").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_id_then_alias() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry.register(entity("Individual", "IND:1", Some("ind-a"))).unwrap();
        registry.register(entity("Donor", "DON:1", Some("don-a"))).unwrap();

        assert!(matches!(
            registry.lookup("IND:1", "Individual", catalogue),
            Lookup::Found(e) if e.id() == "IND:1"
        ));
        assert!(matches!(
            registry.lookup("don-a", "Individual", catalogue),
            Lookup::Found(e) if e.id() == "DON:1"
        ));
        assert!(matches!(
            registry.lookup("IND:1", "Donor", catalogue),
            Lookup::WrongType(_)
        ));
        assert_eq!(registry.lookup("nope", "Individual", catalogue), Lookup::Missing);
    }

    #[test]
    fn test_lookup_ambiguous_alias() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry.register(entity("Member", "MEM:1", Some("M1"))).unwrap();
        registry.register(entity("Member", "MEM:2", Some("M1"))).unwrap();

        assert_eq!(
            registry.lookup("M1", "Member", catalogue),
            Lookup::Ambiguous(vec!["MEM:1", "MEM:2"])
        );
    }

    #[test]
    fn test_alias_collision_across_types_is_not_ambiguous() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut registry = Registry::new();
        registry.register(entity("Member", "MEM:1", Some("M1"))).unwrap();
        registry.register(entity("Study", "STU:1", Some("M1"))).unwrap();

        assert!(matches!(
            registry.lookup("M1", "Member", catalogue),
            Lookup::Found(e) if e.id() == "MEM:1"
        ));
    }
}
