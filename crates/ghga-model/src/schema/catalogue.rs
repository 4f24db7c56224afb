//! The schema catalogue: every enumeration, value object, mixin and entity
//! type, with each entity type composed once at load time.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::SchemaError;

use super::builtin;
use super::compose::{FlattenedSchema, compose};
use super::definition::EntityTypeDef;
use super::enums::Enumeration;
use super::field::{FieldKind, FieldSpec, ScalarKind};
use super::mixin::Mixin;
use super::value_object::ValueObject;

static BUILTIN: Lazy<Result<Catalogue, SchemaError>> = Lazy::new(builtin::catalogue);

/// A loaded, read-only schema catalogue.
#[derive(Debug, Clone)]
pub struct Catalogue {
    version: String,
    root: String,
    enumerations: IndexMap<String, Enumeration>,
    value_objects: IndexMap<String, ValueObject>,
    mixins: IndexMap<String, Mixin>,
    definitions: IndexMap<String, EntityTypeDef>,
    schemas: IndexMap<String, FlattenedSchema>,
}

impl Catalogue {
    /// The process-wide GHGA catalogue, composed on first use.
    pub fn builtin() -> Result<&'static Catalogue, SchemaError> {
        BUILTIN.as_ref().map_err(Clone::clone)
    }

    /// Start building a custom catalogue.
    pub fn builder(version: impl Into<String>) -> CatalogueBuilder {
        CatalogueBuilder {
            version: version.into(),
            enumerations: Vec::new(),
            value_objects: Vec::new(),
            mixins: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Schema version this catalogue describes.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the root entity type.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Get the flattened schema of an entity type.
    pub fn schema(&self, entity_type: &str) -> Option<&FlattenedSchema> {
        self.schemas.get(entity_type)
    }

    /// Get the declared definition of an entity type.
    pub fn definition(&self, entity_type: &str) -> Option<&EntityTypeDef> {
        self.definitions.get(entity_type)
    }

    /// Get an enumeration by name.
    pub fn enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.enumerations.get(name)
    }

    /// Get a value object by name.
    pub fn value_object(&self, name: &str) -> Option<&ValueObject> {
        self.value_objects.get(name)
    }

    /// Get a mixin by name.
    pub fn mixin(&self, name: &str) -> Option<&Mixin> {
        self.mixins.get(name)
    }

    /// Check whether `entity_type` is `ancestor` or descends from it.
    pub fn is_a(&self, entity_type: &str, ancestor: &str) -> bool {
        self.schema(entity_type)
            .is_some_and(|schema| schema.is_a(ancestor))
    }

    /// Iterate over all entity type names in declaration order.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Iterate over the schemas of instantiable entity types.
    pub fn concrete_types(&self) -> impl Iterator<Item = &FlattenedSchema> {
        self.schemas.values().filter(|s| !s.is_abstract)
    }

    /// Number of entity types.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if the catalogue has no entity types.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Collects definitions and composes them into a [`Catalogue`].
#[derive(Debug, Clone)]
pub struct CatalogueBuilder {
    version: String,
    enumerations: Vec<Enumeration>,
    value_objects: Vec<ValueObject>,
    mixins: Vec<Mixin>,
    definitions: Vec<EntityTypeDef>,
}

impl CatalogueBuilder {
    /// Add an enumeration.
    pub fn enumeration(mut self, enumeration: Enumeration) -> Self {
        self.enumerations.push(enumeration);
        self
    }

    /// Add a value object.
    pub fn value_object(mut self, object: ValueObject) -> Self {
        self.value_objects.push(object);
        self
    }

    /// Add a mixin.
    pub fn mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    /// Add an entity type definition.
    pub fn entity_type(mut self, definition: EntityTypeDef) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Validate every definition and compose every entity type.
    pub fn build(self) -> Result<Catalogue, SchemaError> {
        let enumerations = index_by_name("enumeration", self.enumerations, |e| &e.name)?;
        let value_objects = index_by_name("value object", self.value_objects, |v| &v.name)?;
        let mixins = index_by_name("mixin", self.mixins, |m| &m.name)?;
        let definitions = index_by_name("entity type", self.definitions, |d| &d.name)?;

        let mut roots = definitions.values().filter(|d| d.parent.is_none());
        let root = match (roots.next(), roots.next()) {
            (Some(root), None) => root.name.clone(),
            (None, _) => {
                return Err(SchemaError::Hierarchy("no root entity type".to_string()));
            }
            (Some(a), Some(b)) => {
                return Err(SchemaError::Hierarchy(format!(
                    "more than one root entity type ('{}', '{}')",
                    a.name, b.name
                )));
            }
        };

        let refs = References {
            enumerations: &enumerations,
            value_objects: &value_objects,
            definitions: &definitions,
        };
        for object in value_objects.values() {
            for field in &object.fields {
                if field.is_relationship() {
                    return Err(SchemaError::Composition {
                        entity_type: object.name.clone(),
                        field: field.name.clone(),
                        message: "value objects cannot hold relationships".to_string(),
                    });
                }
                refs.check(&object.name, field)?;
            }
        }
        for mixin in mixins.values() {
            for field in &mixin.fields {
                refs.check(&mixin.name, field)?;
            }
        }
        for definition in definitions.values() {
            for field in &definition.fields {
                refs.check(&definition.name, field)?;
            }
        }

        let mut schemas = IndexMap::with_capacity(definitions.len());
        for definition in definitions.values() {
            let chain = ancestor_chain(definition, &definitions)?;
            let schema = compose(&chain, &mixins)?;
            schemas.insert(definition.name.clone(), schema);
        }

        let identified = schemas.get(&root).and_then(|s| s.field("id")).is_some_and(|id| {
            id.required
                && id.kind
                    == FieldKind::Scalar {
                        scalar: ScalarKind::String,
                    }
        });
        if !identified {
            return Err(SchemaError::Composition {
                entity_type: root,
                field: "id".to_string(),
                message: "the root entity type must declare a required string identifier"
                    .to_string(),
            });
        }

        debug!(
            version = %self.version,
            entity_types = schemas.len(),
            "composed schema catalogue"
        );

        Ok(Catalogue {
            version: self.version,
            root,
            enumerations,
            value_objects,
            mixins,
            definitions,
            schemas,
        })
    }
}

/// Name tables used to check that field kinds refer to defined names.
struct References<'a> {
    enumerations: &'a IndexMap<String, Enumeration>,
    value_objects: &'a IndexMap<String, ValueObject>,
    definitions: &'a IndexMap<String, EntityTypeDef>,
}

impl References<'_> {
    fn check(&self, owner: &str, field: &FieldSpec) -> Result<(), SchemaError> {
        let (what, name, found) = match &field.kind {
            FieldKind::Scalar { .. } | FieldKind::ScalarList { .. } => return Ok(()),
            FieldKind::Enumeration { enumeration } => (
                "enumeration",
                enumeration,
                self.enumerations.contains_key(enumeration),
            ),
            FieldKind::Record { object, .. } => (
                "value object",
                object,
                self.value_objects.contains_key(object),
            ),
            FieldKind::Relationship { target, .. } => (
                "entity type",
                target,
                self.definitions.contains_key(target),
            ),
        };
        if found {
            Ok(())
        } else {
            Err(SchemaError::UndefinedName {
                owner: owner.to_string(),
                what,
                name: name.clone(),
            })
        }
    }
}

fn index_by_name<T>(
    what: &'static str,
    items: Vec<T>,
    name: impl Fn(&T) -> &String,
) -> Result<IndexMap<String, T>, SchemaError> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let key = name(&item).clone();
        if map.contains_key(&key) {
            return Err(SchemaError::Duplicate { what, name: key });
        }
        map.insert(key, item);
    }
    Ok(map)
}

/// Ancestor chain from the root down to `definition`.
fn ancestor_chain<'a>(
    definition: &'a EntityTypeDef,
    definitions: &'a IndexMap<String, EntityTypeDef>,
) -> Result<Vec<&'a EntityTypeDef>, SchemaError> {
    let mut chain = vec![definition];
    let mut seen = HashSet::from([definition.name.as_str()]);
    let mut current = definition;

    while let Some(parent_name) = &current.parent {
        let parent = definitions
            .get(parent_name)
            .ok_or_else(|| SchemaError::UndefinedName {
                owner: current.name.clone(),
                what: "parent type",
                name: parent_name.clone(),
            })?;
        if !seen.insert(parent.name.as_str()) {
            return Err(SchemaError::Hierarchy(format!(
                "inheritance cycle through '{}'",
                parent.name
            )));
        }
        chain.push(parent);
        current = parent;
    }

    chain.reverse();
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> CatalogueBuilder {
        Catalogue::builder("1.0.0")
            .enumeration(Enumeration::biological_sex())
            .mixin(Mixin::accession())
            .entity_type(
                EntityTypeDef::new("Thing", "")
                    .abstract_type()
                    .field(FieldSpec::string("id", "").required()),
            )
            .entity_type(
                EntityTypeDef::new("Person", "")
                    .parent("Thing")
                    .field(FieldSpec::enumeration("sex", "BiologicalSex", "")),
            )
            .entity_type(
                EntityTypeDef::new("Patient", "")
                    .parent("Person")
                    .mixins(["Accession"])
                    .field(FieldSpec::links("has_parent", "Person", "")),
            )
    }

    #[test]
    fn test_build_small_catalogue() {
        let catalogue = small().build().unwrap();

        assert_eq!(catalogue.version(), "1.0.0");
        assert_eq!(catalogue.root(), "Thing");
        assert_eq!(catalogue.len(), 3);
        assert!(catalogue.is_a("Patient", "Person"));
        assert!(catalogue.is_a("Patient", "Thing"));
        assert!(!catalogue.is_a("Person", "Patient"));
        assert!(!catalogue.is_a("Nope", "Thing"));
        assert_eq!(catalogue.concrete_types().count(), 2);

        let patient = catalogue.schema("Patient").unwrap();
        assert_eq!(patient.depth(), 2);
        assert!(patient.has_mixin("Accession"));
        assert!(patient.field("sex").is_some());
    }

    #[test]
    fn test_undefined_parent() {
        let err = small()
            .entity_type(EntityTypeDef::new("Orphan", "").parent("Missing"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UndefinedName { what: "parent type", .. }));
    }

    #[test]
    fn test_two_roots() {
        let err = small()
            .entity_type(EntityTypeDef::new("Other", ""))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::Hierarchy(_)));
    }

    #[test]
    fn test_cycle() {
        let err = Catalogue::builder("1.0.0")
            .entity_type(EntityTypeDef::new("Root", ""))
            .entity_type(EntityTypeDef::new("A", "").parent("B"))
            .entity_type(EntityTypeDef::new("B", "").parent("A"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_duplicate_type() {
        let err = small()
            .entity_type(EntityTypeDef::new("Person", "").parent("Thing"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::Duplicate {
                what: "entity type",
                name: "Person".into()
            }
        );
    }

    #[test]
    fn test_undefined_enumeration() {
        let err = small()
            .entity_type(
                EntityTypeDef::new("Robot", "")
                    .parent("Thing")
                    .field(FieldSpec::enumeration("model", "RobotModel", "")),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UndefinedName { what: "enumeration", .. }));
    }

    #[test]
    fn test_value_object_cannot_link() {
        let err = small()
            .value_object(
                ValueObject::new("Pointer", "").field(FieldSpec::link("to", "Person", "")),
            )
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::SchemaCompositionError);
    }

    #[test]
    fn test_catalogue_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalogue>();
    }

    #[test]
    fn test_builtin_loads() {
        let catalogue = Catalogue::builtin().unwrap();
        assert_eq!(catalogue.root(), "NamedThing");
        assert!(catalogue.len() >= 40);
    }
}
