//! Flattening of entity types into a single field table.
//!
//! Composition walks the ancestor chain from the root down to the requested
//! type. At every level the mixins composed there contribute first, then the
//! fields the level declares itself; the merged level is then laid over the
//! inherited table. A redeclared field keeps its original position and may
//! only tighten optional to required.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

use super::definition::EntityTypeDef;
use super::field::FieldSpec;
use super::mixin::Mixin;

/// The composed, immutable schema of one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedSchema {
    /// Type name.
    pub entity_type: String,
    /// Ancestors from the root down to the direct parent.
    pub ancestors: Vec<String>,
    /// Every mixin composed along the chain, in composition order.
    pub mixins: Vec<String>,
    /// Abstract types cannot be instantiated.
    pub is_abstract: bool,
    /// Flattened field table.
    pub fields: IndexMap<String, FieldSpec>,
}

impl FlattenedSchema {
    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Iterate over required fields.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values().filter(|f| f.required)
    }

    /// Iterate over relationship fields.
    pub fn relationship_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values().filter(|f| f.is_relationship())
    }

    /// Check whether a mixin was composed anywhere along the chain.
    pub fn has_mixin(&self, mixin: &str) -> bool {
        self.mixins.iter().any(|m| m == mixin)
    }

    /// Check whether this type is `ancestor` or descends from it.
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.entity_type == ancestor || self.ancestors.iter().any(|a| a == ancestor)
    }

    /// Number of inheritance levels above this type.
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

/// Compose one type. `chain` runs from the root to the type itself.
pub(crate) fn compose(
    chain: &[&EntityTypeDef],
    mixins: &IndexMap<String, Mixin>,
) -> Result<FlattenedSchema, SchemaError> {
    let Some(target) = chain.last() else {
        return Err(SchemaError::Hierarchy("empty ancestor chain".to_string()));
    };

    let mut fields: IndexMap<String, FieldSpec> = IndexMap::new();
    let mut composed_mixins = Vec::new();

    for level in chain {
        let mut contributed: IndexMap<String, (FieldSpec, String)> = IndexMap::new();

        for mixin_name in &level.mixins {
            let mixin = mixins.get(mixin_name).ok_or_else(|| SchemaError::UndefinedName {
                owner: level.name.clone(),
                what: "mixin",
                name: mixin_name.clone(),
            })?;
            for field in &mixin.fields {
                merge_same_level(&mut contributed, field, &mixin.name, &target.name)?;
            }
            composed_mixins.push(mixin.name.clone());
        }

        for field in &level.fields {
            merge_same_level(&mut contributed, field, &level.name, &target.name)?;
        }

        for (_, (field, source)) in contributed {
            merge_inherited(&mut fields, field, &source, &target.name)?;
        }
    }

    Ok(FlattenedSchema {
        entity_type: target.name.clone(),
        ancestors: chain[..chain.len() - 1]
            .iter()
            .map(|d| d.name.clone())
            .collect(),
        mixins: composed_mixins,
        is_abstract: target.is_abstract,
        fields,
    })
}

/// Merge a field contributed at the same inheritance level as an earlier
/// contribution. Kinds must agree; requiredness is the union.
fn merge_same_level(
    contributed: &mut IndexMap<String, (FieldSpec, String)>,
    field: &FieldSpec,
    source: &str,
    entity_type: &str,
) -> Result<(), SchemaError> {
    match contributed.get_mut(&field.name) {
        Some((existing, existing_source)) => {
            if existing.kind != field.kind {
                return Err(SchemaError::Composition {
                    entity_type: entity_type.to_string(),
                    field: field.name.clone(),
                    message: format!(
                        "declared as {} by '{}' and as {} by '{}' at the same level",
                        existing.kind.describe(),
                        existing_source,
                        field.kind.describe(),
                        source
                    ),
                });
            }
            existing.required |= field.required;
            if !field.description.is_empty() {
                existing.description = field.description.clone();
            }
            *existing_source = source.to_string();
        }
        None => {
            contributed.insert(field.name.clone(), (field.clone(), source.to_string()));
        }
    }
    Ok(())
}

/// Lay a level's field over the inherited table, narrowing only.
fn merge_inherited(
    fields: &mut IndexMap<String, FieldSpec>,
    field: FieldSpec,
    source: &str,
    entity_type: &str,
) -> Result<(), SchemaError> {
    if let Some(inherited) = fields.get(&field.name) {
        if inherited.kind != field.kind {
            return Err(SchemaError::Composition {
                entity_type: entity_type.to_string(),
                field: field.name.clone(),
                message: format!(
                    "'{}' redeclares an inherited {} field as {}",
                    source,
                    inherited.kind.describe(),
                    field.kind.describe()
                ),
            });
        }
        if inherited.required && !field.required {
            return Err(SchemaError::Composition {
                entity_type: entity_type.to_string(),
                field: field.name.clone(),
                message: format!(
                    "'{}' widens an inherited required field to optional",
                    source
                ),
            });
        }
    }

    // IndexMap::insert keeps the position of an existing key.
    fields.insert(field.name.clone(), field);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::FieldKind;

    fn mixins() -> IndexMap<String, Mixin> {
        [Mixin::accession(), Mixin::metadata()]
            .into_iter()
            .map(|m| (m.name.clone(), m))
            .collect()
    }

    fn root() -> EntityTypeDef {
        EntityTypeDef::new("Thing", "")
            .abstract_type()
            .mixins(["Metadata"])
            .field(FieldSpec::string("id", "").required())
            .field(FieldSpec::string("title", ""))
    }

    #[test]
    fn test_inherited_fields_come_first() {
        let root = root();
        let child = EntityTypeDef::new("Child", "")
            .parent("Thing")
            .mixins(["Accession"])
            .field(FieldSpec::integer("count", ""));

        let schema = compose(&[&root, &child], &mixins()).unwrap();
        let names: Vec<&str> = schema.fields.keys().map(String::as_str).collect();

        assert_eq!(
            names,
            vec!["schema_type", "schema_version", "id", "title", "accession", "count"]
        );
        assert_eq!(schema.ancestors, vec!["Thing".to_string()]);
        assert_eq!(schema.mixins, vec!["Metadata".to_string(), "Accession".to_string()]);
        assert!(!schema.is_abstract);
    }

    #[test]
    fn test_narrowing_keeps_position() {
        let root = root();
        let child = EntityTypeDef::new("Child", "")
            .parent("Thing")
            .field(FieldSpec::string("title", "Narrowed.").required());

        let schema = compose(&[&root, &child], &mixins()).unwrap();
        let title = schema.field("title").unwrap();

        assert!(title.required);
        assert_eq!(title.description, "Narrowed.");
        assert_eq!(schema.fields.get_index_of("title"), Some(3));
    }

    #[test]
    fn test_widening_is_rejected() {
        let root = root();
        let child = EntityTypeDef::new("Child", "")
            .parent("Thing")
            .field(FieldSpec::string("id", ""));

        let err = compose(&[&root, &child], &mixins()).unwrap_err();
        assert!(matches!(err, SchemaError::Composition { ref field, .. } if field == "id"));
    }

    #[test]
    fn test_kind_change_is_rejected() {
        let root = root();
        let child = EntityTypeDef::new("Child", "")
            .parent("Thing")
            .field(FieldSpec::integer("title", ""));

        assert!(compose(&[&root, &child], &mixins()).is_err());
    }

    #[test]
    fn test_same_level_conflict_is_rejected() {
        let root = root();
        let child = EntityTypeDef::new("Child", "")
            .parent("Thing")
            .mixins(["Accession"])
            .field(FieldSpec::integer("accession", ""));

        let err = compose(&[&root, &child], &mixins()).unwrap_err();
        assert!(err.to_string().contains("same level"));
    }

    #[test]
    fn test_same_level_agreement_merges() {
        let root = root();
        let child = EntityTypeDef::new("Child", "")
            .parent("Thing")
            .mixins(["Accession"])
            .field(FieldSpec::string("accession", "").required());

        let schema = compose(&[&root, &child], &mixins()).unwrap();
        let accession = schema.field("accession").unwrap();
        assert!(accession.required);
        assert_eq!(
            accession.kind,
            FieldKind::Scalar {
                scalar: crate::schema::ScalarKind::String
            }
        );
    }

    #[test]
    fn test_undefined_mixin() {
        let root = EntityTypeDef::new("Thing", "").mixins(["Nope"]);
        assert!(matches!(
            compose(&[&root], &mixins()),
            Err(SchemaError::UndefinedName { what: "mixin", .. })
        ));
    }
}
