//! Schema catalogue: entity types, mixins, value objects and enumerations.

mod builtin;
mod catalogue;
mod compose;
mod definition;
mod enums;
mod field;
mod mixin;
mod value_object;

pub use builtin::{ALIASED_TYPES, ROOT_TYPE, SCHEMA_VERSION, definitions as builtin_definitions};
pub use catalogue::{Catalogue, CatalogueBuilder};
pub use compose::FlattenedSchema;
pub use definition::EntityTypeDef;
pub use enums::Enumeration;
pub use field::{Cardinality, FieldKind, FieldSpec, ScalarKind};
pub use mixin::Mixin;
pub use value_object::ValueObject;
