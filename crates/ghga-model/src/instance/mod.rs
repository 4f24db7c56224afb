//! Entity instances and their typed field values.

mod entity;
mod relationship;
mod value;

pub use entity::EntityInstance;
pub use relationship::{EntityRef, RelationshipValue};
pub use value::{FieldValue, Record, Timestamp};
