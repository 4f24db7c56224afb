//! ghga-model: schema-driven metadata model for GHGA submissions.
//!
//! Entity types are composed from an inheritance chain plus mixins into
//! flat field tables once, when the catalogue loads. Submission batches are
//! then validated against those tables and their relationships resolved,
//! either inline (an embedded entity) or by identifier or alias.
//!
//! # Core Principles
//!
//! - **Explicit composition**: Field tables, not language inheritance;
//!   subtypes may only make inherited fields stricter
//! - **Atomic batches**: A batch validates completely or is rejected with
//!   every defect found
//! - **Links, not copies**: Resolved relationships point into the batch
//!   registry, so cycles are fine
//!
//! # Example
//!
//! ```
//! use ghga_model::{Engine, RawBatch};
//! use serde_json::json;
//!
//! let batch = RawBatch::new()
//!     .with_version("0.5.0")
//!     .with_entity("Sample", json!({
//!         "id": "SAM:001",
//!         "alias": "blood-1",
//!         "name": "blood sample",
//!         "description": "Peripheral blood",
//!         "has_individual": {
//!             "id": "IND:001", "alias": "donor-1", "sex": "Female", "age": 42, "vital_status": "alive"
//!         }
//!     }));
//!
//! let validated = Engine::new().unwrap().validate_batch(&batch).unwrap();
//! let sample = validated.get("SAM:001").unwrap();
//! let individual = validated.follow(sample.links("has_individual")[0]).unwrap();
//! assert_eq!(individual.id(), "IND:001");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod instance;
pub mod schema;

pub use config::{EngineConfig, StringForListPolicy};
pub use engine::{BatchWarning, Engine, RawBatch, ValidatedBatch};
pub use error::{BatchRejection, ErrorKind, ModelError, Result, SchemaError, ValidationError};
pub use instance::{EntityInstance, EntityRef, FieldValue, RelationshipValue, Timestamp};
pub use schema::{Catalogue, FlattenedSchema};
