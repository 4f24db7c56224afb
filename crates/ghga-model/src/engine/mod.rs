//! Batch validation: per-instance checks, registration and reference
//! resolution.
//!
//! A batch is validated in two passes. The first pass checks every raw
//! entity against its flattened schema and registers the valid ones, with
//! embedded entities moved into the registry. The second pass resolves
//! every remaining reference token against the complete registry, so
//! references may point forwards, backwards or form cycles. A batch either
//! validates completely or is rejected with every defect found.

mod batch;
mod registry;
mod resolver;
mod validator;

pub use batch::{BatchWarning, RawBatch, ValidatedBatch};
pub use registry::{Lookup, Registry};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{BatchRejection, ErrorKind, Result, ValidationError};
use crate::instance::EntityInstance;
use crate::schema::Catalogue;

use validator::{Findings, InstanceValidator};

/// Validates batches against a schema catalogue.
///
/// The engine holds no per-batch state; each call owns its registry.
#[derive(Debug, Clone)]
pub struct Engine<'c> {
    catalogue: &'c Catalogue,
    config: EngineConfig,
}

impl Engine<'static> {
    /// Create an engine over the built-in catalogue with default settings.
    pub fn new() -> Result<Self> {
        Ok(Self::with_catalogue(Catalogue::builtin()?))
    }
}

impl<'c> Engine<'c> {
    /// Create an engine over a custom catalogue.
    pub fn with_catalogue(catalogue: &'c Catalogue) -> Self {
        Self {
            catalogue,
            config: EngineConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The catalogue in use.
    pub fn catalogue(&self) -> &'c Catalogue {
        self.catalogue
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate and resolve a batch.
    ///
    /// An unsupported batch version rejects the batch before any entity is
    /// looked at. Otherwise every entity is checked, references are
    /// resolved even if some entities failed (references to those degrade
    /// to dangling references) and the batch is rejected if anything at
    /// all was wrong.
    pub fn validate_batch(&self, batch: &RawBatch) -> Result<ValidatedBatch> {
        let version = self.catalogue.version();
        if let Some(declared) = &batch.schema_version {
            if !self.config.accepts_version(version, declared) {
                warn!(declared = %declared, supported = version, "rejecting batch version");
                let error = ValidationError::new(
                    ErrorKind::UnsupportedSchemaVersion,
                    "batch",
                    self.config.version_rejection(version, declared),
                )
                .with_field("schema_version")
                .with_value(declared.as_str());
                return Err(BatchRejection {
                    errors: vec![error],
                }
                .into());
            }
        }

        debug!(entities = batch.len(), version, "validating batch");

        let validator = InstanceValidator::new(self.catalogue, &self.config);
        let mut findings = Findings::default();
        let mut registry = Registry::new();
        let mut stopped_early = false;

        'types: for (entity_type, raws) in &batch.entities {
            let Some(schema) = self
                .catalogue
                .schema(entity_type)
                .filter(|s| !s.is_abstract)
            else {
                findings.errors.push(
                    ValidationError::new(
                        ErrorKind::UnknownEntityType,
                        entity_type.as_str(),
                        format!("'{}' is not an instantiable entity type", entity_type),
                    )
                    .with_value(entity_type.as_str()),
                );
                continue;
            };

            for raw in raws {
                if self.config.error_cap_reached(findings.errors.len()) {
                    stopped_early = true;
                    break 'types;
                }
                let Value::Object(raw) = raw else {
                    findings.errors.push(
                        ValidationError::new(
                            ErrorKind::TypeMismatch,
                            entity_type.as_str(),
                            format!("a {} must be a JSON object", entity_type),
                        )
                        .with_value(raw.clone()),
                    );
                    continue;
                };
                if let Some(instance) = validator.validate(schema, raw, &mut findings) {
                    if let Err(conflicts) = registry.register(instance) {
                        findings.errors.extend(conflicts);
                    }
                }
            }
        }

        let pass_one = findings.errors.len();
        if self.config.error_cap_reached(pass_one) {
            stopped_early = true;
        } else {
            findings
                .errors
                .extend(resolver::resolve(&mut registry, self.catalogue));
        }

        // A skipped entity or pass must never yield a valid batch.
        if stopped_early || !findings.errors.is_empty() {
            let mut errors = findings.errors;
            if let Some(max) = self.config.error_cap() {
                errors.truncate(max);
            }
            info!(
                errors = errors.len(),
                unresolved = errors.len().saturating_sub(pass_one),
                "batch rejected"
            );
            return Err(BatchRejection { errors }.into());
        }

        for warning in &findings.warnings {
            warn!(
                entity_type = %warning.entity_type,
                field = %warning.field,
                "{}",
                warning.message
            );
        }
        info!(
            entities = registry.len(),
            warnings = findings.warnings.len(),
            "batch validated"
        );

        let schema_version = batch
            .schema_version
            .clone()
            .unwrap_or_else(|| version.to_string());
        Ok(ValidatedBatch::new(schema_version, registry, findings.warnings))
    }

    /// Validate one self-contained entity, embedded children included.
    ///
    /// References must resolve within the entity itself.
    pub fn validate_entity(&self, entity_type: &str, raw: &Map<String, Value>) -> Result<EntityInstance> {
        let batch = RawBatch {
            schema_version: None,
            entities: [(entity_type.to_string(), vec![Value::Object(raw.clone())])]
                .into_iter()
                .collect(),
        };
        let validated = self.validate_batch(&batch)?;

        let id = match raw.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        validated.get(&id).cloned().ok_or_else(|| {
            BatchRejection {
                errors: vec![ValidationError::new(
                    ErrorKind::MissingRequiredField,
                    entity_type,
                    "an identifier is required",
                )
                .with_field("id")],
            }
            .into()
        })
    }
}
