//! Property-based tests for schema composition and batch validation.
//!
//! Property-based tests verify:
//! 1. **No panics**: Validation never crashes on arbitrary field values
//! 2. **Determinism**: The same batch always yields the same outcome
//! 3. **Composition**: Flattening is stable and only ever narrows fields
//! 4. **Invariants**: Enumeration membership and date ordering always hold
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p ghga-model --test property_tests
//!
//! PROPTEST_CASES=10000 cargo test -p ghga-model --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::{Value, json};

use ghga_model::schema::{
    EntityTypeDef, Enumeration, FieldSpec, Mixin, ValueObject, builtin_definitions,
};
use ghga_model::{Catalogue, Engine, ErrorKind, RawBatch, Timestamp};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary JSON scalars and small containers.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,20}".prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::hash_map("[a-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Calendar dates between 1950 and 2049.
fn date() -> impl Strategy<Value = String> {
    (1950u32..2050, 1u32..13, 1u32..29).prop_map(|(y, m, d)| format!("{:04}-{:02}-{:02}", y, m, d))
}

fn individual(id: &str, sex: &str) -> Value {
    json!({"id": id, "alias": id.to_lowercase(), "sex": sex, "age": 40, "vital_status": "alive"})
}

fn sample(id: &str, individual: &str) -> Value {
    json!({
        "id": id, "alias": id.to_lowercase(), "name": "s", "description": "d",
        "has_individual": individual
    })
}

// =============================================================================
// Composition Properties
// =============================================================================

#[test]
fn test_composition_is_idempotent() {
    let builtin = Catalogue::builtin().unwrap();
    let mut builder = Catalogue::builder(builtin.version());
    for enumeration in Enumeration::builtin() {
        builder = builder.enumeration(enumeration);
    }
    for object in ValueObject::builtin() {
        builder = builder.value_object(object);
    }
    for mixin in Mixin::builtin() {
        builder = builder.mixin(mixin);
    }
    for definition in builtin_definitions() {
        builder = builder.entity_type(definition);
    }
    let rebuilt = builder.build().unwrap();

    for entity_type in builtin.entity_types() {
        assert_eq!(builtin.schema(entity_type), rebuilt.schema(entity_type));
    }
}

#[test]
fn test_subtypes_never_widen() {
    let catalogue = Catalogue::builtin().unwrap();
    for schema in catalogue.concrete_types() {
        for ancestor in &schema.ancestors {
            let parent = catalogue.schema(ancestor).unwrap();
            for (name, inherited) in &parent.fields {
                let field = schema.field(name).expect("inherited field kept");
                assert_eq!(field.kind, inherited.kind, "{}.{}", schema.entity_type, name);
                assert!(field.required || !inherited.required, "{}.{}", schema.entity_type, name);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_narrowing_composes_widening_fails(parent_required: bool, child_required: bool) {
        let field = |required: bool| {
            let spec = FieldSpec::string("label", "");
            if required { spec.required() } else { spec }
        };
        let result = Catalogue::builder("1.0.0")
            .entity_type(
                EntityTypeDef::new("Root", "")
                    .abstract_type()
                    .field(FieldSpec::string("id", "").required())
                    .field(field(parent_required)),
            )
            .entity_type(EntityTypeDef::new("Leaf", "").parent("Root").field(field(child_required)))
            .build();

        if parent_required && !child_required {
            prop_assert!(result.is_err());
        } else {
            let catalogue = result.unwrap();
            let leaf = catalogue.schema("Leaf").unwrap().field("label").unwrap();
            prop_assert_eq!(leaf.required, child_required);
            let order: Vec<_> = catalogue.schema("Leaf").unwrap().fields.keys().cloned().collect();
            prop_assert_eq!(order, vec!["id".to_string(), "label".to_string()]);
        }
    }
}

// =============================================================================
// Validation Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_arbitrary_fields_never_panic(fields in prop::collection::hash_map("[a-z_]{1,12}", json_value(), 0..8)) {
        let engine = Engine::new().unwrap();
        for entity_type in ["Individual", "Sample", "Study", "Submission", "Disease"] {
            let mut batch = RawBatch::new();
            batch.push(entity_type, Value::Object(fields.clone().into_iter().collect()));
            let _ = engine.validate_batch(&batch);
        }
    }

    #[test]
    fn prop_sex_accepted_iff_member(sex in prop_oneof![
        Just("Female".to_string()),
        Just("Male".to_string()),
        Just("Unknown".to_string()),
        "[A-Za-z\\-]{0,12}",
    ]) {
        let batch = RawBatch::new().with_entity("Individual", individual("IND:1", &sex));
        let result = Engine::new().unwrap().validate_batch(&batch);
        let member = ["Female", "Male", "Unknown"].contains(&sex.as_str());

        prop_assert_eq!(result.is_ok(), member);
        if let Err(err) = result {
            prop_assert_eq!(err.validation_errors()[0].kind, ErrorKind::InvalidEnumerationValue);
        }
    }

    #[test]
    fn prop_update_date_ordering(created in date(), updated in date()) {
        let mut raw = individual("IND:1", "Male");
        raw["creation_date"] = json!(created);
        raw["update_date"] = json!(updated);
        let batch = RawBatch::new().with_entity("Individual", raw);
        let result = Engine::new().unwrap().validate_batch(&batch);

        let ordered = Timestamp::parse(&updated).unwrap() >= Timestamp::parse(&created).unwrap();
        prop_assert_eq!(result.is_ok(), ordered);
    }

    #[test]
    fn prop_resolution_is_deterministic(
        count in 1usize..6,
        targets in prop::collection::vec(0usize..8, 1..6),
    ) {
        let mut batch = RawBatch::new();
        for i in 0..count {
            batch.push("Individual", individual(&format!("IND:{}", i), "Female"));
        }
        for (i, target) in targets.iter().enumerate() {
            batch.push("Sample", sample(&format!("SAM:{}", i), &format!("IND:{}", target)));
        }

        let engine = Engine::new().unwrap();
        let first = engine.validate_batch(&batch);
        let second = engine.validate_batch(&batch);

        prop_assert_eq!(first.is_ok(), targets.iter().all(|t| *t < count));
        match (first, second) {
            (Ok(a), Ok(b)) => {
                for entity in a.iter() {
                    prop_assert_eq!(Some(entity), b.get(entity.id()));
                }
            }
            (Err(a), Err(b)) => prop_assert_eq!(a.validation_errors(), b.validation_errors()),
            _ => prop_assert!(false, "outcomes differ"),
        }
    }

    #[test]
    fn prop_round_trip_is_stable(ages in prop::collection::vec(0i64..120, 1..5)) {
        let mut batch = RawBatch::new();
        for (i, age) in ages.iter().enumerate() {
            let mut raw = individual(&format!("IND:{}", i), "Unknown");
            raw["age"] = json!(age.to_string());
            batch.push("Sample", sample(&format!("SAM:{}", i), "placeholder"));
            batch.entities.get_mut("Sample").unwrap()[i]["has_individual"] = raw;
        }

        let engine = Engine::new().unwrap();
        let first = engine.validate_batch(&batch).unwrap();
        let second = engine.validate_batch(&first.to_raw_batch()).unwrap();

        prop_assert_eq!(first.len(), second.len());
        for entity in first.iter() {
            prop_assert_eq!(Some(entity), second.get(entity.id()));
        }
    }
}
