//! Fuzz target for scalar coercion and enumeration checks.
//!
//! The fuzzed text is used as the value of every field of an Individual,
//! exercising integer, timestamp and enumeration handling.

#![no_main]

use ghga_model::{Engine, RawBatch, Timestamp};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let _ = Timestamp::parse(text);

    let Ok(engine) = Engine::new() else {
        return;
    };
    let value = Value::from(text);
    let batch = RawBatch::new().with_entity(
        "Individual",
        json!({
            "id": value,
            "alias": value,
            "sex": value,
            "age": value,
            "vital_status": value,
            "creation_date": value,
            "has_parent": value,
            "has_disease": [{"id": value}]
        }),
    );
    let _ = engine.validate_batch(&batch);
});
