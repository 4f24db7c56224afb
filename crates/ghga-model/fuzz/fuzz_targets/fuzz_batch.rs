//! Fuzz target for batch parsing and validation.
//!
//! This fuzzer tests that the engine:
//! 1. Never panics on any JSON batch text
//! 2. Handles deeply nested embedded entities and reference cycles

#![no_main]

use ghga_model::{Engine, RawBatch};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(batch) = RawBatch::from_json(text) else {
        return;
    };
    let Ok(engine) = Engine::new() else {
        return;
    };

    if let Ok(validated) = engine.validate_batch(&batch) {
        // A validated batch must validate again from its own wire form.
        let again = engine.validate_batch(&validated.to_raw_batch());
        assert!(again.is_ok());
    }
});
