//! Example: Validate a GHGA submission batch.
//!
//! Usage:
//!   cargo run --example validate_batch -- <file_path>
//!
//! Example:
//!   cargo run --example validate_batch -- test_data/submission.json

use std::env;
use std::path::Path;

use ghga_model::{Engine, ModelError, RawBatch};

fn main() -> ghga_model::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example validate_batch -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example validate_batch -- test_data/submission.json");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("GHGA Batch Validation: {}", file_path);
    println!("{}", separator);
    println!();

    let batch = RawBatch::from_path(path)?;
    let engine = Engine::new()?;

    println!("## Input");
    println!("  Schema version: {}", batch.schema_version.as_deref().unwrap_or("(none)"));
    for (entity_type, entities) in &batch.entities {
        println!("  {:28} {}", entity_type, entities.len());
    }
    println!();

    match engine.validate_batch(&batch) {
        Ok(validated) => {
            println!("## Entities ({} total)", validated.len());
            println!();
            for entity in validated.iter() {
                println!("  {:28} {}", entity.entity_type(), entity.id());
                for (name, value) in entity.fields() {
                    let links: Vec<_> = value
                        .relationships()
                        .iter()
                        .filter_map(|r| r.target())
                        .map(ToString::to_string)
                        .collect();
                    if !links.is_empty() {
                        println!("      {} -> {}", name, links.join(", "));
                    }
                }
            }
            println!();

            if !validated.warnings().is_empty() {
                println!("### Warnings ({}):", validated.warnings().len());
                for warning in validated.warnings() {
                    println!(
                        "  [{}.{}] {}",
                        warning.entity_type, warning.field, warning.message
                    );
                }
                println!();
            }
        }
        Err(ModelError::Rejected(rejection)) => {
            println!("### Errors ({}):", rejection.errors.len());
            for error in &rejection.errors {
                println!("  {}", error);
            }
            println!();
        }
        Err(other) => return Err(other),
    }

    println!("{}", separator);

    Ok(())
}
