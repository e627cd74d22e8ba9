//! CLI tool to validate a document against a collection schema offline
//!
//! The document is read as Extended JSON, so identifiers, dates and binary
//! payloads use `{"$oid": ...}`, `{"$date": ...}` and `{"$binary": ...}`.
//!
//! Usage:
//!   cargo run --bin check-doc -- users ./ana.json

use std::env;
use std::fs;

use edudb_bootstrap::schema::{collections, DocumentValidator};
use mongodb::bson::Bson;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <collection> <document.json>", args[0]);
        eprintln!();
        eprintln!("Collections: {}", collections::names().join(", "));
        std::process::exit(2);
    }

    let Some(schema) = collections::by_name(&args[1]) else {
        eprintln!("Error: Unknown collection: {}", args[1]);
        std::process::exit(2);
    };

    let raw = match fs::read_to_string(&args[2]) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: Could not read {}: {}", args[2], e);
            std::process::exit(2);
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error: Invalid JSON in {}: {}", args[2], e);
            std::process::exit(2);
        }
    };

    let document = match Bson::try_from(value) {
        Ok(Bson::Document(document)) => document,
        Ok(other) => {
            eprintln!("Error: Expected a JSON object, got {}", other);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("Error: Invalid Extended JSON: {}", e);
            std::process::exit(2);
        }
    };

    let report = DocumentValidator::validate(&schema, &document);

    if report.passed() {
        println!("OK: document is valid for {}", schema.name);
    } else {
        print!("{}", report.error_log());
        std::process::exit(1);
    }
}
