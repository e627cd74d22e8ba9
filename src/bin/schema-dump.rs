//! CLI tool to print or export the collection validators
//!
//! Usage:
//!   cargo run --bin schema-dump
//!   cargo run --bin schema-dump -- users
//!   cargo run --bin schema-dump -- --out ./validators

use std::env;
use std::path::Path;

use edudb_bootstrap::schema::{collections, render, SchemaExporter};

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None => {
            for schema in collections::all() {
                match render(&schema) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error rendering {}: {}", schema.name, e);
                        std::process::exit(1);
                    }
                }
            }
        }
        Some("--out") if args.len() == 3 => {
            let exporter = SchemaExporter::new(Path::new(&args[2]));
            match exporter.export_all(&collections::all()) {
                Ok(exported) => {
                    for entry in exported {
                        println!(
                            "{:<26} {}  {}",
                            entry.collection,
                            &entry.checksum[..12],
                            entry.path.display()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Error exporting schemas: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(name) if args.len() == 2 && !name.starts_with('-') => {
            let Some(schema) = collections::by_name(name) else {
                eprintln!("Error: Unknown collection: {}", name);
                eprintln!("Known collections: {}", collections::names().join(", "));
                std::process::exit(2);
            };
            match render(&schema) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error rendering {}: {}", schema.name, e);
                    std::process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage:");
            eprintln!("  {}                  - Print every validator", args[0]);
            eprintln!("  {} <collection>     - Print one validator", args[0]);
            eprintln!("  {} --out <dir>      - Write <collection>.json files", args[0]);
            std::process::exit(2);
        }
    }
}
