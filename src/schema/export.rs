//! Schema Exporter
//!
//! Writes each collection's validator to disk as relaxed Extended JSON so it
//! can be reviewed, diffed, or fed to `db.createCollection` by hand.
//!
//! Directory structure:
//! ```text
//! {out_dir}/
//!   ├── users.json
//!   ├── educational_institutions.json
//!   ├── classes.json
//!   ├── educational_resources.json
//!   └── messages.json
//! ```

use super::shape::CollectionSchema;
use crate::error::{BootstrapError, Result};
use mongodb::bson::Bson;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Information about an exported schema
#[derive(Debug, Clone)]
pub struct ExportedSchema {
    pub collection: String,
    pub path: PathBuf,
    pub checksum: String,
}

pub struct SchemaExporter {
    out_dir: PathBuf,
}

impl SchemaExporter {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
        }
    }

    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.out_dir.join(format!("{}.json", collection))
    }

    pub fn export(&self, schema: &CollectionSchema) -> Result<ExportedSchema> {
        fs::create_dir_all(&self.out_dir).map_err(|e| {
            BootstrapError::Internal(format!(
                "Failed to create export directory {}: {}",
                self.out_dir.display(),
                e
            ))
        })?;

        let path = self.path_for(schema.name);
        let checksum = schema.checksum();

        fs::write(&path, render(schema)?).map_err(|e| {
            BootstrapError::Internal(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!("Exported schema '{}' to {}", schema.name, path.display());

        Ok(ExportedSchema {
            collection: schema.name.to_string(),
            path,
            checksum,
        })
    }

    pub fn export_all(&self, schemas: &[CollectionSchema]) -> Result<Vec<ExportedSchema>> {
        schemas.iter().map(|schema| self.export(schema)).collect()
    }
}

/// Pretty relaxed Extended JSON for one collection
pub fn render(schema: &CollectionSchema) -> Result<String> {
    let body = json!({
        "collection": schema.name,
        "checksum": schema.checksum(),
        "validationLevel": CollectionSchema::VALIDATION_LEVEL,
        "validationAction": CollectionSchema::VALIDATION_ACTION,
        "validator": Bson::Document(schema.validator()).into_relaxed_extjson(),
    });

    Ok(serde_json::to_string_pretty(&body)?)
}
