//! Bootstrap driver
//!
//! One sequential pass against an engine:
//! 1. Create the application account in the admin catalog with `readWrite`
//!    on the target catalog
//! 2. Create each collection with its strict validator, in registration order
//!
//! Every failure aborts the run. Nothing created before the failing step is
//! rolled back. With [`ExistingPolicy::Skip`] the user and each collection are
//! looked up first and left untouched when present.

use crate::config::{Config, ExistingPolicy};
use crate::engine::{AppAccount, StorageEngine};
use crate::error::Result;
use crate::schema::{collections, CollectionSchema};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    Created,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionOutcome {
    pub name: String,
    pub outcome: StepOutcome,
    pub checksum: String,
}

/// Summary of one bootstrap run
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub engine: String,
    pub catalog: String,
    pub app_user: String,
    pub user: StepOutcome,
    pub collections: Vec<CollectionOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BootstrapReport {
    pub fn created(&self) -> Vec<&str> {
        self.names_with(StepOutcome::Created)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.names_with(StepOutcome::Skipped)
    }

    fn names_with(&self, outcome: StepOutcome) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|c| c.outcome == outcome)
            .map(|c| c.name.as_str())
            .collect()
    }
}

pub struct Bootstrapper<'a, E: StorageEngine + ?Sized> {
    engine: &'a E,
    config: &'a Config,
    schemas: Vec<CollectionSchema>,
}

impl<'a, E: StorageEngine + ?Sized> Bootstrapper<'a, E> {
    pub fn new(engine: &'a E, config: &'a Config) -> Self {
        Self {
            engine,
            config,
            schemas: collections::all(),
        }
    }

    pub async fn run(&self) -> Result<BootstrapReport> {
        let started_at = Utc::now();

        info!(
            "Bootstrapping catalog '{}' on {} engine ({} collections, on_existing={:?})",
            self.config.catalog,
            self.engine.kind(),
            self.schemas.len(),
            self.config.on_existing
        );

        let user = self.provision_user().await?;

        let mut outcomes = Vec::with_capacity(self.schemas.len());
        for schema in &self.schemas {
            outcomes.push(self.register_collection(schema).await?);
        }

        let report = BootstrapReport {
            engine: self.engine.kind().to_string(),
            catalog: self.config.catalog.clone(),
            app_user: self.config.app.username.clone(),
            user,
            collections: outcomes,
            started_at,
            finished_at: Utc::now(),
        };

        info!(
            "Bootstrap complete: created={:?} skipped={:?}",
            report.created(),
            report.skipped()
        );

        Ok(report)
    }

    async fn provision_user(&self) -> Result<StepOutcome> {
        let admin_db = &self.config.admin_db;
        let account = AppAccount::read_write(&self.config.app, &self.config.catalog);

        if self.config.on_existing == ExistingPolicy::Skip
            && self.engine.user_exists(admin_db, account.username()).await?
        {
            warn!(
                "User '{}' already exists in '{}', skipping",
                account.username(),
                admin_db
            );
            return Ok(StepOutcome::Skipped);
        }

        self.engine.create_user(admin_db, &account).await?;
        info!(
            "Created user '{}' in '{}' with readWrite on '{}'",
            account.username(),
            admin_db,
            self.config.catalog
        );

        Ok(StepOutcome::Created)
    }

    async fn register_collection(&self, schema: &CollectionSchema) -> Result<CollectionOutcome> {
        let catalog = &self.config.catalog;
        let checksum = schema.checksum();

        let outcome = if self.config.on_existing == ExistingPolicy::Skip
            && self.engine.collection_exists(catalog, schema.name).await?
        {
            // Existing validators are left as they are, even if they differ
            warn!(
                "Collection '{}.{}' already exists, skipping",
                catalog, schema.name
            );
            StepOutcome::Skipped
        } else {
            self.engine.create_collection(catalog, schema).await?;
            info!(
                "Created collection '{}.{}' (strict, required={:?}, checksum={})",
                catalog,
                schema.name,
                schema.shape.required_fields(),
                &checksum[..12]
            );
            StepOutcome::Created
        };

        debug!("Validator for {}: {}", schema.name, schema.validator());

        Ok(CollectionOutcome {
            name: schema.name.to_string(),
            outcome,
            checksum,
        })
    }
}
