//! Storage engines
//!
//! The bootstrap never enforces anything itself: it declares accounts and
//! validated collections to an engine, and the engine enforces them on every
//! later write. Two engines implement the same contract:
//!
//! - [`MongoEngine`]: a real MongoDB deployment
//! - [`MemoryEngine`]: in-process, enforcing validators with
//!   [`DocumentValidator`](crate::schema::DocumentValidator); used for dry
//!   runs and tests

mod memory;
mod mongo;

pub use memory::MemoryEngine;
pub use mongo::MongoEngine;

use crate::config::Credentials;
use crate::error::Result;
use crate::schema::CollectionSchema;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};

/// A role granted on one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub role: String,
    pub db: String,
}

/// Application account to be created in the administrative catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppAccount {
    pub credentials: Credentials,
    pub roles: Vec<RoleGrant>,
}

impl AppAccount {
    /// Account with `readWrite` on exactly one catalog
    pub fn read_write(credentials: &Credentials, catalog: &str) -> Self {
        Self {
            credentials: credentials.clone(),
            roles: vec![RoleGrant {
                role: "readWrite".to_string(),
                db: catalog.to_string(),
            }],
        }
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    /// The `createUser` command for this account
    pub fn create_user_command(&self) -> Document {
        let roles: Vec<Bson> = self
            .roles
            .iter()
            .map(|grant| Bson::Document(doc! { "role": grant.role.as_str(), "db": grant.db.as_str() }))
            .collect();

        doc! {
            "createUser": self.credentials.username.as_str(),
            "pwd": self.credentials.password.as_str(),
            "roles": roles,
        }
    }
}

#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Short name for logs
    fn kind(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    async fn user_exists(&self, admin_db: &str, username: &str) -> Result<bool>;

    async fn create_user(&self, admin_db: &str, account: &AppAccount) -> Result<()>;

    async fn collection_exists(&self, catalog: &str, name: &str) -> Result<bool>;

    /// Create the collection with its validator at strict level
    async fn create_collection(&self, catalog: &str, schema: &CollectionSchema) -> Result<()>;

    /// Insert one document, returning its identifier
    async fn insert_document(
        &self,
        catalog: &str,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId>;
}
