use super::{AppAccount, StorageEngine};
use crate::error::{BootstrapError, Result};
use crate::schema::{CollectionSchema, DocumentValidator};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};
use tracing::debug;

struct MemoryCollection {
    /// `None` for collections created implicitly by an insert
    schema: Option<CollectionSchema>,
    documents: Vec<Document>,
}

/// In-process engine with MongoDB's bootstrap-relevant semantics: creates
/// fail on existing names, `_id` is assigned before validation, and strict
/// validators reject non-conforming writes.
pub struct MemoryEngine {
    users: DashMap<String, AppAccount>,
    collections: DashMap<String, MemoryCollection>,
    privileged: bool,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            collections: DashMap::new(),
            privileged: true,
        }
    }

    /// An engine whose session may not create users or collections
    pub fn without_privileges() -> Self {
        Self {
            privileged: false,
            ..Self::new()
        }
    }

    pub fn account(&self, admin_db: &str, username: &str) -> Option<AppAccount> {
        self.users
            .get(&namespace(admin_db, username))
            .map(|entry| entry.value().clone())
    }

    pub fn collection_names(&self, catalog: &str) -> Vec<String> {
        let prefix = format!("{}.", catalog);
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter_map(|entry| entry.key().strip_prefix(&prefix).map(str::to_string))
            .collect();
        names.sort();
        names
    }

    pub fn documents(&self, catalog: &str, collection: &str) -> Vec<Document> {
        self.collections
            .get(&namespace(catalog, collection))
            .map(|entry| entry.documents.clone())
            .unwrap_or_default()
    }

    fn require_privilege(&self, operation: &str, database: &str) -> Result<()> {
        if self.privileged {
            Ok(())
        } else {
            Err(BootstrapError::Unauthorized {
                operation: operation.to_string(),
                database: database.to_string(),
                cause: "not authorized on this session".to_string(),
            })
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn namespace(database: &str, name: &str) -> String {
    format!("{}.{}", database, name)
}

#[async_trait]
impl StorageEngine for MemoryEngine {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn user_exists(&self, admin_db: &str, username: &str) -> Result<bool> {
        self.require_privilege("usersInfo", admin_db)?;
        Ok(self.users.contains_key(&namespace(admin_db, username)))
    }

    async fn create_user(&self, admin_db: &str, account: &AppAccount) -> Result<()> {
        self.require_privilege("createUser", admin_db)?;

        match self.users.entry(namespace(admin_db, account.username())) {
            Entry::Occupied(entry) => Err(BootstrapError::AlreadyExists {
                kind: "user",
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!("memory: created user {}", entry.key());
                entry.insert(account.clone());
                Ok(())
            }
        }
    }

    async fn collection_exists(&self, catalog: &str, name: &str) -> Result<bool> {
        self.require_privilege("listCollections", catalog)?;
        Ok(self.collections.contains_key(&namespace(catalog, name)))
    }

    async fn create_collection(&self, catalog: &str, schema: &CollectionSchema) -> Result<()> {
        self.require_privilege("create", catalog)?;

        match self.collections.entry(namespace(catalog, schema.name)) {
            Entry::Occupied(entry) => Err(BootstrapError::AlreadyExists {
                kind: "collection",
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!("memory: created collection {}", entry.key());
                entry.insert(MemoryCollection {
                    schema: Some(schema.clone()),
                    documents: Vec::new(),
                });
                Ok(())
            }
        }
    }

    async fn insert_document(
        &self,
        catalog: &str,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId> {
        let existing = match document.get("_id") {
            Some(Bson::ObjectId(id)) => Some(*id),
            Some(other) => {
                return Err(BootstrapError::Internal(format!(
                    "memory engine only supports ObjectId _id values, got {}",
                    other
                )))
            }
            None => None,
        };

        let (id, stored) = match existing {
            Some(id) => (id, document),
            None => {
                let id = ObjectId::new();
                let mut stored = doc! { "_id": id };
                stored.extend(document);
                (id, stored)
            }
        };

        let mut entry = self
            .collections
            .entry(namespace(catalog, collection))
            .or_insert_with(|| MemoryCollection {
                schema: None,
                documents: Vec::new(),
            });

        if entry
            .documents
            .iter()
            .any(|stored| stored.get_object_id("_id").ok() == Some(id))
        {
            return Err(BootstrapError::DuplicateKey {
                collection: collection.to_string(),
                cause: format!("_id {} already stored", id),
            });
        }

        if let Some(schema) = &entry.schema {
            let report = DocumentValidator::validate(schema, &stored);
            if !report.passed() {
                return Err(BootstrapError::DocumentValidation {
                    collection: collection.to_string(),
                    violations: report.messages(),
                });
            }
        }

        entry.documents.push(stored);
        Ok(id)
    }
}
