use super::{AppAccount, StorageEngine};
use crate::error::{BootstrapError, Result};
use crate::schema::CollectionSchema;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::Client;
use tracing::{debug, info};

/// Server error codes the bootstrap distinguishes
mod codes {
    pub const UNAUTHORIZED: i32 = 13;
    pub const AUTHENTICATION_FAILED: i32 = 18;
    pub const NAMESPACE_EXISTS: i32 = 48;
    pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;
    pub const DUPLICATE_KEY: i32 = 11000;
    pub const USER_ALREADY_EXISTS: i32 = 51003;
}

pub struct MongoEngine {
    client: Client,
    admin_db: String,
}

impl MongoEngine {
    pub async fn connect(uri: &str, admin_db: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| BootstrapError::ConnectionFailed {
                target: "mongodb".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self {
            client,
            admin_db: admin_db.to_string(),
        })
    }
}

/// What an engine call was doing when it failed
struct Call<'a> {
    operation: &'static str,
    database: &'a str,
    subject_kind: &'static str,
    subject: String,
}

impl Call<'_> {
    fn fail(&self, err: MongoError) -> BootstrapError {
        let cause = err.to_string();
        classify(server_code(&err), cause, self)
    }
}

fn server_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(command) => Some(command.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        _ => None,
    }
}

fn classify(code: Option<i32>, cause: String, call: &Call<'_>) -> BootstrapError {
    match code {
        Some(codes::UNAUTHORIZED) | Some(codes::AUTHENTICATION_FAILED) => {
            BootstrapError::Unauthorized {
                operation: call.operation.to_string(),
                database: call.database.to_string(),
                cause,
            }
        }
        Some(codes::NAMESPACE_EXISTS) | Some(codes::USER_ALREADY_EXISTS) => {
            BootstrapError::AlreadyExists {
                kind: call.subject_kind,
                name: call.subject.clone(),
            }
        }
        Some(codes::DOCUMENT_VALIDATION_FAILURE) => BootstrapError::DocumentValidation {
            collection: call.subject.clone(),
            violations: vec![cause],
        },
        Some(codes::DUPLICATE_KEY) => BootstrapError::DuplicateKey {
            collection: call.subject.clone(),
            cause,
        },
        _ => BootstrapError::Engine {
            operation: call.operation.to_string(),
            database: call.database.to_string(),
            cause,
        },
    }
}

#[async_trait]
impl StorageEngine for MongoEngine {
    fn kind(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.admin_db)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| match server_code(&e) {
                Some(codes::AUTHENTICATION_FAILED) | Some(codes::UNAUTHORIZED) => {
                    BootstrapError::Unauthorized {
                        operation: "ping".to_string(),
                        database: self.admin_db.clone(),
                        cause: e.to_string(),
                    }
                }
                _ => BootstrapError::ConnectionFailed {
                    target: format!("{} (admin)", self.admin_db),
                    cause: format!("Ping failed: {}", e),
                },
            })?;

        info!("Connected to MongoDB admin database");
        Ok(())
    }

    async fn user_exists(&self, admin_db: &str, username: &str) -> Result<bool> {
        let call = Call {
            operation: "usersInfo",
            database: admin_db,
            subject_kind: "user",
            subject: format!("{}.{}", admin_db, username),
        };

        let reply = self
            .client
            .database(admin_db)
            .run_command(doc! { "usersInfo": { "user": username, "db": admin_db } })
            .await
            .map_err(|e| call.fail(e))?;

        Ok(reply
            .get_array("users")
            .map(|users| !users.is_empty())
            .unwrap_or(false))
    }

    async fn create_user(&self, admin_db: &str, account: &AppAccount) -> Result<()> {
        let call = Call {
            operation: "createUser",
            database: admin_db,
            subject_kind: "user",
            subject: format!("{}.{}", admin_db, account.username()),
        };

        self.client
            .database(admin_db)
            .run_command(account.create_user_command())
            .await
            .map_err(|e| call.fail(e))?;

        debug!("createUser acknowledged for {}", call.subject);
        Ok(())
    }

    async fn collection_exists(&self, catalog: &str, name: &str) -> Result<bool> {
        let call = Call {
            operation: "listCollections",
            database: catalog,
            subject_kind: "collection",
            subject: format!("{}.{}", catalog, name),
        };

        let names = self
            .client
            .database(catalog)
            .list_collection_names()
            .filter(doc! { "name": name })
            .await
            .map_err(|e| call.fail(e))?;

        Ok(names.iter().any(|n| n == name))
    }

    async fn create_collection(&self, catalog: &str, schema: &CollectionSchema) -> Result<()> {
        let call = Call {
            operation: "create",
            database: catalog,
            subject_kind: "collection",
            subject: format!("{}.{}", catalog, schema.name),
        };

        self.client
            .database(catalog)
            .run_command(schema.create_command())
            .await
            .map_err(|e| call.fail(e))?;

        debug!("create acknowledged for {}", call.subject);
        Ok(())
    }

    async fn insert_document(
        &self,
        catalog: &str,
        collection: &str,
        document: Document,
    ) -> Result<ObjectId> {
        let call = Call {
            operation: "insert",
            database: catalog,
            subject_kind: "document",
            subject: collection.to_string(),
        };

        let result = self
            .client
            .database(catalog)
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map_err(|e| call.fail(e))?;

        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => Err(BootstrapError::Internal(format!(
                "Inserted document in {} has non-ObjectId _id: {}",
                collection, other
            ))),
        }
    }
}
