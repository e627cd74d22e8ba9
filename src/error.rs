use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Missing configuration: {key} must be set and non-empty")]
    MissingConfig { key: &'static str },

    #[error("Invalid configuration {key}={value}: {reason}")]
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Connection failed to {target}: {cause}")]
    ConnectionFailed { target: String, cause: String },

    #[error("Not authorized to {operation} in {database}: {cause}")]
    Unauthorized {
        operation: String,
        database: String,
        cause: String,
    },

    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    #[error("Document failed validation in {collection}: {}", .violations.join("; "))]
    DocumentValidation {
        collection: String,
        violations: Vec<String>,
    },

    #[error("Duplicate key in {collection}: {cause}")]
    DuplicateKey { collection: String, cause: String },

    #[error("{operation} failed in {database}: {cause}")]
    Engine {
        operation: String,
        database: String,
        cause: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BootstrapError {
    /// True for the re-initialization conflict (user or collection present).
    pub fn is_already_exists(&self) -> bool {
        matches!(self, BootstrapError::AlreadyExists { .. })
    }
}

impl From<std::io::Error> for BootstrapError {
    fn from(err: std::io::Error) -> Self {
        BootstrapError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for BootstrapError {
    fn from(err: serde_json::Error) -> Self {
        BootstrapError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
