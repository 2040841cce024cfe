use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StacksetError {
    #[error("stack set not found: {0}")]
    StackSetNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid call-as value '{0}': expected DELEGATED_ADMIN or SELF")]
    InvalidCallAs(String),

    #[error("invalid instance status filter: {0}")]
    InvalidStatusFilter(String),

    #[error("invalid retry kind '{0}': expected failed or drifted")]
    InvalidRetryKind(String),

    #[error("no AWS region configured: set AWS_DEFAULT_REGION or pass --region")]
    MissingRegion,

    #[error("Failed to retrieve organization root OU ID: organization has no roots")]
    NoOrganizationRoot,

    #[error("Failed to retrieve organization root OU ID: {0}")]
    RootLookup(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("{operation} failed: {message}")]
    Aws {
        operation: &'static str,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl StacksetError {
    pub fn aws(operation: &'static str, message: impl Into<String>) -> Self {
        StacksetError::Aws {
            operation,
            message: message.into(),
        }
    }

    /// Recover an owned error from one shared between concurrent waiters on
    /// the same cache entry.
    pub fn from_shared(shared: Arc<StacksetError>) -> Self {
        let shared = match Arc::try_unwrap(shared) {
            Ok(owned) => return owned,
            Err(shared) => shared,
        };
        match &*shared {
            StacksetError::StackSetNotFound(name) => {
                StacksetError::StackSetNotFound(name.clone())
            }
            StacksetError::Aws { operation, message } => {
                StacksetError::aws(*operation, message.clone())
            }
            other => StacksetError::Io(std::io::Error::other(other.to_string())),
        }
    }
}

pub type Result<T> = std::result::Result<T, StacksetError>;
