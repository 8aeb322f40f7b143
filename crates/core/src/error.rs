// Central Error Taxonomy (spec section 7)

use thiserror::Error;

/// A single boundary-input field that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation error on field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Underlying store failure (connection, query). State change is undefined on this path;
/// callers should assume nothing committed unless they can verify it.
#[derive(Error, Debug)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

impl StorageError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Adapter misconfigured at construction or `initialize`.
#[derive(Error, Debug)]
#[error("configuration error: {0}")]
pub struct ConfigurationError(pub String);

/// Application-level error type for the queue. `PreconditionNotMet` (spec section 7) is
/// deliberately absent here: it is modeled as `Ok(None)`, not an error, so that completing an
/// already-completed job stays a silent no-op rather than a failure.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, QueueError>;
