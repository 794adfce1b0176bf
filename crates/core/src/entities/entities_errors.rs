use thiserror::Error;

/// Errors raised when entity identifiers arrive from outside the crate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EntityError {
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("Unknown entity operation: {0}")]
    UnknownOperation(String),
}
