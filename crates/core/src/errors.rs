//! Core error types for EventDesk.
//!
//! Propagation itself never fails from the caller's point of view; these
//! errors cover the boundaries around it: parsing identifiers that arrive as
//! strings, loading configuration and misusing the record store.

use thiserror::Error;

use crate::entities::{EntityError, EntityId, EntityType};

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the in-memory record store.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No live or deleted record has this id.
    #[error("{entity_type} '{id}' not found")]
    NotFound { entity_type: EntityType, id: EntityId },

    /// A record with this id already exists (possibly in the trash).
    #[error("{entity_type} '{id}' already exists")]
    AlreadyExists { entity_type: EntityType, id: EntityId },

    /// Restore was requested for a record that is not deleted.
    #[error("{entity_type} '{id}' is not deleted")]
    NotDeleted { entity_type: EntityType, id: EntityId },
}

impl StoreError {
    pub fn not_found(entity_type: EntityType, id: impl Into<EntityId>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    pub fn already_exists(entity_type: EntityType, id: impl Into<EntityId>) -> Self {
        Self::AlreadyExists {
            entity_type,
            id: id.into(),
        }
    }

    pub fn not_deleted(entity_type: EntityType, id: impl Into<EntityId>) -> Self {
        Self::NotDeleted {
            entity_type,
            id: id.into(),
        }
    }
}
