//! Entities module - the closed set of entity kinds and mutation operations.

mod entities_errors;
mod entities_model;

pub use entities_errors::EntityError;
pub use entities_model::{EntityId, EntityOperation, EntityType};
