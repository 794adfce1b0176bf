//! Entity change records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{EntityId, EntityOperation, EntityType};

/// A fact about a completed entity mutation.
///
/// Mutation code reports changes after they succeed; sinks decide what to do
/// with them (propagate to listeners, forward to a UI bridge, record in tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityChange {
    pub entity_type: EntityType,
    pub operation: EntityOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    pub occurred_at: DateTime<Utc>,
}

impl EntityChange {
    /// Creates a change without a specific entity id.
    pub fn new(entity_type: EntityType, operation: EntityOperation) -> Self {
        Self {
            entity_type,
            operation,
            entity_id: None,
            occurred_at: Utc::now(),
        }
    }

    /// Attaches the id of the mutated entity.
    pub fn with_id(mut self, entity_id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn added(entity_type: EntityType, entity_id: impl Into<EntityId>) -> Self {
        Self::new(entity_type, EntityOperation::Add).with_id(entity_id)
    }

    pub fn updated(entity_type: EntityType, entity_id: impl Into<EntityId>) -> Self {
        Self::new(entity_type, EntityOperation::Update).with_id(entity_id)
    }

    pub fn deleted(entity_type: EntityType, entity_id: impl Into<EntityId>) -> Self {
        Self::new(entity_type, EntityOperation::Delete).with_id(entity_id)
    }

    pub fn restored(entity_type: EntityType, entity_id: impl Into<EntityId>) -> Self {
        Self::new(entity_type, EntityOperation::Restore).with_id(entity_id)
    }
}
