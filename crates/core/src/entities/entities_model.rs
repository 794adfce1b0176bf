//! Entity kinds, mutation operations and identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::entities_errors::EntityError;

// =============================================================================
// Entity Type
// =============================================================================

/// The kinds of business objects tracked by the back office.
///
/// The set is closed: propagation is keyed by this enum, so an unknown
/// entity kind cannot reach the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Event,
    Expense,
    Vendor,
    StaffMember,
    CostItem,
    RevenueItem,
}

impl EntityType {
    /// All entity types, in declaration order.
    pub const ALL: [EntityType; 6] = [
        EntityType::Event,
        EntityType::Expense,
        EntityType::Vendor,
        EntityType::StaffMember,
        EntityType::CostItem,
        EntityType::RevenueItem,
    ];

    /// Returns the wire name of this entity type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Event => "event",
            EntityType::Expense => "expense",
            EntityType::Vendor => "vendor",
            EntityType::StaffMember => "staffMember",
            EntityType::CostItem => "costItem",
            EntityType::RevenueItem => "revenueItem",
        }
    }

    /// Returns a human-friendly label for this entity type.
    pub fn label(&self) -> &'static str {
        match self {
            EntityType::Event => "Event",
            EntityType::Expense => "Expense",
            EntityType::Vendor => "Vendor",
            EntityType::StaffMember => "Staff Member",
            EntityType::CostItem => "Cost Item",
            EntityType::RevenueItem => "Revenue Item",
        }
    }

    /// Financial line items roll up into an event's totals.
    pub fn is_financial_line_item(&self) -> bool {
        matches!(
            self,
            EntityType::Expense | EntityType::RevenueItem | EntityType::CostItem
        )
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = EntityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EntityType::ALL
            .into_iter()
            .find(|entity_type| entity_type.as_str() == s)
            .ok_or_else(|| EntityError::UnknownEntityType(s.to_string()))
    }
}

// =============================================================================
// Entity Operation
// =============================================================================

/// The kind of mutation applied to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityOperation {
    Add,
    Update,
    Delete,
    Restore,
}

impl EntityOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityOperation::Add => "add",
            EntityOperation::Update => "update",
            EntityOperation::Delete => "delete",
            EntityOperation::Restore => "restore",
        }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self, EntityOperation::Delete)
    }
}

impl fmt::Display for EntityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityOperation {
    type Err = EntityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "add" => Ok(EntityOperation::Add),
            "update" => Ok(EntityOperation::Update),
            "delete" => Ok(EntityOperation::Delete),
            "restore" => Ok(EntityOperation::Restore),
            _ => Err(EntityError::UnknownOperation(s.to_string())),
        }
    }
}

// =============================================================================
// Entity Id
// =============================================================================

/// Identifier of a single entity. Records created by the dashboard use
/// string ids, imported ones may carry numeric ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        EntityId::Text(value)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}
