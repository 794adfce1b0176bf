//! Static dependency graph between entity types.
//!
//! Maps a changed entity type to the entity types whose listeners must also
//! be notified. The table is one level deep: dependents of dependents are not
//! followed, so the `event <-> expense` pair cannot loop.

use crate::entities::EntityType;

const EVENT_DEPENDENTS: &[EntityType] = &[
    EntityType::Expense,
    EntityType::CostItem,
    EntityType::RevenueItem,
    EntityType::StaffMember,
];
const EXPENSE_DEPENDENTS: &[EntityType] = &[EntityType::Event];
const VENDOR_DEPENDENTS: &[EntityType] = &[EntityType::Expense];
const REVENUE_ITEM_DEPENDENTS: &[EntityType] = &[EntityType::Event];
const NO_DEPENDENTS: &[EntityType] = &[];

/// Returns the entity types that depend on `entity_type`, in notification order.
pub fn dependents_of(entity_type: EntityType) -> &'static [EntityType] {
    match entity_type {
        EntityType::Event => EVENT_DEPENDENTS,
        EntityType::Expense => EXPENSE_DEPENDENTS,
        EntityType::Vendor => VENDOR_DEPENDENTS,
        EntityType::RevenueItem => REVENUE_ITEM_DEPENDENTS,
        EntityType::StaffMember | EntityType::CostItem => NO_DEPENDENTS,
    }
}
