//! EventDesk Core - entity change propagation for the back office.
//!
//! Views and derived calculations register listeners per entity type
//! (events, expenses, vendors, staff, cost and revenue items). When an
//! entity changes, [`sync::EntitySync`] notifies the listeners of that type
//! and of every type that depends on it.

pub mod config;
pub mod context;
pub mod entities;
pub mod errors;
pub mod events;
pub mod notifications;
pub mod store;
pub mod sync;

pub use config::SyncConfig;
pub use context::SyncContext;
pub use entities::{EntityId, EntityOperation, EntityType};
pub use sync::{EntitySync, Subscription, SyncRegistry};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
