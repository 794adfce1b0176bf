//! Entity sync module.
//!
//! Lets independent parts of the application register interest in "an
//! entity type changed" and propagates each change to the statically
//! declared dependent entity types.
//!
//! ```text
//! EntityChange ─▶ EntitySync ─▶ SyncRegistry::trigger(changed)
//!                     │
//!                     └────────▶ SyncRegistry::trigger(dependent) for each dependents_of(changed)
//! ```
//!
//! - **Registry** (`registry.rs`) - per-entity-type listener lists
//! - **Graph** (`graph.rs`) - static dependency table
//! - **Propagation** (`propagation.rs`) - the driver, including the rule that
//!   deleting a financial line item resyncs `event`
//!
//! Everything runs synchronously on the caller's thread. A listener that
//! panics or returns an error is logged and skipped; the mutation that caused
//! the propagation never sees the failure.

mod graph;
mod propagation;
mod registry;

pub use graph::dependents_of;
pub use propagation::EntitySync;
pub use registry::{ListenerId, ListenerResult, Subscription, SyncRegistry};
