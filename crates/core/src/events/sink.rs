//! Entity change sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::EntityChange;

/// Trait for receiving entity changes.
///
/// Mutation code reports every successful change through this trait.
///
/// # Design Rules
///
/// - `emit()` runs on the caller's thread and returns once the change is handled
/// - Failure to handle a change must not affect the mutation that produced it
pub trait EntityChangeSink: Send + Sync {
    /// Emit a single entity change.
    fn emit(&self, change: EntityChange);

    /// Emit multiple entity changes.
    ///
    /// Default implementation calls `emit()` for each change, in order.
    fn emit_batch(&self, changes: Vec<EntityChange>) {
        for change in changes {
            self.emit(change);
        }
    }
}

/// No-op implementation for tests or contexts that don't need propagation.
#[derive(Clone, Default)]
pub struct NoOpEntityChangeSink;

impl EntityChangeSink for NoOpEntityChangeSink {
    fn emit(&self, _change: EntityChange) {}
}

/// Mock sink for testing - collects emitted changes.
#[derive(Clone, Default)]
pub struct MockEntityChangeSink {
    changes: Arc<Mutex<Vec<EntityChange>>>,
}

impl MockEntityChangeSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected changes.
    pub fn changes(&self) -> Vec<EntityChange> {
        self.changes.lock().unwrap().clone()
    }

    /// Clears collected changes.
    pub fn clear(&self) {
        self.changes.lock().unwrap().clear();
    }

    /// Returns the number of collected changes.
    pub fn len(&self) -> usize {
        self.changes.lock().unwrap().len()
    }

    /// Returns true if no changes have been collected.
    pub fn is_empty(&self) -> bool {
        self.changes.lock().unwrap().is_empty()
    }
}

impl EntityChangeSink for MockEntityChangeSink {
    fn emit(&self, change: EntityChange) {
        self.changes.lock().unwrap().push(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityType;

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpEntityChangeSink;
        sink.emit(EntityChange::added(EntityType::Vendor, "v-1"));
        sink.emit_batch(vec![
            EntityChange::updated(EntityType::Vendor, "v-1"),
            EntityChange::deleted(EntityType::Vendor, "v-1"),
        ]);
    }

    #[test]
    fn test_mock_sink_collects_changes() {
        let sink = MockEntityChangeSink::new();
        assert!(sink.is_empty());

        sink.emit(EntityChange::added(EntityType::Expense, "exp-1"));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![
            EntityChange::updated(EntityType::Expense, "exp-1"),
            EntityChange::deleted(EntityType::Expense, "exp-1"),
        ]);
        assert_eq!(sink.len(), 3);

        let changes = sink.changes();
        assert_eq!(changes[2].operation.as_str(), "delete");

        sink.clear();
        assert!(sink.is_empty());
    }
}
