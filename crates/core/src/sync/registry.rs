//! Per-entity-type listener registry.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::error;

use crate::entities::EntityType;

/// Result type returned by fallible listeners.
pub type ListenerResult = anyhow::Result<()>;

type Listener = Arc<dyn Fn() -> ListenerResult + Send + Sync>;
type ListenerMap = HashMap<EntityType, Vec<(ListenerId, Listener)>>;

/// Identity of a registered listener, unique within its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// A listener that failed during a trigger pass.
#[derive(Debug, Clone)]
pub(crate) struct ListenerFailure {
    pub listener_id: ListenerId,
    pub message: String,
}

struct RegistryInner {
    listeners: Mutex<ListenerMap>,
    next_id: AtomicU64,
}

impl RegistryInner {
    fn lock(&self) -> MutexGuard<'_, ListenerMap> {
        // Listeners never run under this lock, so a poisoned guard still holds
        // consistent lists.
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, entity_type: EntityType, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let list = listeners.entry(entity_type).or_default();
        match list.iter().position(|(listener_id, _)| *listener_id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Registry of listeners keyed by entity type.
///
/// Every entity type has a (possibly empty) listener list from construction
/// on. Listeners run synchronously on the caller's thread, in registration
/// order. Cloning the registry yields another handle to the same lists.
#[derive(Clone)]
pub struct SyncRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for SyncRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncRegistry {
    pub fn new() -> Self {
        let listeners = EntityType::ALL
            .into_iter()
            .map(|entity_type| (entity_type, Vec::new()))
            .collect();
        Self {
            inner: Arc::new(RegistryInner {
                listeners: Mutex::new(listeners),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Registers a listener for `entity_type`.
    ///
    /// A panicking listener is caught and logged during triggers.
    pub fn register<F>(&self, entity_type: EntityType, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.insert(
            entity_type,
            Arc::new(move || -> ListenerResult {
                callback();
                Ok(())
            }),
        )
    }

    /// Registers a listener whose `Err` result is logged as a failure.
    pub fn register_fallible<F>(&self, entity_type: EntityType, callback: F) -> Subscription
    where
        F: Fn() -> ListenerResult + Send + Sync + 'static,
    {
        self.insert(entity_type, Arc::new(callback))
    }

    fn insert(&self, entity_type: EntityType, listener: Listener) -> Subscription {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner
            .lock()
            .entry(entity_type)
            .or_default()
            .push((id, listener));

        Subscription {
            entity_type,
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Removes a listener by id. Returns false if it was not registered.
    pub fn unregister(&self, entity_type: EntityType, id: ListenerId) -> bool {
        self.inner.remove(entity_type, id)
    }

    /// Invokes every listener currently registered for `entity_type`.
    ///
    /// The list is snapshotted before the first listener runs: listeners
    /// added or removed during the pass take effect on the next trigger.
    /// Failing listeners are logged and never stop the pass.
    pub fn trigger(&self, entity_type: EntityType) {
        self.run_listeners(entity_type);
    }

    pub(crate) fn run_listeners(&self, entity_type: EntityType) -> Vec<ListenerFailure> {
        let snapshot: Vec<(ListenerId, Listener)> = self
            .inner
            .lock()
            .get(&entity_type)
            .cloned()
            .unwrap_or_default();

        let mut failures = Vec::new();
        for (listener_id, listener) in snapshot {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener()));
            let message = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => format!("{:#}", err),
                Err(payload) => panic_message(payload.as_ref()),
            };
            error!(
                "Sync listener {:?} for '{}' failed: {}",
                listener_id, entity_type, message
            );
            failures.push(ListenerFailure {
                listener_id,
                message,
            });
        }
        failures
    }

    /// Number of listeners registered for `entity_type`.
    pub fn listener_count(&self, entity_type: EntityType) -> usize {
        self.inner
            .lock()
            .get(&entity_type)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Number of listeners across all entity types.
    pub fn total_listeners(&self) -> usize {
        self.inner.lock().values().map(Vec::len).sum()
    }

    /// Removes every listener for `entity_type`.
    pub fn clear(&self, entity_type: EntityType) {
        self.inner.lock().entry(entity_type).or_default().clear();
    }

    /// Removes every listener. The per-type lists stay in place.
    pub fn clear_all(&self) {
        for list in self.inner.lock().values_mut() {
            list.clear();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "listener panicked".to_string()
    }
}

/// Handle returned by [`SyncRegistry::register`].
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unregister`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    entity_type: EntityType,
    id: ListenerId,
    registry: Weak<RegistryInner>,
}

impl Subscription {
    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes exactly this listener.
    ///
    /// Calling it again, or after the registry was dropped, does nothing.
    pub fn unregister(&self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.remove(self.entity_type, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn test_every_entity_type_starts_empty() {
        let registry = SyncRegistry::new();
        for entity_type in EntityType::ALL {
            assert_eq!(registry.listener_count(entity_type), 0);
        }
        assert_eq!(registry.total_listeners(), 0);
    }

    #[test]
    fn test_trigger_runs_listeners_in_registration_order() {
        let registry = SyncRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = order.clone();
            registry.register(EntityType::Vendor, move || {
                order.lock().unwrap().push(name);
            });
        }

        registry.trigger(EntityType::Vendor);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_trigger_only_reaches_its_entity_type() {
        let registry = SyncRegistry::new();
        let hits = counter();
        let hits_clone = hits.clone();
        registry.register(EntityType::StaffMember, move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.trigger(EntityType::Event);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        registry.trigger(EntityType::StaffMember);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregister_removes_only_that_listener() {
        let registry = SyncRegistry::new();
        let a = counter();
        let b = counter();

        let a_clone = a.clone();
        let sub_a = registry.register(EntityType::Expense, move || {
            a_clone.fetch_add(1, Ordering::SeqCst);
        });
        let b_clone = b.clone();
        registry.register(EntityType::Expense, move || {
            b_clone.fetch_add(1, Ordering::SeqCst);
        });

        sub_a.unregister();
        registry.trigger(EntityType::Expense);

        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 1);
        assert_eq!(registry.listener_count(EntityType::Expense), 1);
    }

    #[test]
    fn test_double_unregister_is_noop() {
        let registry = SyncRegistry::new();
        let sub = registry.register(EntityType::Event, || {});
        sub.unregister();
        sub.unregister();
        assert!(!registry.unregister(EntityType::Event, sub.id()));
        assert_eq!(registry.listener_count(EntityType::Event), 0);
    }

    #[test]
    fn test_unregister_after_registry_dropped() {
        let registry = SyncRegistry::new();
        let sub = registry.register(EntityType::Event, || {});
        drop(registry);
        sub.unregister();
    }

    #[test]
    fn test_same_closure_registered_twice_fires_twice() {
        let registry = SyncRegistry::new();
        let hits = counter();
        let subs: Vec<_> = (0..2)
            .map(|_| {
                let hits = hits.clone();
                registry.register(EntityType::CostItem, move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        assert_ne!(subs[0].id(), subs[1].id());

        registry.trigger(EntityType::CostItem);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_the_pass() {
        let registry = SyncRegistry::new();
        let hits = counter();

        registry.register(EntityType::Event, || panic!("boom"));
        let hits_clone = hits.clone();
        registry.register(EntityType::Event, move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        let failures = registry.run_listeners(EntityType::Event);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "boom");
    }

    #[test]
    fn test_failing_fallible_listener_is_reported() {
        let registry = SyncRegistry::new();
        let hits = counter();

        let sub = registry.register_fallible(EntityType::Vendor, || {
            Err(anyhow::anyhow!("vendor cache unavailable"))
        });
        let hits_clone = hits.clone();
        registry.register_fallible(EntityType::Vendor, move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let failures = registry.run_listeners(EntityType::Vendor);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].listener_id, sub.id());
        assert!(failures[0].message.contains("vendor cache unavailable"));
    }

    #[test]
    fn test_listener_unregistering_itself_still_completes_pass() {
        let registry = SyncRegistry::new();
        let hits = counter();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot_clone = slot.clone();
        let hits_clone = hits.clone();
        let sub = registry.register(EntityType::RevenueItem, move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = slot_clone.lock().unwrap().as_ref() {
                sub.unregister();
            }
        });
        *slot.lock().unwrap() = Some(sub);

        let later = counter();
        let later_clone = later.clone();
        registry.register(EntityType::RevenueItem, move || {
            later_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.trigger(EntityType::RevenueItem);
        registry.trigger(EntityType::RevenueItem);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(later.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_listener_unregistering_a_later_one_applies_next_trigger() {
        let registry = SyncRegistry::new();
        let victim_hits = counter();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

        let slot_clone = slot.clone();
        registry.register(EntityType::Event, move || {
            if let Some(sub) = slot_clone.lock().unwrap().as_ref() {
                sub.unregister();
            }
        });
        let victim_clone = victim_hits.clone();
        let victim = registry.register(EntityType::Event, move || {
            victim_clone.fetch_add(1, Ordering::SeqCst);
        });
        *slot.lock().unwrap() = Some(victim);

        registry.trigger(EntityType::Event);
        assert_eq!(victim_hits.load(Ordering::SeqCst), 1);

        registry.trigger(EntityType::Event);
        assert_eq!(victim_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_registered_during_trigger_waits_for_next_pass() {
        let registry = SyncRegistry::new();
        let late_hits = counter();

        let registry_clone = registry.clone();
        let late_clone = late_hits.clone();
        registry.register(EntityType::Vendor, move || {
            let late = late_clone.clone();
            registry_clone.register(EntityType::Vendor, move || {
                late.fetch_add(1, Ordering::SeqCst);
            });
        });

        registry.trigger(EntityType::Vendor);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
        assert_eq!(registry.listener_count(EntityType::Vendor), 2);

        registry.trigger(EntityType::Vendor);
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_keeps_entries() {
        let registry = SyncRegistry::new();
        registry.register(EntityType::Event, || {});
        registry.register(EntityType::Expense, || {});

        registry.clear(EntityType::Event);
        assert_eq!(registry.listener_count(EntityType::Event), 0);
        assert_eq!(registry.listener_count(EntityType::Expense), 1);

        registry.clear_all();
        assert_eq!(registry.total_listeners(), 0);
        registry.trigger(EntityType::Expense);
    }
}
