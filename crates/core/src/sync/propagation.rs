//! Propagation driver.

use std::sync::Arc;

use log::debug;

use super::graph::dependents_of;
use super::registry::{ListenerResult, SyncRegistry, Subscription};
use crate::config::SyncConfig;
use crate::entities::{EntityId, EntityOperation, EntityType};
use crate::events::{EntityChange, EntityChangeSink};
use crate::notifications::{Notification, NotificationSink};

/// Turns "entity type X changed" into listener invocations.
///
/// Notifies the changed type's own listeners, then the listeners of each
/// declared dependent. Deleting a financial line item additionally
/// re-notifies `event`, whose totals depend on it.
pub struct EntitySync {
    registry: SyncRegistry,
    config: SyncConfig,
    notification_sink: Option<Arc<dyn NotificationSink>>,
}

impl EntitySync {
    pub fn new(registry: SyncRegistry) -> Self {
        Self {
            registry,
            config: SyncConfig::default(),
            notification_sink: None,
        }
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the sink that receives an error notification per failing
    /// listener (when enabled in the config).
    pub fn with_notification_sink(mut self, notification_sink: Arc<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(notification_sink);
        self
    }

    pub fn registry(&self) -> &SyncRegistry {
        &self.registry
    }

    pub fn register<F>(&self, entity_type: EntityType, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.registry.register(entity_type, callback)
    }

    pub fn register_fallible<F>(&self, entity_type: EntityType, callback: F) -> Subscription
    where
        F: Fn() -> ListenerResult + Send + Sync + 'static,
    {
        self.registry.register_fallible(entity_type, callback)
    }

    /// Triggers `entity_type` and then each of its dependents, in order.
    pub fn propagate(&self, entity_type: EntityType) {
        let dependents = dependents_of(entity_type);
        debug!(
            "Propagating change of '{}' to dependents {:?}",
            entity_type, dependents
        );

        self.trigger(entity_type);
        for dependent in dependents {
            self.trigger(*dependent);
        }
    }

    /// Like [`EntitySync::propagate`], aware of the mutation that happened.
    ///
    /// Deleting an expense, cost item or revenue item also triggers `event`,
    /// even when `event` was already reached through the dependency graph.
    pub fn propagate_with_operation(
        &self,
        entity_type: EntityType,
        operation: EntityOperation,
        entity_id: Option<EntityId>,
    ) {
        match &entity_id {
            Some(id) => debug!("Entity '{}' {} ({})", entity_type, operation, id),
            None => debug!("Entity '{}' {}", entity_type, operation),
        }

        self.propagate(entity_type);

        if operation.is_deletion() && entity_type.is_financial_line_item() {
            debug!(
                "Deleted financial line item '{}', resyncing '{}'",
                entity_type,
                EntityType::Event
            );
            self.trigger(EntityType::Event);
        }
    }

    fn trigger(&self, entity_type: EntityType) {
        let failures = self.registry.run_listeners(entity_type);
        if failures.is_empty() || !self.config.notify_on_listener_failure {
            return;
        }
        let Some(sink) = &self.notification_sink else {
            return;
        };
        for failure in failures {
            debug!(
                "Reporting failure of listener {:?} on '{}'",
                failure.listener_id, entity_type
            );
            sink.notify(Notification::error(format!(
                "Failed to refresh {} data: {}",
                entity_type.label().to_lowercase(),
                failure.message
            )));
        }
    }
}

impl EntityChangeSink for EntitySync {
    fn emit(&self, change: EntityChange) {
        self.propagate_with_operation(change.entity_type, change.operation, change.entity_id);
    }
}
