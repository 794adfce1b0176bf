//! Application-scoped wiring of the sync services.

use std::sync::Arc;

use log::info;

use crate::config::SyncConfig;
use crate::errors::Result;
use crate::events::EntityChangeSink;
use crate::notifications::{NotificationQueue, NotificationSink};
use crate::store::{Record, RecordStore};
use crate::sync::{EntitySync, SyncRegistry};

/// Owns the registry, propagation driver and notification queue for one
/// application lifetime. Create it at start-up and call
/// [`SyncContext::shutdown`] when the application stops.
pub struct SyncContext {
    config: SyncConfig,
    registry: SyncRegistry,
    entity_sync: Arc<EntitySync>,
    notifications: Arc<NotificationQueue>,
}

impl SyncContext {
    pub fn new(config: SyncConfig) -> Result<Self> {
        config.validate()?;

        let registry = SyncRegistry::new();
        let notifications = Arc::new(NotificationQueue::new(config.notification_capacity));
        let notification_sink: Arc<dyn NotificationSink> = notifications.clone();
        let entity_sync = Arc::new(
            EntitySync::new(registry.clone())
                .with_config(config.clone())
                .with_notification_sink(notification_sink),
        );

        info!(
            "Entity sync initialized (notification capacity: {})",
            config.notification_capacity
        );

        Ok(Self {
            config,
            registry,
            entity_sync,
            notifications,
        })
    }

    /// Builds a context from `EVENTDESK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SyncConfig::from_env()?)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn registry(&self) -> &SyncRegistry {
        &self.registry
    }

    pub fn entity_sync(&self) -> Arc<EntitySync> {
        self.entity_sync.clone()
    }

    pub fn notifications(&self) -> Arc<NotificationQueue> {
        self.notifications.clone()
    }

    /// Creates a store whose mutations propagate through this context.
    pub fn record_store<T: Record>(&self) -> RecordStore<T> {
        let sink: Arc<dyn EntityChangeSink> = self.entity_sync.clone();
        RecordStore::new().with_event_sink(sink)
    }

    /// Drops every registered listener and pending notification.
    pub fn shutdown(&self) {
        let listeners = self.registry.total_listeners();
        self.registry.clear_all();
        let dropped = self.notifications.take_all().len();
        info!(
            "Entity sync shut down ({} listeners, {} pending notifications released)",
            listeners, dropped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityType;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SyncConfig {
            notification_capacity: 0,
            ..SyncConfig::default()
        };
        assert!(SyncContext::new(config).is_err());
    }

    #[test]
    fn test_contexts_do_not_share_listeners() {
        let first = SyncContext::new(SyncConfig::default()).unwrap();
        let second = SyncContext::new(SyncConfig::default()).unwrap();

        first.registry().register(EntityType::Event, || {});

        assert_eq!(first.registry().total_listeners(), 1);
        assert_eq!(second.registry().total_listeners(), 0);
    }

    #[test]
    fn test_shutdown_clears_listeners_and_notifications() {
        let context = SyncContext::new(SyncConfig::default()).unwrap();
        context
            .entity_sync()
            .register(EntityType::Vendor, || panic!("stale vendor list"));

        context.entity_sync().propagate(EntityType::Vendor);
        assert_eq!(context.notifications().len(), 1);

        context.shutdown();
        assert_eq!(context.registry().total_listeners(), 0);
        assert!(context.notifications().is_empty());
    }
}
