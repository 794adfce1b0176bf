//! Notifications module - toast messages handed to the UI layer.

mod notifications_model;
mod notifications_queue;

pub use notifications_model::{Notification, NotificationKind};
pub use notifications_queue::{NotificationQueue, NotificationSink};
