use std::collections::VecDeque;
use std::sync::Mutex;

use log::warn;

use super::notifications_model::Notification;

/// Trait for receiving notifications destined for the UI.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Bounded FIFO of pending notifications.
///
/// When full, the oldest pending notification is dropped to make room.
/// [`NotificationQueue::take_all`] hands every pending notification to the
/// caller exactly once.
pub struct NotificationQueue {
    capacity: usize,
    pending: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    /// Creates a queue holding at most `capacity` notifications (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drains all pending notifications in arrival order.
    pub fn take_all(&self) -> Vec<Notification> {
        self.pending.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }
}

impl NotificationSink for NotificationQueue {
    fn notify(&self, notification: Notification) {
        let mut pending = self.pending.lock().unwrap();
        if pending.len() >= self.capacity {
            if let Some(dropped) = pending.pop_front() {
                warn!(
                    "Notification queue full ({}), dropping oldest: {}",
                    self.capacity, dropped.message
                );
            }
        }
        pending.push_back(notification);
    }
}
