//! Bounded most-recent-N notification queue.
//!
//! Accepted commands push their notifications here in production order.
//! When the queue is full the oldest entry is dropped. The UI drains the
//! queue whenever it is ready to display.

use std::collections::VecDeque;

use cadence_types::Notification;
use tracing::debug;

/// A FIFO of notifications with a fixed capacity.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    capacity: usize,
    items: VecDeque<Notification>,
    dropped: u64,
}

impl NotificationQueue {
    /// An empty queue holding at most `capacity` notifications (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Append one notification, dropping the oldest when full.
    pub fn push(&mut self, notification: Notification) {
        if self.items.len() >= self.capacity
            && let Some(old) = self.items.pop_front()
        {
            self.dropped = self.dropped.saturating_add(1);
            debug!(kind = ?old.kind, id = %old.id, "notification dropped");
        }
        self.items.push_back(notification);
    }

    /// Append several notifications in order.
    pub fn extend(&mut self, notifications: impl IntoIterator<Item = Notification>) {
        for notification in notifications {
            self.push(notification);
        }
    }

    /// Remove and return every queued notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        self.items.drain(..).collect()
    }

    /// Queued notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Notifications dropped over the queue's lifetime.
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use cadence_types::{NotificationKind, NotificationPayload};
    use chrono::Utc;

    use super::*;

    fn message(key: &str) -> Notification {
        Notification::new(
            NotificationKind::Info,
            "notification.info",
            NotificationPayload::Message {
                key: key.to_owned(),
            },
            Utc::now(),
        )
    }

    fn key(n: &Notification) -> Option<&str> {
        match &n.payload {
            NotificationPayload::Message { key } => Some(key.as_str()),
            _ => None,
        }
    }

    #[test]
    fn oldest_is_dropped_when_full() {
        let mut queue = NotificationQueue::new(2);
        queue.extend([message("a"), message("b"), message("c")]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dropped(), 1);
        let keys: Vec<_> = queue.iter().filter_map(key).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn drain_empties_in_order() {
        let mut queue = NotificationQueue::new(5);
        queue.push(message("first"));
        queue.push(message("second"));
        let drained = queue.drain();
        assert!(queue.is_empty());
        let keys: Vec<_> = drained.iter().filter_map(key).collect();
        assert_eq!(keys, vec!["first", "second"]);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut queue = NotificationQueue::new(0);
        queue.push(message("x"));
        queue.push(message("y"));
        assert_eq!(queue.len(), 1);
    }
}
