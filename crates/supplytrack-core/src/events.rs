//! Subscribable notification events
//!
//! Other components (a badge counter, an activity log) observe store changes
//! through the bus without coupling to the store itself.

use crate::notification::NotificationRecord;
use tokio::sync::broadcast;

/// Store change, carrying the affected record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A new record was appended
    Added(NotificationRecord),
    /// A record changed status
    StatusChanged(NotificationRecord),
    /// The store was emptied by user action
    Cleared,
}

/// Broadcast bus for [`NotificationEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<NotificationEvent>,
}

impl EventBus {
    /// Create a bus that buffers up to `capacity` events per slow subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers reached.
    pub fn publish(&self, event: NotificationEvent) -> usize {
        // No subscribers is not an error for a fire-and-forget bus
        self.sender.send(event).unwrap_or(0)
    }

    /// Current subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{NotificationId, NotificationKind};

    #[test]
    fn publish_without_subscribers_is_harmless() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(NotificationEvent::Cleared), 0);
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();
        let record = NotificationRecord::new(NotificationId::new("n1"), NotificationKind::Restock, "low");

        bus.publish(NotificationEvent::Added(record.clone()));
        bus.publish(NotificationEvent::Cleared);

        assert_eq!(rx.try_recv().unwrap(), NotificationEvent::Added(record));
        assert_eq!(rx.try_recv().unwrap(), NotificationEvent::Cleared);
        assert!(rx.try_recv().is_err());
    }
}
