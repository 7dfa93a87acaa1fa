//! # Event bus for broadcasting activation events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]: the engine
//! publishes from wherever it is in the algorithm without blocking, and any
//! number of subscribers observe the stream independently.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks or fails.
//! - **Bounded capacity**: one ring buffer holds the most recent events.
//! - **Lag handling**: a slow receiver gets `RecvError::Lagged(n)` and
//!   skips the `n` oldest items.
//! - **No persistence**: with no active receivers an event is dropped.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for activation events.
///
/// Cheap to clone; clones publish into the same channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a bus with the given ring-buffer capacity (clamped ≥ 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active subscribers; never blocks.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates an independent receiver observing subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_subscribers_see_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::UnitStarting).with_unit("db.service"));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::UnitStarting);
        assert_eq!(ev.unit.as_deref(), Some("db.service"));
    }

    #[test]
    fn test_publish_without_receivers_is_fine() {
        let bus = Bus::new(1);
        bus.publish(Event::new(EventKind::UnitActive));
    }
}
