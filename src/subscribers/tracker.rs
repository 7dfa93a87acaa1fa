//! # Stateful subscriber tracking in-flight activations.
//!
//! [`StateTracker`] maintains the set of units currently `Activating` by
//! listening to [`EventKind::UnitStarting`] and the terminal events. A
//! caller applying an external deadline to a start uses
//! [`StateTracker::snapshot`] to report which units were still on their
//! way up when the deadline expired.
//!
//! ```text
//!  Engine ── publish(Event) ──► Bus ──► StateTracker listener
//!
//!  UnitStarting          → insert(name)
//!  UnitActive/UnitFailed → remove(name)
//!  UnitStopped           → remove(name)
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::events::{Bus, Event, EventKind};

/// Tracks which units are currently activating.
///
/// Thread-safe and cloneable; clones share the same state.
#[derive(Clone, Default)]
pub struct StateTracker {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a background listener updating the tracker from `bus`.
    pub fn spawn_listener(&self, bus: &Bus) {
        let inner = self.inner.clone();
        let mut rx = bus.subscribe();

        tokio::spawn(async move {
            while let Ok(ev) = rx.recv().await {
                let name = match &ev.unit {
                    Some(n) => n.to_string(),
                    None => continue,
                };
                match ev.kind {
                    EventKind::UnitStarting => {
                        inner.lock().await.insert(name);
                    }
                    EventKind::UnitActive | EventKind::UnitFailed | EventKind::UnitStopped => {
                        inner.lock().await.remove(&name);
                    }
                    _ => {}
                }
            }
        });
    }

    /// Feeds one event directly, for callers doing their own listening.
    pub async fn observe(&self, ev: &Event) {
        let name = match &ev.unit {
            Some(n) => n.to_string(),
            None => return,
        };
        match ev.kind {
            EventKind::UnitStarting => {
                self.inner.lock().await.insert(name);
            }
            EventKind::UnitActive | EventKind::UnitFailed | EventKind::UnitStopped => {
                self.inner.lock().await.remove(&name);
            }
            _ => {}
        }
    }

    /// Returns a sorted snapshot of units still activating.
    pub async fn snapshot(&self) -> Vec<String> {
        let g = self.inner.lock().await;
        let mut names: Vec<String> = g.iter().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracks_starting_until_terminal() {
        let tracker = StateTracker::new();

        tracker
            .observe(&Event::new(EventKind::UnitStarting).with_unit("db.service"))
            .await;
        tracker
            .observe(&Event::new(EventKind::UnitStarting).with_unit("web.service"))
            .await;
        assert_eq!(tracker.snapshot().await, vec!["db.service", "web.service"]);

        tracker
            .observe(&Event::new(EventKind::UnitActive).with_unit("db.service"))
            .await;
        tracker
            .observe(&Event::new(EventKind::UnitFailed).with_unit("web.service"))
            .await;
        assert!(tracker.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_listener_follows_bus() {
        let bus = Bus::new(16);
        let tracker = StateTracker::new();
        tracker.spawn_listener(&bus);

        bus.publish(Event::new(EventKind::UnitStarting).with_unit("slow.service"));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(tracker.snapshot().await, vec!["slow.service"]);
    }
}
