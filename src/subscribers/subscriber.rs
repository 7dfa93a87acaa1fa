//! # Event subscriber trait.
//!
//! [`Subscriber`] is the extension point for plugging custom handlers into
//! the event stream: logging, metrics, alerting, status dashboards.
//!
//! Implementations subscribe to the [`Bus`](crate::events::Bus) and run in
//! their own task; a slow subscriber lags its own receiver and never slows
//! the engine down.
//!
//! ## Implementing custom subscribers
//! ```rust
//! use async_trait::async_trait;
//! use unitvisor::{Event, EventKind, Subscriber};
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscriber for FailureCounter {
//!     async fn handle(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::UnitFailed) {
//!             // increment a counter, page someone, ...
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::{Bus, Event};

/// Observes activation events.
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's own listener task; use async I/O and
    /// handle errors internally.
    async fn handle(&self, event: &Event);

    /// Name used in diagnostics. Prefer short descriptive names.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Spawns a listener task feeding `subscriber` from `bus`.
///
/// The task exits when the bus is dropped. Lagged receivers skip the
/// oldest events and keep going.
pub fn spawn_subscriber(bus: &Bus, subscriber: std::sync::Arc<dyn Subscriber>) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subscriber.handle(&ev).await,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::debug!(subscriber = subscriber.name(), skipped = n, "subscriber lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}
