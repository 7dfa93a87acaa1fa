//! # Event subscribers.
//!
//! Provides the [`Subscriber`] trait and built-in implementations for
//! observing the activation event stream.
//!
//! ```text
//! Engine ── publish(Event) ──► Bus ──► broadcast to all subscribers
//!                                         │
//!                                         ├──► StateTracker (in-flight set)
//!                                         └──► LogWriter (feature "logging")
//! ```
//!
//! - **Passive subscribers** observe and react (logging, metrics, alerts).
//! - **Stateful subscribers** maintain state from events ([`StateTracker`]).

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod tracker;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::{spawn_subscriber, Subscriber};
pub use tracker::StateTracker;
