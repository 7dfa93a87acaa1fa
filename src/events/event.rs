//! # Activation lifecycle events.
//!
//! [`EventKind`] classifies what the engine observed while starting units;
//! [`Event`] carries the metadata: which unit, which peer (for
//! relationship failures), a human-readable reason, a wall-clock timestamp
//! and a global sequence number.
//!
//! ## Ordering guarantees
//! Each event has a globally unique `seq` that increases monotonically.
//! Use `seq` to restore the exact order when events are observed out of
//! order across subscribers.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of activation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A start claim succeeded; the unit is now `Activating`.
    ///
    /// Sets: `unit`, `at`, `seq`.
    UnitStarting,

    /// A unit reached `Active`.
    ///
    /// Sets: `unit`, `at`, `seq`.
    UnitActive,

    /// A unit was deactivated.
    ///
    /// Sets: `unit`, `at`, `seq`.
    UnitStopped,

    /// A start attempt settled in `Failed`.
    ///
    /// Sets: `unit`, `reason`, `at`, `seq`.
    UnitFailed,

    /// A `Requires=` dependency failed or could not be resolved; fatal for
    /// the dependent.
    ///
    /// Sets: `unit`, `dependency`, `reason`, `at`, `seq`.
    DependencyFailed,

    /// A `Wants=` dependency failed; logged and swallowed.
    ///
    /// Sets: `unit`, `dependency`, `reason`, `at`, `seq`.
    WantFailed,

    /// A start was refused because a `Conflicts=` peer is active.
    ///
    /// Sets: `unit`, `dependency` (the active peer), `at`, `seq`.
    ConflictDetected,

    /// The `requires`/`after` graph contains a cycle; the start was
    /// rejected before waiting.
    ///
    /// Sets: `unit`, `reason` (the cycle path), `at`, `seq`.
    CycleDetected,

    /// A dependency wait exceeded the configured start timeout.
    ///
    /// Sets: `unit`, `dependency`, `at`, `seq`.
    StartTimeout,
}

/// Activation event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - the optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// The unit being started/stopped, if applicable.
    pub unit: Option<Arc<str>>,
    /// The peer unit involved (failed dependency, conflicting unit).
    pub dependency: Option<Arc<str>>,
    /// Human-readable reason (error text, cycle path).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp
    /// and the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            unit: None,
            dependency: None,
            reason: None,
        }
    }

    /// Attaches the unit name.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches the peer unit name.
    #[inline]
    pub fn with_dependency(mut self, dependency: impl Into<Arc<str>>) -> Self {
        self.dependency = Some(dependency.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::UnitStarting);
        let b = Event::new(EventKind::UnitActive);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::new(EventKind::DependencyFailed)
            .with_unit("web.service")
            .with_dependency("db.service")
            .with_reason("exec failed");
        assert_eq!(ev.unit.as_deref(), Some("web.service"));
        assert_eq!(ev.dependency.as_deref(), Some("db.service"));
        assert_eq!(ev.reason.as_deref(), Some("exec failed"));
    }
}
