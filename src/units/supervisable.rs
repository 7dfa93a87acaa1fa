//! # The orchestration capability every unit kind implements.
//!
//! [`Supervisable`] is the sole coupling between the activation engine and
//! concrete unit types: the engine never touches a unit's internals, only
//! this interface. That keeps heterogeneous kinds (service, target, …)
//! uniform from the engine's point of view and lets tests substitute fakes.
//!
//! The common handle type is [`UnitRef`], an `Arc<dyn Supervisable>`
//! suitable for sharing across the runtime. Handles never own a unit's
//! lifetime — the registry does.
//!
//! ## Division of labor
//! - The trait's [`start`](Supervisable::start) performs only this unit's
//!   *own* activation attempt (the process-start hook seam).
//! - Relationship handling — conflicts, ordering, `Requires`/`Wants`
//!   fan-out — lives in [`Engine::start`](crate::Engine::start), which
//!   drives these methods.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{LogError, StartError};
use crate::status::{ActivationState, ActivationStatus, EnableState, LoadState, UnitStatus};
use crate::units::sink::LogSink;

/// Shared handle to any supervisable unit.
pub type UnitRef = Arc<dyn Supervisable>;

/// # An independently activatable, supervisable unit.
///
/// Exposes read accessors for status reporting, load-time mutators used by
/// the definition-loading collaborator, the log side channel, and the
/// activation primitives the engine drives.
///
/// All state returned is live: concurrent readers (every dependent's wait)
/// observe writes made on behalf of the unit's own start.
#[async_trait]
pub trait Supervisable: Send + Sync + 'static {
    /// Stable unit name, unique within one registry.
    fn name(&self) -> &str;

    /// Human-readable description from the definition.
    fn description(&self) -> String;

    fn enabled(&self) -> EnableState;

    fn loaded(&self) -> LoadState;

    fn active(&self) -> ActivationState;

    /// Kind-specific sub-state text, e.g. `running` for a service.
    fn sub(&self) -> String;

    /// Complete status report.
    fn status(&self) -> UnitStatus;

    /// Where the definition was loaded from, once known.
    fn path(&self) -> Option<PathBuf>;

    // Relationship name lists, in declaration order.

    fn requires(&self) -> Vec<String>;
    fn wants(&self) -> Vec<String>;
    fn after(&self) -> Vec<String>;
    fn before(&self) -> Vec<String>;
    fn conflicts(&self) -> Vec<String>;

    // Load-time mutators, called once by the loading collaborator.

    fn set_path(&self, path: PathBuf);
    fn set_loaded(&self, state: LoadState);
    fn set_enabled(&self, state: EnableState);
    fn set_vendor_preset(&self, state: EnableState);

    // Log side channel.

    /// Attaches (or replaces) the log sink.
    fn set_output(&self, sink: LogSink);

    /// Appends a timestamped line to the sink, if one is attached.
    fn log(&self, line: &str);

    /// Drains up to `max` bytes of captured output.
    ///
    /// `Ok(None)` means no data available; `Err(Unreadable)` means the
    /// unit has no sink attached at all.
    fn read_log(&self, max: usize) -> Result<Option<Vec<u8>>, LogError>;

    // Activation primitives, driven by the engine.

    /// Atomically claims a start: Inactive/Failed → Activating.
    ///
    /// Returns `false` when the unit is already `Active` or another
    /// dependent holds the claim. Safe to call from multiple dependents.
    fn claim_start(&self) -> bool;

    /// Performs this unit's own activation attempt and settles the state
    /// to `Active` or `Failed`.
    ///
    /// Dependency resolution is the engine's job; implementations only run
    /// their kind-specific hook. Calling `start` on an already active unit
    /// is a no-op returning `Ok`.
    async fn start(&self) -> Result<(), StartError>;

    /// Deactivates the unit: Active → Inactive.
    async fn stop(&self);

    /// Forces the unit into `Failed` with the given sub-state text.
    ///
    /// Used by the engine when a relationship step fails before the unit's
    /// own hook ever runs.
    fn mark_failed(&self, reason: &str);

    /// A receiver observing every activation-status change.
    ///
    /// Dependents wait on this instead of polling; the current value is
    /// visible immediately.
    fn watch(&self) -> watch::Receiver<ActivationStatus>;
}
