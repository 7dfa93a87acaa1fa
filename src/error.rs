//! Error types used by the activation engine and units.
//!
//! This module defines three error enums:
//!
//! - [`StartError`] — failures raised while bringing a unit up.
//! - [`DefinitionError`] — invalid relationship declarations, detected at
//!   load time, never during activation.
//! - [`LogError`] — failures of the per-unit log side channel.
//!
//! [`StartError`] carries the name of the unit being started and, for
//! relationship failures, the name of the offending peer, so a caller can
//! report exactly which edge of the dependency graph went wrong.
//! `as_label` returns short stable snake_case labels for logs/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while starting a unit.
///
/// `Requires`-path failures are fatal and propagate to the caller with the
/// causing unit's name attached; `Wants`-path failures are logged to the
/// unit's sink and swallowed, so they never appear here.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StartError {
    /// A unit listed in `Conflicts=` is currently active.
    #[error("{unit} conflicts with active unit {conflict}")]
    ConflictActive {
        /// The unit whose start was refused.
        unit: String,
        /// The active conflicting unit.
        conflict: String,
    },

    /// A relationship names a unit the resolver does not know.
    #[error("{name}, required by {unit}, not found")]
    DependencyNotFound {
        /// The unit whose start failed.
        unit: String,
        /// The unresolvable name.
        name: String,
    },

    /// A unit listed in `Before=` is already active, so the ordering this
    /// unit was promised can no longer hold.
    #[error("{before} already started, violating Before= of {unit}")]
    OrderingViolation {
        unit: String,
        /// The `Before=` target that started too early.
        before: String,
    },

    /// A required dependency ended up `Failed`.
    #[error("required dependency {name} of {unit} failed: {reason}")]
    DependencyFailed {
        unit: String,
        /// The dependency that failed.
        name: String,
        /// The dependency's own failure, flattened to text.
        reason: String,
    },

    /// The `requires`/`after` graph reachable from the unit contains a
    /// cycle; starting it would wait forever.
    #[error("dependency cycle: {}", path.join(" -> "))]
    CycleDetected {
        /// The cycle, starting and ending at the same unit.
        path: Vec<String>,
    },

    /// The unit's definition never loaded; it must not be started.
    #[error("{unit} is not loaded")]
    NotLoaded { unit: String },

    /// A dependency wait exceeded the configured start timeout.
    #[error("start of {unit} timed out after {timeout:?}")]
    Timeout { unit: String, timeout: Duration },

    /// The engine was shut down while this start was waiting.
    #[error("start of {unit} canceled")]
    Canceled { unit: String },

    /// The unit's own activation hook failed after all dependencies were up.
    #[error("activation of {unit} failed: {reason}")]
    ExecFailed { unit: String, reason: String },
}

impl StartError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::ConflictActive { .. } => "start_conflict_active",
            StartError::DependencyNotFound { .. } => "start_dependency_not_found",
            StartError::OrderingViolation { .. } => "start_ordering_violation",
            StartError::DependencyFailed { .. } => "start_dependency_failed",
            StartError::CycleDetected { .. } => "start_cycle_detected",
            StartError::NotLoaded { .. } => "start_not_loaded",
            StartError::Timeout { .. } => "start_timeout",
            StartError::Canceled { .. } => "start_canceled",
            StartError::ExecFailed { .. } => "start_exec_failed",
        }
    }

    /// The name of the unit whose start produced this error, when known.
    pub fn unit(&self) -> Option<&str> {
        match self {
            StartError::ConflictActive { unit, .. }
            | StartError::DependencyNotFound { unit, .. }
            | StartError::OrderingViolation { unit, .. }
            | StartError::DependencyFailed { unit, .. }
            | StartError::NotLoaded { unit }
            | StartError::Timeout { unit, .. }
            | StartError::Canceled { unit }
            | StartError::ExecFailed { unit, .. } => Some(unit),
            StartError::CycleDetected { .. } => None,
        }
    }

    /// True when the failure was caused by a relationship rather than the
    /// unit's own activation.
    pub fn is_dependency_error(&self) -> bool {
        matches!(
            self,
            StartError::DependencyNotFound { .. }
                | StartError::DependencyFailed { .. }
                | StartError::CycleDetected { .. }
        )
    }
}

/// # Invalid relationship declarations.
///
/// Raised by [`Definition::validate`](crate::units::Definition::validate);
/// a definition error means the unit file is wrong, not that activation
/// went wrong at runtime.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DefinitionError {
    /// The same name appears on both the requirement side
    /// (`Requires`/`Wants`/`After`) and in `Conflicts=`.
    #[error("{unit} both depends on and conflicts with {name}")]
    Overlap { unit: String, name: String },

    /// A relationship list names the unit itself.
    #[error("{unit} lists itself in {list}")]
    SelfReference { unit: String, list: &'static str },
}

impl DefinitionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DefinitionError::Overlap { .. } => "definition_overlap",
            DefinitionError::SelfReference { .. } => "definition_self_reference",
        }
    }
}

/// # Errors of the per-unit log side channel.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LogError {
    /// The unit has no readable log sink attached.
    #[error("unreadable")]
    Unreadable,
}
