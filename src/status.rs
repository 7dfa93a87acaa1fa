//! # Unit status model.
//!
//! Pure value types describing the three independent axes of a unit's
//! runtime condition:
//!
//! - [`LoadState`] — whether the unit's definition was loaded successfully;
//! - [`EnableState`] — whether the unit is configured to auto-start;
//! - [`ActivationState`] — the lifecycle of the current activation attempt.
//!
//! [`UnitStatus`] composes [`LoadStatus`] and [`ActivationStatus`] into the
//! full report a status consumer sees. Every type has a canonical `Display`
//! rendering; the templates are stable output for reporting and are never
//! parsed back.
//!
//! ```text
//! Loaded: loaded (/etc/units/web.service; enabled; vendor preset: disabled)
//! Active: active (running)
//! ```
//!
//! No operation in this module can fail.

use std::fmt;
use std::path::PathBuf;

/// Lifecycle of a unit's activation attempt.
///
/// `Activating` is transient: every attempt resolves to `Active` or
/// `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationState {
    /// Not started, or stopped after a successful run.
    #[default]
    Inactive,
    /// A start attempt is in flight.
    Activating,
    /// The unit is up.
    Active,
    /// The last start attempt failed.
    Failed,
}

impl ActivationState {
    /// `Active` or `Failed` — the states an attempt settles into.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActivationState::Active | ActivationState::Failed)
    }

    /// `Active` or `Activating` — already up or on its way.
    pub fn is_active_or_activating(&self) -> bool {
        matches!(self, ActivationState::Active | ActivationState::Activating)
    }
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationState::Inactive => write!(f, "inactive"),
            ActivationState::Activating => write!(f, "activating"),
            ActivationState::Active => write!(f, "active"),
            ActivationState::Failed => write!(f, "failed"),
        }
    }
}

/// Whether a unit's definition was successfully loaded.
///
/// A unit in `Error` state is never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Definition parsed and loaded.
    #[default]
    Loaded,
    /// Definition could not be loaded.
    Error,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loaded => write!(f, "loaded"),
            LoadState::Error => write!(f, "error"),
        }
    }
}

/// Whether a unit is configured to start automatically.
///
/// Independent of activation: a disabled unit may still be started as a
/// dependency of something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnableState {
    /// Not enabled for auto-start.
    #[default]
    Disabled,
    /// No install section; cannot be enabled or disabled.
    Static,
    /// Enabled through another unit's install section.
    Indirect,
    /// Enabled for auto-start.
    Enabled,
}

impl fmt::Display for EnableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnableState::Disabled => write!(f, "disabled"),
            EnableState::Static => write!(f, "static"),
            EnableState::Indirect => write!(f, "indirect"),
            EnableState::Enabled => write!(f, "enabled"),
        }
    }
}

/// The distribution's default enablement for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VendorPreset {
    pub enable: EnableState,
}

impl fmt::Display for VendorPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vendor preset: {}", self.enable)
    }
}

/// Load-time status: load outcome, source path, enablement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadStatus {
    pub state: LoadState,
    /// Where the definition came from, once known.
    pub path: Option<PathBuf>,
    pub enable: EnableState,
    pub vendor: VendorPreset,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.as_deref().unwrap_or_else(|| "".as_ref());
        write!(
            f,
            "{} ({}; {}; {})",
            self.state,
            path.display(),
            self.enable,
            self.vendor
        )
    }
}

/// Activation status: lifecycle state plus kind-specific sub-state text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivationStatus {
    pub state: ActivationState,
    /// Free-text detail, e.g. `running` for a service, `dead` when idle.
    pub sub: String,
}

impl ActivationStatus {
    pub fn new(state: ActivationState, sub: impl Into<String>) -> Self {
        Self {
            state,
            sub: sub.into(),
        }
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.state, self.sub)
    }
}

/// Complete status report for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitStatus {
    pub load: LoadStatus,
    pub activation: ActivationStatus,
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loaded: {}\nActive: {}", self.load, self.activation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_state_rendering() {
        assert_eq!(ActivationState::Inactive.to_string(), "inactive");
        assert_eq!(ActivationState::Activating.to_string(), "activating");
        assert_eq!(ActivationState::Active.to_string(), "active");
        assert_eq!(ActivationState::Failed.to_string(), "failed");
    }

    #[test]
    fn test_terminal_states() {
        assert!(ActivationState::Active.is_terminal());
        assert!(ActivationState::Failed.is_terminal());
        assert!(!ActivationState::Activating.is_terminal());
        assert!(!ActivationState::Inactive.is_terminal());
    }

    #[test]
    fn test_activation_status_template() {
        let st = ActivationStatus::new(ActivationState::Active, "running");
        assert_eq!(st.to_string(), "active (running)");
    }

    #[test]
    fn test_load_status_template() {
        let st = LoadStatus {
            state: LoadState::Loaded,
            path: Some(PathBuf::from("/etc/units/web.service")),
            enable: EnableState::Enabled,
            vendor: VendorPreset {
                enable: EnableState::Disabled,
            },
        };
        assert_eq!(
            st.to_string(),
            "loaded (/etc/units/web.service; enabled; vendor preset: disabled)"
        );
    }

    #[test]
    fn test_load_status_without_path() {
        let st = LoadStatus::default();
        assert_eq!(st.to_string(), "loaded (; disabled; vendor preset: disabled)");
    }

    #[test]
    fn test_unit_status_two_line_template() {
        let st = UnitStatus {
            load: LoadStatus::default(),
            activation: ActivationStatus::new(ActivationState::Inactive, "dead"),
        };
        let rendered = st.to_string();
        let mut lines = rendered.lines();
        assert!(lines.next().unwrap().starts_with("Loaded: loaded"));
        assert_eq!(lines.next().unwrap(), "Active: inactive (dead)");
        assert!(lines.next().is_none());
    }
}
