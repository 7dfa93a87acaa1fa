//! # Shared unit aggregate.
//!
//! [`UnitCore`] carries everything common to all unit kinds: identity, the
//! immutable [`Definition`], load status, the watch-backed activation
//! status, and the optional log sink. Concrete kinds
//! ([`ServiceUnit`](crate::units::ServiceUnit),
//! [`TargetUnit`](crate::units::TargetUnit)) embed a core and delegate the
//! [`Supervisable`](crate::units::Supervisable) plumbing to it.
//!
//! ## State model
//! ```text
//!             claim_start()                  set_active(sub)
//!  Inactive ───────────────► Activating ───────────────────► Active
//!  Failed   ───────────────►     │                             │
//!     ▲                          │ set_failed(sub)             │ set_inactive(sub)
//!     └──────────────────────────┘                             ▼
//!                                                           Inactive
//! ```
//!
//! Activation status lives in a `tokio::sync::watch` channel: the one
//! primitive gives synchronized reads for every concurrent dependent *and*
//! prompt wakeups for waiters, so nobody polls on a timer.

use std::path::PathBuf;
use std::sync::RwLock;

use tokio::sync::watch;

use crate::error::LogError;
use crate::status::{
    ActivationState, ActivationStatus, EnableState, LoadState, LoadStatus, UnitStatus, VendorPreset,
};
use crate::units::definition::Definition;
use crate::units::sink::LogSink;

/// Identity, definition and runtime status shared by every unit kind.
///
/// Constructed with `Inactive`/`Loaded` defaults; the loading collaborator
/// then sets path, load outcome and enablement. The definition is fixed at
/// construction — population happens before the unit is shared, never
/// after.
pub struct UnitCore {
    name: String,
    definition: Definition,
    load: RwLock<LoadStatus>,
    act: watch::Sender<ActivationStatus>,
    sink: RwLock<Option<LogSink>>,
}

impl UnitCore {
    /// Creates a core in `Inactive` state with the given idle sub-state
    /// text and an optional log sink.
    pub fn new(
        name: impl Into<String>,
        definition: Definition,
        idle_sub: &str,
        sink: Option<LogSink>,
    ) -> Self {
        let (act, _) = watch::channel(ActivationStatus::new(ActivationState::Inactive, idle_sub));
        Self {
            name: name.into(),
            definition,
            load: RwLock::new(LoadStatus::default()),
            act,
            sink: RwLock::new(sink),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    // --- load status ---

    pub fn load_status(&self) -> LoadStatus {
        self.load.read().expect("load status poisoned").clone()
    }

    pub fn set_path(&self, path: PathBuf) {
        self.load.write().expect("load status poisoned").path = Some(path);
    }

    pub fn set_loaded(&self, state: LoadState) {
        self.load.write().expect("load status poisoned").state = state;
    }

    pub fn set_enabled(&self, state: EnableState) {
        self.load.write().expect("load status poisoned").enable = state;
    }

    pub fn set_vendor_preset(&self, state: EnableState) {
        self.load.write().expect("load status poisoned").vendor = VendorPreset { enable: state };
    }

    // --- activation status ---

    pub fn activation_status(&self) -> ActivationStatus {
        self.act.borrow().clone()
    }

    pub fn active(&self) -> ActivationState {
        self.act.borrow().state
    }

    pub fn sub(&self) -> String {
        self.act.borrow().sub.clone()
    }

    pub fn status(&self) -> UnitStatus {
        UnitStatus {
            load: self.load_status(),
            activation: self.activation_status(),
        }
    }

    pub fn watch(&self) -> watch::Receiver<ActivationStatus> {
        self.act.subscribe()
    }

    /// Atomically claims a start: Inactive/Failed → Activating.
    ///
    /// Returns `false` when already Active or Activating, so exactly one of
    /// any number of concurrent dependents wins the claim.
    pub fn claim_start(&self, sub: &str) -> bool {
        self.act.send_if_modified(|st| match st.state {
            ActivationState::Inactive | ActivationState::Failed => {
                st.state = ActivationState::Activating;
                st.sub = sub.to_string();
                true
            }
            ActivationState::Activating | ActivationState::Active => false,
        })
    }

    pub fn set_active(&self, sub: &str) {
        self.set_state(ActivationState::Active, sub);
    }

    pub fn set_failed(&self, sub: &str) {
        self.set_state(ActivationState::Failed, sub);
    }

    pub fn set_inactive(&self, sub: &str) {
        self.set_state(ActivationState::Inactive, sub);
    }

    fn set_state(&self, state: ActivationState, sub: &str) {
        self.act.send_modify(|st| {
            st.state = state;
            st.sub = sub.to_string();
        });
    }

    // --- log side channel ---

    pub fn set_output(&self, sink: LogSink) {
        *self.sink.write().expect("sink slot poisoned") = Some(sink);
    }

    pub fn log(&self, line: &str) {
        if let Some(sink) = self.sink.read().expect("sink slot poisoned").as_ref() {
            sink.write_line(line);
        }
    }

    pub fn read_log(&self, max: usize) -> Result<Option<Vec<u8>>, LogError> {
        match self.sink.read().expect("sink slot poisoned").as_ref() {
            Some(sink) => Ok(sink.drain(max)),
            None => Err(LogError::Unreadable),
        }
    }
}
