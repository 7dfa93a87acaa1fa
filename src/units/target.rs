//! # Target units: passive synchronization points.
//!
//! A [`TargetUnit`] groups other units: it has no process of its own and no
//! captured output — it exists so other units can order themselves
//! `After=` it or be pulled in through its `Wants=`/`Requires=` lists.
//! Activation is trivially successful once the engine has brought its
//! dependencies up.
//!
//! Because targets produce no output they carry no log sink; reading their
//! log is the `Unreadable` path of the log contract.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::{LogError, StartError};
use crate::status::{ActivationState, ActivationStatus, EnableState, LoadState, UnitStatus};
use crate::units::definition::Definition;
use crate::units::sink::LogSink;
use crate::units::supervisable::{Supervisable, UnitRef};
use crate::units::unit::UnitCore;

/// A unit that is only a named rendezvous for ordering and grouping.
pub struct TargetUnit {
    core: UnitCore,
}

impl TargetUnit {
    pub fn new(name: impl Into<String>, definition: Definition) -> Self {
        Self {
            core: UnitCore::new(name, definition, "dead", None),
        }
    }

    /// Shorthand: a target behind a [`UnitRef`].
    pub fn arc(name: impl Into<String>, definition: Definition) -> UnitRef {
        Arc::new(Self::new(name, definition))
    }
}

#[async_trait]
impl Supervisable for TargetUnit {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn description(&self) -> String {
        self.core.definition().unit.description.clone()
    }

    fn enabled(&self) -> EnableState {
        self.core.load_status().enable
    }

    fn loaded(&self) -> LoadState {
        self.core.load_status().state
    }

    fn active(&self) -> ActivationState {
        self.core.active()
    }

    fn sub(&self) -> String {
        self.core.sub()
    }

    fn status(&self) -> UnitStatus {
        self.core.status()
    }

    fn path(&self) -> Option<PathBuf> {
        self.core.load_status().path
    }

    fn requires(&self) -> Vec<String> {
        self.core.definition().unit.requires.clone()
    }

    fn wants(&self) -> Vec<String> {
        self.core.definition().unit.wants.clone()
    }

    fn after(&self) -> Vec<String> {
        self.core.definition().unit.after.clone()
    }

    fn before(&self) -> Vec<String> {
        self.core.definition().unit.before.clone()
    }

    fn conflicts(&self) -> Vec<String> {
        self.core.definition().unit.conflicts.clone()
    }

    fn set_path(&self, path: PathBuf) {
        self.core.set_path(path);
    }

    fn set_loaded(&self, state: LoadState) {
        self.core.set_loaded(state);
    }

    fn set_enabled(&self, state: EnableState) {
        self.core.set_enabled(state);
    }

    fn set_vendor_preset(&self, state: EnableState) {
        self.core.set_vendor_preset(state);
    }

    fn set_output(&self, sink: LogSink) {
        self.core.set_output(sink);
    }

    fn log(&self, line: &str) {
        // No sink by default; lines only land once set_output attached one.
        self.core.log(line);
    }

    fn read_log(&self, max: usize) -> Result<Option<Vec<u8>>, LogError> {
        self.core.read_log(max)
    }

    fn claim_start(&self) -> bool {
        self.core.claim_start("start")
    }

    async fn start(&self) -> Result<(), StartError> {
        if self.core.active() != ActivationState::Active {
            if self.core.active() != ActivationState::Activating {
                self.core.claim_start("start");
            }
            self.core.set_active("active");
        }
        Ok(())
    }

    async fn stop(&self) {
        self.core.set_inactive("dead");
    }

    fn mark_failed(&self, reason: &str) {
        self.core.set_failed("failed");
        self.core.log(reason);
    }

    fn watch(&self) -> watch::Receiver<ActivationStatus> {
        self.core.watch()
    }
}
