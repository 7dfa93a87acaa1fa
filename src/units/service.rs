//! # Service units: the kind that runs something.
//!
//! [`ServiceUnit`] is the workhorse unit kind. Its own activation step is a
//! pluggable async exec hook — the seam where a process-supervision
//! collaborator plugs in. Without a hook, activation succeeds immediately,
//! which is exactly what tests and passive placeholder services want.
//!
//! Sub-states: `dead` → `start` → `running`, or `failed`.
//!
//! ## Example
//! ```rust
//! use unitvisor::{Definition, ServiceUnit, UnitRef};
//!
//! let web: UnitRef = ServiceUnit::arc(
//!     "web.service",
//!     Definition::default().with_requires(["db.service"]),
//! );
//! assert_eq!(web.requires(), vec!["db.service".to_string()]);
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::watch;

use crate::error::{LogError, StartError};
use crate::status::{ActivationState, ActivationStatus, EnableState, LoadState, UnitStatus};
use crate::units::definition::Definition;
use crate::units::sink::LogSink;
use crate::units::supervisable::{Supervisable, UnitRef};
use crate::units::unit::UnitCore;

/// Async activation hook: what "starting this service" actually does.
///
/// Failures are reported as plain text; the unit turns them into
/// [`StartError::ExecFailed`].
pub type ExecFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

/// A unit that activates by running its exec hook.
pub struct ServiceUnit {
    core: UnitCore,
    exec: Option<ExecFn>,
    /// Serializes hook runs so racing `start` calls never run it twice.
    run_lock: tokio::sync::Mutex<()>,
}

impl ServiceUnit {
    /// Creates a service without an exec hook; activation succeeds
    /// immediately once dependencies are up.
    pub fn new(name: impl Into<String>, definition: Definition) -> Self {
        Self {
            core: UnitCore::new(name, definition, "dead", Some(LogSink::default())),
            exec: None,
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Creates a service whose activation runs `exec`.
    pub fn with_exec<F, Fut>(name: impl Into<String>, definition: Definition, exec: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        let hook = move || -> BoxFuture<'static, Result<(), String>> { Box::pin(exec()) };
        Self {
            core: UnitCore::new(name, definition, "dead", Some(LogSink::default())),
            exec: Some(Arc::new(hook)),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Shorthand: a hook-less service behind a [`UnitRef`].
    pub fn arc(name: impl Into<String>, definition: Definition) -> UnitRef {
        Arc::new(Self::new(name, definition))
    }

    /// Shorthand: a service with an exec hook behind a [`UnitRef`].
    pub fn arc_with_exec<F, Fut>(name: impl Into<String>, definition: Definition, exec: F) -> UnitRef
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), String>> + Send + 'static,
    {
        Arc::new(Self::with_exec(name, definition, exec))
    }

    /// Stops the service, then runs a fresh unit-local start attempt.
    ///
    /// Dependencies are assumed to still be up from the original start; a
    /// caller wanting full relationship handling goes through
    /// [`Engine::start`](crate::Engine::start) again instead.
    pub async fn restart(&self) -> Result<(), StartError> {
        self.stop().await;
        self.start().await
    }
}

#[async_trait]
impl Supervisable for ServiceUnit {
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
        self.core.log(line);
    }

    fn read_log(&self, max: usize) -> Result<Option<Vec<u8>>, LogError> {
        self.core.read_log(max)
    }

    fn claim_start(&self) -> bool {
        self.core.claim_start("start")
    }

    async fn start(&self) -> Result<(), StartError> {
        let _run = self.run_lock.lock().await;
        match self.core.active() {
            // A racing call finished the job while we waited for the lock.
            ActivationState::Active => return Ok(()),
            // Claim already held: the engine claimed on our behalf.
            ActivationState::Activating => {}
            _ => {
                if !self.core.claim_start("start") {
                    if self.core.active() == ActivationState::Active {
                        return Ok(());
                    }
                }
            }
        }

        let result = match &self.exec {
            Some(exec) => exec().await,
            None => Ok(()),
        };

        match result {
            Ok(()) => {
                self.core.set_active("running");
                self.core.log("started");
                Ok(())
            }
            Err(reason) => {
                self.core.set_failed("failed");
                self.core.log(&format!("start failed: {reason}"));
                Err(StartError::ExecFailed {
                    unit: self.core.name().to_string(),
                    reason,
                })
            }
        }
    }

    async fn stop(&self) {
        self.core.set_inactive("dead");
        self.core.log("stopped");
    }

    fn mark_failed(&self, reason: &str) {
        self.core.set_failed("failed");
        self.core.log(reason);
    }

    fn watch(&self) -> watch::Receiver<ActivationStatus> {
        self.core.watch()
    }
}
