//! # The activation engine.
//!
//! [`Engine::start`] brings one unit and its transitive dependencies to
//! `Active`, respecting the declared relationships, and reports failure
//! without leaving the system inconsistent.
//!
//! ## Start algorithm
//! ```text
//! start(unit)
//!   ├─► load gate: LoadState::Error units are never started
//!   ├─► cycle check over requires ∪ after (reject before anything waits)
//!   ├─► idempotent re-entry: Active → Ok; Activating → await that attempt
//!   ├─► claim: Inactive/Failed → Activating (exactly one caller wins)
//!   │
//!   ├─► 1. Conflicts=  any peer Active?            → ConflictActive
//!   ├─► 2. After=      resolve + await each peer   → NotFound / DependencyFailed
//!   ├─► 3. Before=     peer already Active?        → OrderingViolation
//!   ├─► 4. Requires=/Wants=
//!   │        one task per entry ──► outcome channel ──► single aggregation
//!   │        requires error: fatal (first wins)    → DependencyFailed
//!   │        wants error:    log + publish, swallow
//!   ├─► 5. readiness: await every Requires= peer   → DependencyFailed / Timeout
//!   └─► 6. unit.start() — the unit's own hook      → Active / ExecFailed
//! ```
//!
//! ## Rules
//! - The root call is synchronous to its caller; dependency starts fan out
//!   as tasks, bounded per call by `max_concurrent_starts`.
//! - The conflict check strictly precedes the `After=` wait, which
//!   strictly precedes `Requires=`/`Wants=` triggering. Sibling dependency
//!   starts have no ordering among themselves.
//! - A fatal step marks the unit `Failed` and stops further work for this
//!   unit; already-spawned dependency starts are **not** cancelled and run
//!   to completion independently.
//! - Waiters never poll: they sit on each unit's watch channel and are
//!   unblocked by state changes, the configured timeout, or
//!   [`Engine::shutdown`].
//! - A `Failed` unit is never retried implicitly; a fresh `start` call is
//!   the retry.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, Semaphore};
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::engine::graph;
use crate::engine::resolver::Resolver;
use crate::error::{LogError, StartError};
use crate::events::{Bus, Event, EventKind};
use crate::status::{ActivationState, LoadState};
use crate::units::{LogSink, Supervisable, UnitRef};

/// Which relationship an outcome belongs to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Relation {
    Requires,
    Wants,
}

/// Done-signal from one dependency task, funnelled into the aggregation
/// channel.
struct DepOutcome {
    relation: Relation,
    name: String,
    result: Result<(), StartError>,
}

/// Drives units to `Active` in dependency order.
///
/// Holds the injected [`Resolver`], the event [`Bus`] and a cancellation
/// token that [`Engine::shutdown`] uses to unblock every in-flight wait.
pub struct Engine {
    cfg: Config,
    resolver: Arc<dyn Resolver>,
    bus: Bus,
    cancel: CancellationToken,
}

impl Engine {
    /// Creates an engine over the given resolver.
    pub fn new(cfg: Config, resolver: Arc<dyn Resolver>) -> Arc<Self> {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Arc::new(Self {
            cfg,
            resolver,
            bus,
            cancel: CancellationToken::new(),
        })
    }

    /// The engine's event bus, for wiring subscribers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Unblocks every in-flight wait; affected starts fail `Canceled`.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Deactivates a unit (unit-local; deactivation ordering is out of
    /// scope) and publishes `UnitStopped`.
    pub async fn stop(&self, unit: &UnitRef) {
        unit.stop().await;
        self.bus
            .publish(Event::new(EventKind::UnitStopped).with_unit(unit.name()));
    }

    /// Replaces a unit's log sink with one sized per this engine's config.
    pub fn attach_output(&self, unit: &UnitRef) {
        unit.set_output(LogSink::bounded(self.cfg.log_capacity));
    }

    /// Drains one bounded chunk of a unit's captured output.
    ///
    /// `Ok(None)` means no data; `Err(Unreadable)` means the unit has no
    /// sink attached.
    pub fn read_log(&self, unit: &UnitRef) -> Result<Option<Vec<u8>>, LogError> {
        unit.read_log(self.cfg.log_chunk_clamped())
    }

    /// Brings `unit` and its transitive dependencies to `Active`.
    ///
    /// Safe to call from multiple dependents concurrently: one caller
    /// claims the attempt, the rest await its outcome. Calling `start` on
    /// an already active unit is a no-op.
    pub async fn start(self: &Arc<Self>, unit: &UnitRef) -> Result<(), StartError> {
        let name = unit.name().to_string();

        if unit.loaded() == LoadState::Error {
            return Err(StartError::NotLoaded { unit: name });
        }
        if unit.active() == ActivationState::Active {
            return Ok(());
        }

        if let Some(path) = graph::find_cycle(unit, self.resolver.as_ref()) {
            self.bus.publish(
                Event::new(EventKind::CycleDetected)
                    .with_unit(name.as_str())
                    .with_reason(path.join(" -> ")),
            );
            return Err(StartError::CycleDetected { path });
        }

        if unit.active() == ActivationState::Activating || !unit.claim_start() {
            if unit.active() == ActivationState::Active {
                return Ok(());
            }
            return self.await_peer_attempt(&name, unit).await;
        }

        self.bus
            .publish(Event::new(EventKind::UnitStarting).with_unit(name.as_str()));
        tracing::debug!(unit = %name, "start claimed");

        match self.run_steps(&name, unit).await {
            Ok(()) => {
                self.bus
                    .publish(Event::new(EventKind::UnitActive).with_unit(name.as_str()));
                Ok(())
            }
            Err(err) => {
                if unit.active() != ActivationState::Failed {
                    unit.mark_failed(&err.to_string());
                }
                self.bus.publish(
                    Event::new(EventKind::UnitFailed)
                        .with_unit(name.as_str())
                        .with_reason(err.to_string()),
                );
                Err(err)
            }
        }
    }

    /// The ordered relationship steps, run under a successful claim.
    async fn run_steps(self: &Arc<Self>, name: &str, unit: &UnitRef) -> Result<(), StartError> {
        // 1. Conflicts: refuse while any conflicting peer is up.
        for peer in unit.conflicts() {
            if let Some(other) = self.resolver.lookup(&peer) {
                if other.active() == ActivationState::Active {
                    self.bus.publish(
                        Event::new(EventKind::ConflictDetected)
                            .with_unit(name)
                            .with_dependency(peer.as_str()),
                    );
                    return Err(StartError::ConflictActive {
                        unit: name.to_string(),
                        conflict: peer,
                    });
                }
            }
        }

        // 2. After: every peer must resolve and settle active before this
        // unit proceeds. Ordering only — nothing is triggered here.
        for peer in unit.after() {
            let dep =
                self.resolver
                    .lookup(&peer)
                    .ok_or_else(|| StartError::DependencyNotFound {
                        unit: name.to_string(),
                        name: peer.clone(),
                    })?;
            self.wait_until_active(name, &dep).await?;
        }

        // 3. Before: a peer this unit must precede has already started.
        for peer in unit.before() {
            if let Some(other) = self.resolver.lookup(&peer) {
                if other.active() == ActivationState::Active {
                    return Err(StartError::OrderingViolation {
                        unit: name.to_string(),
                        before: peer,
                    });
                }
            }
        }

        // 4. Requires/Wants fan-out with single-point error aggregation.
        let requires = unit.requires();
        let wants = unit.wants();
        self.trigger_dependencies(name, unit, &requires, &wants)
            .await?;

        // 5. Readiness: required peers must be active, whoever started them.
        for peer in &requires {
            let dep =
                self.resolver
                    .lookup(peer)
                    .ok_or_else(|| StartError::DependencyNotFound {
                        unit: name.to_string(),
                        name: peer.clone(),
                    })?;
            self.wait_until_active(name, &dep).await?;
        }

        // 6. All requirements up: the unit's own activation hook decides.
        unit.start().await
    }

    /// Spawns one task per `Requires=`/`Wants=` entry and aggregates their
    /// outcomes from a single channel.
    ///
    /// The first `Requires=` failure is fatal and selected here; `Wants=`
    /// failures are logged to the unit's sink, published as `WantFailed`
    /// and swallowed. Outcomes still in flight after a fatal selection are
    /// discarded — their tasks keep running detached.
    async fn trigger_dependencies(
        self: &Arc<Self>,
        name: &str,
        unit: &UnitRef,
        requires: &[String],
        wants: &[String],
    ) -> Result<(), StartError> {
        let total = requires.len() + wants.len();
        if total == 0 {
            return Ok(());
        }

        let gate = self
            .cfg
            .concurrency_limit()
            .map(|n| Arc::new(Semaphore::new(n)));
        let (tx, mut rx) = mpsc::channel::<DepOutcome>(total);

        let entries = requires
            .iter()
            .cloned()
            .map(|n| (Relation::Requires, n))
            .chain(wants.iter().cloned().map(|n| (Relation::Wants, n)));
        for (relation, dep_name) in entries {
            let engine = Arc::clone(self);
            let tx = tx.clone();
            let gate = gate.clone();
            let waiter = name.to_string();
            tokio::spawn(async move {
                let _permit = match gate {
                    Some(sem) => match sem.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(_) => return,
                    },
                    None => None,
                };
                let result = engine.trigger_one(&waiter, &dep_name).await;
                let _ = tx
                    .send(DepOutcome {
                        relation,
                        name: dep_name,
                        result,
                    })
                    .await;
            });
        }
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            match (outcome.relation, outcome.result) {
                (Relation::Requires, Err(err)) => {
                    let err = match err {
                        found @ StartError::DependencyNotFound { .. } => found,
                        other => StartError::DependencyFailed {
                            unit: name.to_string(),
                            name: outcome.name.clone(),
                            reason: other.to_string(),
                        },
                    };
                    self.bus.publish(
                        Event::new(EventKind::DependencyFailed)
                            .with_unit(name)
                            .with_dependency(outcome.name.as_str())
                            .with_reason(err.to_string()),
                    );
                    return Err(err);
                }
                (Relation::Wants, Err(err)) => {
                    tracing::warn!(
                        unit = %name,
                        want = %outcome.name,
                        error = %err,
                        "wanted unit failed; continuing"
                    );
                    unit.log(&format!("wanted unit {} failed: {err}", outcome.name));
                    self.bus.publish(
                        Event::new(EventKind::WantFailed)
                            .with_unit(name)
                            .with_dependency(outcome.name.as_str())
                            .with_reason(err.to_string()),
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Resolves and, unless it is already on its way up, starts one
    /// dependency.
    async fn trigger_one(self: &Arc<Self>, waiter: &str, dep_name: &str) -> Result<(), StartError> {
        let dep =
            self.resolver
                .lookup(dep_name)
                .ok_or_else(|| StartError::DependencyNotFound {
                    unit: waiter.to_string(),
                    name: dep_name.to_string(),
                })?;
        if dep.active().is_active_or_activating() {
            return Ok(());
        }
        tracing::debug!(unit = %waiter, dep = %dep_name, "starting dependency");
        Arc::clone(self).start_boxed(dep).await
    }

    /// Boxed recursion point for dependency starts.
    fn start_boxed(self: Arc<Self>, unit: UnitRef) -> BoxFuture<'static, Result<(), StartError>> {
        Box::pin(async move { self.start(&unit).await })
    }

    /// Awaits `dep` settling, bounded by the configured timeout and the
    /// engine's cancellation token.
    async fn wait_until_active(&self, waiter: &str, dep: &UnitRef) -> Result<(), StartError> {
        if dep.active() == ActivationState::Active {
            return Ok(());
        }

        let dep_name = dep.name().to_string();
        let mut rx = dep.watch();
        let settled = async {
            match rx.wait_for(|st| st.state.is_terminal()).await {
                Ok(st) if st.state == ActivationState::Active => Ok(()),
                Ok(_) => Err(StartError::DependencyFailed {
                    unit: waiter.to_string(),
                    name: dep_name.clone(),
                    reason: "ended in failed state".into(),
                }),
                Err(_) => Err(StartError::DependencyFailed {
                    unit: waiter.to_string(),
                    name: dep_name.clone(),
                    reason: "removed while awaited".into(),
                }),
            }
        };

        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(StartError::Canceled {
                unit: waiter.to_string(),
            }),
            res = async {
                match self.cfg.start_timeout_opt() {
                    Some(limit) => match time::timeout(limit, settled).await {
                        Ok(res) => res,
                        Err(_) => Err(StartError::Timeout {
                            unit: waiter.to_string(),
                            timeout: limit,
                        }),
                    },
                    None => settled.await,
                }
            } => res,
        };

        if let Err(StartError::Timeout { .. }) = &result {
            self.bus.publish(
                Event::new(EventKind::StartTimeout)
                    .with_unit(waiter)
                    .with_dependency(dep_name.as_str()),
            );
        }
        result
    }

    /// Awaits the terminal state of a start claimed by another dependent.
    async fn await_peer_attempt(&self, name: &str, unit: &UnitRef) -> Result<(), StartError> {
        let mut rx = unit.watch();
        let settled = async {
            match rx.wait_for(|st| st.state.is_terminal()).await {
                Ok(st) if st.state == ActivationState::Active => Ok(()),
                _ => Err(StartError::ExecFailed {
                    unit: name.to_string(),
                    reason: "concurrent start attempt failed".into(),
                }),
            }
        };

        tokio::select! {
            _ = self.cancel.cancelled() => Err(StartError::Canceled {
                unit: name.to_string(),
            }),
            res = async {
                match self.cfg.start_timeout_opt() {
                    Some(limit) => match time::timeout(limit, settled).await {
                        Ok(res) => res,
                        Err(_) => Err(StartError::Timeout {
                            unit: name.to_string(),
                            timeout: limit,
                        }),
                    },
                    None => settled.await,
                }
            } => res,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::engine::resolver::Registry;
    use crate::units::{Definition, ServiceUnit, Supervisable, TargetUnit};

    /// Service whose hook records its name into a shared order log.
    fn recording(
        reg: &Arc<Registry>,
        name: &str,
        def: Definition,
        order: &Arc<Mutex<Vec<String>>>,
    ) -> UnitRef {
        let order = order.clone();
        let tag = name.to_string();
        let unit = ServiceUnit::arc_with_exec(name, def, move || {
            let order = order.clone();
            let tag = tag.clone();
            async move {
                order.lock().unwrap().push(tag);
                Ok(())
            }
        });
        reg.insert(unit.clone());
        unit
    }

    /// Service whose hook counts invocations.
    fn counting(
        reg: &Arc<Registry>,
        name: &str,
        def: Definition,
        count: &Arc<AtomicUsize>,
    ) -> UnitRef {
        let count = count.clone();
        let unit = ServiceUnit::arc_with_exec(name, def, move || {
            let count = count.clone();
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        reg.insert(unit.clone());
        unit
    }

    fn failing(reg: &Arc<Registry>, name: &str, def: Definition) -> UnitRef {
        let unit = ServiceUnit::arc_with_exec(name, def, || async { Err("exit 1".to_string()) });
        reg.insert(unit.clone());
        unit
    }

    fn plain(reg: &Arc<Registry>, name: &str, def: Definition) -> UnitRef {
        let unit = ServiceUnit::arc(name, def);
        reg.insert(unit.clone());
        unit
    }

    #[tokio::test]
    async fn test_requires_chain_comes_up_in_order() {
        let reg = Registry::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        recording(&reg, "base.service", Definition::default(), &order);
        recording(
            &reg,
            "mid.service",
            Definition::default().with_requires(["base.service"]),
            &order,
        );
        let top = recording(
            &reg,
            "top.service",
            Definition::default().with_requires(["mid.service"]),
            &order,
        );

        let engine = Engine::new(Config::default(), reg.clone());
        engine.start(&top).await.unwrap();

        assert_eq!(top.active(), ActivationState::Active);
        assert_eq!(
            *order.lock().unwrap(),
            vec!["base.service", "mid.service", "top.service"],
            "requirements must activate strictly before their dependent"
        );
    }

    #[tokio::test]
    async fn test_conflict_refuses_start_without_touching_deps() {
        let reg = Registry::new();
        let count = Arc::new(AtomicUsize::new(0));
        counting(&reg, "dep.service", Definition::default(), &count);
        let blocker = plain(&reg, "maintenance.target", Definition::default());
        let unit = plain(
            &reg,
            "web.service",
            Definition::default()
                .with_requires(["dep.service"])
                .with_conflicts(["maintenance.target"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        engine.start(&blocker).await.unwrap();

        let err = engine.start(&unit).await.unwrap_err();
        match err {
            StartError::ConflictActive { conflict, .. } => {
                assert_eq!(conflict, "maintenance.target");
            }
            other => panic!("expected ConflictActive, got {other:?}"),
        }
        assert_eq!(unit.active(), ActivationState::Failed);
        assert_eq!(count.load(Ordering::SeqCst), 0, "no dependency touched");
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let reg = Registry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let dep_count = Arc::new(AtomicUsize::new(0));
        counting(&reg, "db.service", Definition::default(), &dep_count);
        let unit = counting(
            &reg,
            "web.service",
            Definition::default().with_requires(["db.service"]),
            &count,
        );

        let engine = Engine::new(Config::default(), reg.clone());
        engine.start(&unit).await.unwrap();
        engine.start(&unit).await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(dep_count.load(Ordering::SeqCst), 1, "no re-trigger");
    }

    #[tokio::test]
    async fn test_want_failure_is_logged_and_swallowed() {
        let reg = Registry::new();
        plain(&reg, "a.service", Definition::default());
        plain(&reg, "b.service", Definition::default());
        failing(&reg, "c.service", Definition::default());
        let unit = plain(
            &reg,
            "web.service",
            Definition::default()
                .with_requires(["a.service", "b.service"])
                .with_wants(["c.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        engine.start(&unit).await.unwrap();

        assert_eq!(unit.active(), ActivationState::Active);
        let log = String::from_utf8(unit.read_log(4096).unwrap().expect("log data")).unwrap();
        assert!(log.contains("c.service"), "want failure recorded: {log}");
    }

    #[tokio::test]
    async fn test_requires_failure_is_fatal() {
        let reg = Registry::new();
        failing(&reg, "db.service", Definition::default());
        let unit = plain(
            &reg,
            "web.service",
            Definition::default().with_requires(["db.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        let err = engine.start(&unit).await.unwrap_err();
        match err {
            StartError::DependencyFailed { name, .. } => assert_eq!(name, "db.service"),
            other => panic!("expected DependencyFailed, got {other:?}"),
        }
        assert_eq!(unit.active(), ActivationState::Failed);
    }

    #[tokio::test]
    async fn test_after_not_found_reported_before_requires_trigger() {
        let reg = Registry::new();
        let count = Arc::new(AtomicUsize::new(0));
        counting(&reg, "dep.service", Definition::default(), &count);
        let unit = plain(
            &reg,
            "web.service",
            Definition::default()
                .with_after(["ghost.target"])
                .with_requires(["dep.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        let err = engine.start(&unit).await.unwrap_err();
        match err {
            StartError::DependencyNotFound { name, .. } => assert_eq!(name, "ghost.target"),
            other => panic!("expected DependencyNotFound, got {other:?}"),
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_requires_cycle_is_rejected() {
        let reg = Registry::new();
        let a = plain(
            &reg,
            "a.service",
            Definition::default().with_requires(["b.service"]),
        );
        plain(
            &reg,
            "b.service",
            Definition::default().with_requires(["a.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        let err = engine.start(&a).await.unwrap_err();
        assert_eq!(err.as_label(), "start_cycle_detected");
        assert_eq!(a.active(), ActivationState::Inactive, "rejected before claim");
    }

    #[tokio::test]
    async fn test_after_blocks_until_peer_activates() {
        let reg = Registry::new();
        let net = TargetUnit::arc("net.target", Definition::default());
        reg.insert(net.clone());
        let unit = plain(
            &reg,
            "web.service",
            Definition::default().with_after(["net.target"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        let handle = {
            let engine = engine.clone();
            let unit = unit.clone();
            tokio::spawn(async move { engine.start(&unit).await })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(
            unit.active(),
            ActivationState::Activating,
            "must wait for net.target"
        );

        engine.start(&net).await.unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(unit.active(), ActivationState::Active);
    }

    #[tokio::test]
    async fn test_before_target_already_active_is_ordering_violation() {
        let reg = Registry::new();
        let late = plain(&reg, "late.service", Definition::default());
        let unit = plain(
            &reg,
            "early.service",
            Definition::default().with_before(["late.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        engine.start(&late).await.unwrap();

        let err = engine.start(&unit).await.unwrap_err();
        assert_eq!(err.as_label(), "start_ordering_violation");
        assert_eq!(unit.active(), ActivationState::Failed);
    }

    #[tokio::test]
    async fn test_load_error_unit_is_never_started() {
        let reg = Registry::new();
        let unit = plain(&reg, "broken.service", Definition::default());
        unit.set_loaded(LoadState::Error);

        let engine = Engine::new(Config::default(), reg.clone());
        let err = engine.start(&unit).await.unwrap_err();
        assert_eq!(err.as_label(), "start_not_loaded");
        assert_eq!(unit.active(), ActivationState::Inactive);
    }

    #[tokio::test]
    async fn test_wait_timeout_fails_the_start() {
        let reg = Registry::new();
        reg.insert(TargetUnit::arc("never.target", Definition::default()));
        let unit = plain(
            &reg,
            "web.service",
            Definition::default().with_after(["never.target"]),
        );

        let mut cfg = Config::default();
        cfg.start_timeout = Duration::from_millis(50);
        let engine = Engine::new(cfg, reg.clone());

        let err = engine.start(&unit).await.unwrap_err();
        assert_eq!(err.as_label(), "start_timeout");
        assert_eq!(unit.active(), ActivationState::Failed);
    }

    #[tokio::test]
    async fn test_shutdown_unblocks_waiters() {
        let reg = Registry::new();
        reg.insert(TargetUnit::arc("never.target", Definition::default()));
        let unit = plain(
            &reg,
            "web.service",
            Definition::default().with_after(["never.target"]),
        );

        let mut cfg = Config::default();
        cfg.start_timeout = Duration::ZERO; // wait forever
        let engine = Engine::new(cfg, reg.clone());

        let handle = {
            let engine = engine.clone();
            let unit = unit.clone();
            tokio::spawn(async move { engine.start(&unit).await })
        };
        tokio::time::sleep(Duration::from_millis(30)).await;
        engine.shutdown();

        let err = handle.await.unwrap().unwrap_err();
        assert_eq!(err.as_label(), "start_canceled");
    }

    #[tokio::test]
    async fn test_shared_dependency_activates_once() {
        let reg = Registry::new();
        let count = Arc::new(AtomicUsize::new(0));
        counting(&reg, "db.service", Definition::default(), &count);
        let one = plain(
            &reg,
            "one.service",
            Definition::default().with_requires(["db.service"]),
        );
        let two = plain(
            &reg,
            "two.service",
            Definition::default().with_requires(["db.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        let (r1, r2) = tokio::join!(engine.start(&one), engine.start(&two));
        r1.unwrap();
        r2.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1, "one activation for both");
    }

    #[tokio::test]
    async fn test_stop_deactivates_and_publishes() {
        let reg = Registry::new();
        let unit = plain(&reg, "web.service", Definition::default());
        let engine = Engine::new(Config::default(), reg.clone());
        engine.start(&unit).await.unwrap();

        let mut rx = engine.bus().subscribe();
        engine.stop(&unit).await;

        assert_eq!(unit.active(), ActivationState::Inactive);
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::UnitStopped);
        assert_eq!(ev.unit.as_deref(), Some("web.service"));
    }

    #[tokio::test]
    async fn test_engine_read_log_is_chunked() {
        let reg = Registry::new();
        let unit = plain(&reg, "chatty.service", Definition::default());

        let mut cfg = Config::default();
        cfg.log_capacity = 256;
        cfg.log_chunk = 8;
        let engine = Engine::new(cfg, reg.clone());

        engine.attach_output(&unit);
        assert_eq!(engine.read_log(&unit), Ok(None));

        unit.log("a fairly long line of output");
        let chunk = engine.read_log(&unit).unwrap().expect("data");
        assert_eq!(chunk.len(), 8);
    }

    #[tokio::test]
    async fn test_lifecycle_events_are_published() {
        let reg = Registry::new();
        plain(&reg, "db.service", Definition::default());
        let unit = plain(
            &reg,
            "web.service",
            Definition::default().with_requires(["db.service"]),
        );

        let engine = Engine::new(Config::default(), reg.clone());
        let mut rx = engine.bus().subscribe();
        engine.start(&unit).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push((ev.kind, ev.unit.as_deref().map(str::to_string)));
        }
        assert!(kinds.contains(&(EventKind::UnitStarting, Some("web.service".into()))));
        assert!(kinds.contains(&(EventKind::UnitActive, Some("db.service".into()))));
        assert!(kinds.contains(&(EventKind::UnitActive, Some("web.service".into()))));
    }
}
