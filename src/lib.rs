//! # unitvisor
//!
//! **Unitvisor** is a dependency-ordered unit activation library for Rust.
//!
//! It models the core of an init-system unit manager: each managed unit
//! carries a static [`Definition`] (relationship name lists, description)
//! and a mutable runtime status (load/enable/activation state), and the
//! activation engine brings units up in dependency order while detecting
//! conflicts and cycles. The crate is designed as a building block for
//! higher-level supervisors — unit-file parsing, process supervision and
//! CLI front ends are collaborators, not part of this crate.
//!
//! ## Architecture
//! ```text
//!   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!   │ ServiceUnit  │   │ ServiceUnit  │   │  TargetUnit  │
//!   │ (exec hook)  │   │ (exec hook)  │   │  (passive)   │
//!   └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!          └───────── Registry (owns units, resolves names) ─────────┐
//!                             ▲                                      │
//!                             │ lookup(name) → UnitRef               │
//! ┌───────────────────────────┴───────────────────────────────────┐  │
//! │  Engine (activation orchestrator)                             │  │
//! │  - cycle check over requires ∪ after                          │  │
//! │  - Conflicts= / After= / Before= checks, in that order        │  │
//! │  - one task per Requires=/Wants= entry ──► outcome channel    │  │
//! │  - watch-channel waits (no polling), timeout + cancellation   │  │
//! └──────┬────────────────────────────────────────────────────────┘  │
//!        │ publishes                                                 │
//!        ▼                                                           ▼
//!      Bus (broadcast) ──► StateTracker / LogWriter / custom   unit log sinks
//! ```
//!
//! ## Start semantics
//! ```text
//! engine.start(unit)
//!   ├─ Active?            → Ok (idempotent, nothing re-triggered)
//!   ├─ cycle?             → CycleDetected (rejected before any wait)
//!   ├─ Conflicts= active? → ConflictActive, unit Failed, deps untouched
//!   ├─ After=             → await each peer Active (NotFound / failed peer is fatal)
//!   ├─ Before= active?    → OrderingViolation
//!   ├─ Requires=          → start concurrently; first failure fatal
//!   ├─ Wants=             → start concurrently; failures logged, swallowed
//!   ├─ readiness          → await every Requires= peer Active
//!   └─ unit.start()       → own hook decides Active / Failed
//! ```
//!
//! ## Features
//! | Area           | Description                                            | Key types / traits              |
//! |----------------|--------------------------------------------------------|---------------------------------|
//! | **Units**      | Definitions, concrete kinds, per-unit log capture.     | [`Definition`], [`ServiceUnit`], [`TargetUnit`], [`LogSink`] |
//! | **Capability** | The trait the engine drives; implement it for custom kinds. | [`Supervisable`], [`UnitRef`] |
//! | **Activation** | Dependency-ordered start with structured failures.     | [`Engine`], [`StartError`]      |
//! | **Resolution** | Injected name→unit lookup; shipped registry.           | [`Resolver`], [`Registry`]      |
//! | **Status**     | Load/enable/activation state with canonical rendering. | [`UnitStatus`], [`ActivationState`] |
//! | **Events**     | Broadcast lifecycle events for observability.          | [`Event`], [`Bus`], [`Subscriber`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use unitvisor::{Config, Definition, Engine, Registry, ServiceUnit, Supervisable};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Registry::new();
//!     registry.insert(ServiceUnit::arc("db.service", Definition::default()));
//!
//!     let web = ServiceUnit::arc(
//!         "web.service",
//!         Definition::default()
//!             .with_description("demo web server")
//!             .with_requires(["db.service"]),
//!     );
//!     registry.insert(web.clone());
//!
//!     // The engine resolves names through the registry and brings
//!     // db.service up before web.service.
//!     let engine = Engine::new(Config::default(), registry.clone());
//!     engine.start(&web).await?;
//!
//!     println!("{}", web.status());
//!     Ok(())
//! }
//! ```

mod config;
mod engine;
mod error;
mod events;
mod status;
mod subscribers;
mod units;

// ---- Public re-exports ----

pub use config::Config;
pub use engine::{Engine, Registry, Resolver};
pub use error::{DefinitionError, LogError, StartError};
pub use events::{Bus, Event, EventKind};
pub use status::{
    ActivationState, ActivationStatus, EnableState, LoadState, LoadStatus, UnitStatus,
    VendorPreset,
};
pub use subscribers::{spawn_subscriber, StateTracker, Subscriber};
pub use units::{
    Definition, ExecFn, InstallSection, LogSink, ServiceUnit, Supervisable, TargetUnit, UnitCore,
    UnitRef, UnitSection, DEFAULT_LOG_CAPACITY,
};

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
