//! # Units: definitions, the capability trait, and concrete kinds.
//!
//! This module groups everything a single unit is made of:
//!
//! - [`Definition`] — the immutable, name-based description a loader hands
//!   over ([`definition`]);
//! - [`Supervisable`] / [`UnitRef`] — the capability trait the engine
//!   drives ([`supervisable`]);
//! - [`UnitCore`] — the shared aggregate embedded by every kind
//!   ([`unit`]);
//! - [`ServiceUnit`], [`TargetUnit`] — the shipped kinds ([`service`],
//!   [`target`]);
//! - [`LogSink`] — bounded per-unit output capture ([`sink`]).

mod definition;
mod service;
mod sink;
mod supervisable;
mod target;
mod unit;

pub use definition::{Definition, InstallSection, UnitSection};
pub use service::{ExecFn, ServiceUnit};
pub use sink::{LogSink, DEFAULT_LOG_CAPACITY};
pub use supervisable::{Supervisable, UnitRef};
pub use target::TargetUnit;
pub use unit::UnitCore;
