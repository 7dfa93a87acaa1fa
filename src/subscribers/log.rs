//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] unit=db.service
//! [active] unit=db.service
//! [want-failed] unit=web.service dep=cache.service err="exec failed"
//! [dependency-failed] unit=web.service dep=db.service err="exit 1"
//! [conflict] unit=web.service with=maintenance.target
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscriber;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Intended for development and demos;
/// implement a custom [`Subscriber`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscriber for LogWriter {
    async fn handle(&self, e: &Event) {
        match e.kind {
            EventKind::UnitStarting => {
                println!("[starting] unit={:?}", e.unit);
            }
            EventKind::UnitActive => {
                println!("[active] unit={:?}", e.unit);
            }
            EventKind::UnitStopped => {
                println!("[stopped] unit={:?}", e.unit);
            }
            EventKind::UnitFailed => {
                println!("[failed] unit={:?} err={:?}", e.unit, e.reason);
            }
            EventKind::DependencyFailed => {
                println!(
                    "[dependency-failed] unit={:?} dep={:?} err={:?}",
                    e.unit, e.dependency, e.reason
                );
            }
            EventKind::WantFailed => {
                println!(
                    "[want-failed] unit={:?} dep={:?} err={:?}",
                    e.unit, e.dependency, e.reason
                );
            }
            EventKind::ConflictDetected => {
                println!("[conflict] unit={:?} with={:?}", e.unit, e.dependency);
            }
            EventKind::CycleDetected => {
                println!("[cycle] unit={:?} path={:?}", e.unit, e.reason);
            }
            EventKind::StartTimeout => {
                println!("[timeout] unit={:?} waiting-on={:?}", e.unit, e.dependency);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
