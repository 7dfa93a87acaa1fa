//! # Per-unit log capture.
//!
//! [`LogSink`] is a bounded, append-only byte sink each unit writes its
//! captured output into. It is a diagnostic side channel, not part of the
//! activation contract.
//!
//! ## Rules
//! - Writes are append-only during an activation attempt.
//! - The sink tolerates concurrent read-while-append; readers see a
//!   point-in-time snapshot.
//! - When capacity is exceeded, the oldest bytes are dropped.
//! - [`LogSink::drain`] returns `None` on an empty sink — "no data" is not
//!   an error.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::Local;

/// Default sink capacity for units constructed outside an engine config.
pub const DEFAULT_LOG_CAPACITY: usize = 16 * 1024;

/// Bounded append-only log buffer.
///
/// Cheap to clone; clones share the same buffer. Writers append timestamped
/// lines, readers drain bounded chunks from the front.
#[derive(Clone, Debug)]
pub struct LogSink {
    inner: Arc<Mutex<VecDeque<u8>>>,
    capacity: usize,
}

impl LogSink {
    /// Creates a sink holding at most `capacity` bytes.
    ///
    /// Capacity is clamped to a minimum of 1.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
            capacity: capacity.max(1),
        }
    }

    /// Appends one line, prefixed with a local timestamp.
    ///
    /// The line is stored as `"{Y/m/d H:M:S} {line}\n"`. If the buffer
    /// would exceed capacity, the oldest bytes are dropped first.
    pub fn write_line(&self, line: &str) {
        let stamped = format!("{} {}\n", Local::now().format("%Y/%m/%d %H:%M:%S"), line);
        let mut buf = self.inner.lock().expect("log sink poisoned");
        for b in stamped.bytes() {
            if buf.len() == self.capacity {
                buf.pop_front();
            }
            buf.push_back(b);
        }
    }

    /// Drains and returns up to `max` bytes from the front of the buffer.
    ///
    /// Returns `None` when no data is available.
    pub fn drain(&self, max: usize) -> Option<Vec<u8>> {
        let mut buf = self.inner.lock().expect("log sink poisoned");
        if buf.is_empty() {
            return None;
        }
        let n = max.max(1).min(buf.len());
        Some(buf.drain(..n).collect())
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("log sink poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::bounded(DEFAULT_LOG_CAPACITY)
    }
}
