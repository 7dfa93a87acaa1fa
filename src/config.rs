//! # Engine configuration.
//!
//! Provides [`Config`], the centralized settings for the activation engine
//! and per-unit log capture.
//!
//! ## Sentinel values
//! - `start_timeout = 0s` → wait on dependencies forever
//! - `max_concurrent_starts = 0` → unbounded fan-out (no semaphore created)
//! - `bus_capacity` is clamped to a minimum of 1 by the bus
//!
//! Prefer the helper accessors over sprinkling sentinel checks across the
//! codebase.

use std::time::Duration;

/// Configuration for the activation engine.
///
/// ## Field semantics
/// - `start_timeout`: upper bound on each dependency wait during a start
///   (`0s` = no bound)
/// - `max_concurrent_starts`: fan-out cap for one unit's dependency
///   triggering (`0` = unlimited)
/// - `bus_capacity`: event bus ring buffer size
/// - `log_capacity`: per-unit sink size in bytes; oldest lines are dropped
///   once exceeded
/// - `log_chunk`: largest chunk a single `read_log` drains
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time a start spends waiting for any one dependency to
    /// settle (`After=` waits and `Requires=` readiness).
    ///
    /// On expiry the start fails with `StartError::Timeout` and the unit
    /// is marked failed; in-flight dependency starts keep running.
    pub start_timeout: Duration,

    /// Maximum number of dependency starts one unit triggers concurrently.
    ///
    /// - `0` = unlimited
    /// - `n > 0` = at most `n` of this unit's `Requires`/`Wants` entries
    ///   start at the same time
    ///
    /// The cap is per start call, not engine-wide: a global cap would let a
    /// parent's dependency task starve its own children of permits.
    pub max_concurrent_starts: usize,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Subscribers lagging behind by more than this many events observe
    /// `Lagged` and skip the oldest items.
    pub bus_capacity: usize,

    /// Per-unit log sink capacity in bytes.
    pub log_capacity: usize,

    /// Largest number of bytes one `read_log` call returns.
    pub log_chunk: usize,
}

impl Config {
    /// Returns the start timeout as an `Option`.
    ///
    /// - `None` → wait forever
    /// - `Some(d)` → bound each dependency wait by `d`
    #[inline]
    pub fn start_timeout_opt(&self) -> Option<Duration> {
        if self.start_timeout == Duration::ZERO {
            None
        } else {
            Some(self.start_timeout)
        }
    }

    /// Returns the fan-out cap as an `Option`.
    ///
    /// - `None` → unlimited (no semaphore)
    /// - `Some(n)` → at most `n` concurrent dependency starts per unit
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.max_concurrent_starts == 0 {
            None
        } else {
            Some(self.max_concurrent_starts)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a read chunk size clamped to a minimum of 1 byte.
    #[inline]
    pub fn log_chunk_clamped(&self) -> usize {
        self.log_chunk.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `start_timeout = 30s`
    /// - `max_concurrent_starts = 0` (unlimited)
    /// - `bus_capacity = 1024`
    /// - `log_capacity = 16 KiB`
    /// - `log_chunk = 1000` bytes
    fn default() -> Self {
        Self {
            start_timeout: Duration::from_secs(30),
            max_concurrent_starts: 0,
            bus_capacity: 1024,
            log_capacity: 16 * 1024,
            log_chunk: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_means_forever() {
        let mut cfg = Config::default();
        cfg.start_timeout = Duration::ZERO;
        assert_eq!(cfg.start_timeout_opt(), None);

        cfg.start_timeout = Duration::from_secs(5);
        assert_eq!(cfg.start_timeout_opt(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_fanout_means_unlimited() {
        let mut cfg = Config::default();
        assert_eq!(cfg.concurrency_limit(), None);

        cfg.max_concurrent_starts = 4;
        assert_eq!(cfg.concurrency_limit(), Some(4));
    }

    #[test]
    fn test_clamps() {
        let mut cfg = Config::default();
        cfg.bus_capacity = 0;
        cfg.log_chunk = 0;
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.log_chunk_clamped(), 1);
    }
}
