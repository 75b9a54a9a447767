// Copyright 2026 the Sediment Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic time sources for the frame budget check.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic time for budget accounting.
///
/// The display driver reads the clock once per pass start and once after
/// each visited command, so implementations should be cheap. Production use
/// is [`MonotonicClock`]; tests and simulations drive [`ManualClock`].
pub trait Clock: Send + Sync {
    /// Current instant. Must never go backwards.
    fn now(&self) -> Instant;
}

/// The host's monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Share one behind an `Arc`: the canvas reads it while test or simulation
/// code calls [`advance`](Self::advance), typically from inside instrumented
/// draw actions to give each command a known cost.
#[derive(Debug)]
pub struct ManualClock {
    epoch: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at an arbitrary epoch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    /// Total time this clock has been advanced.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::Relaxed))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.epoch + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_is_frozen_until_advanced() {
        let clock = ManualClock::new();
        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, b);

        clock.advance(Duration::from_millis(7));
        assert_eq!(clock.now().duration_since(a), Duration::from_millis(7));
        assert_eq!(clock.elapsed(), Duration::from_millis(7));
    }

    #[test]
    fn manual_clock_advances_through_shared_handle() {
        let clock = Arc::new(ManualClock::new());
        let start = clock.now();

        let handle = Arc::clone(&clock);
        handle.advance(Duration::from_micros(250));
        handle.advance(Duration::from_micros(250));

        assert_eq!(
            clock.now().duration_since(start),
            Duration::from_micros(500),
        );
    }
}
