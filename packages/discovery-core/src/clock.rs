//! Wall-clock abstraction for the registry.
//!
//! All expiration and last-writer-wins arithmetic in the dynamic store reads
//! time exclusively through a [`Clock`], never `SystemTime::now()` directly.
//! This keeps TTL and reaper behavior deterministic under test.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Monotonic (from this process's point of view) source of wall-clock
/// milliseconds since the Unix epoch.
///
/// Implementations must not go backwards across calls from the same process;
/// a real deployment backed by [`SystemClock`] relies on the host's own NTP
/// discipline for that guarantee, and a large backward jump is considered
/// operator error rather than something this crate corrects for.
pub trait Clock: Send + Sync {
    /// Returns the current time as milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Default clock that reads the real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before Unix epoch")
            .as_millis() as i64
    }
}

/// Settable clock for deterministic tests.
///
/// Starts at whatever value [`FrozenClock::new`] is given and only moves when
/// [`FrozenClock::advance`] or [`FrozenClock::set`] is called -- never on its
/// own, so tests can assert on exact TTL boundaries without sleeping.
#[derive(Debug)]
pub struct FrozenClock {
    millis: AtomicI64,
}

impl FrozenClock {
    /// Creates a clock frozen at `start_ms`.
    #[must_use]
    pub fn new(start_ms: i64) -> Self {
        Self {
            millis: AtomicI64::new(start_ms),
        }
    }

    /// Moves the clock forward by `delta_ms` (may be negative to simulate skew).
    pub fn advance(&self, delta_ms: i64) {
        self.millis.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute value.
    pub fn set(&self, new_ms: i64) {
        self.millis.store(new_ms, Ordering::SeqCst);
    }
}

impl Clock for FrozenClock {
    fn now_ms(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_clock_starts_at_given_value() {
        let clock = FrozenClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn frozen_clock_advances() {
        let clock = FrozenClock::new(1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
    }

    #[test]
    fn frozen_clock_can_go_backward_for_skew_tests() {
        let clock = FrozenClock::new(1_000);
        clock.advance(-200);
        assert_eq!(clock.now_ms(), 800);
    }

    #[test]
    fn frozen_clock_set_is_absolute() {
        let clock = FrozenClock::new(1_000);
        clock.set(42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn system_clock_is_plausible() {
        let clock = SystemClock;
        let now = clock.now_ms();
        // Should be well after this crate was written and well before the heat death.
        assert!(now > 1_700_000_000_000);
    }
}
