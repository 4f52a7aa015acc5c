//! Clock abstraction for record timestamps
//!
//! Backends stamp records through a [`MonotonicClock`] so that timestamps
//! never run backwards with insertion order, even if the wall clock does.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

/// Source of wall clock time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_ms(&self) -> i64;
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Fixed clock for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub time_ms: i64,
}

impl FixedClock {
    pub fn new(time_ms: i64) -> Self {
        Self { time_ms }
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.time_ms
    }
}

/// Hands out timestamps that never decrease.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    source: Arc<dyn Clock>,
    last_ms: Arc<AtomicI64>,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl MonotonicClock {
    pub fn new(source: Arc<dyn Clock>) -> Self {
        Self {
            source,
            last_ms: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }

    /// `max(now, last issued)`.
    pub fn now(&self) -> DateTime<Utc> {
        let now = self.source.now_ms();
        let issued = self.issue(|last| now.max(last));
        to_datetime(issued)
    }

    /// `max(now, floor, last issued)`. Used to continue after timestamps
    /// that were issued by an earlier clock.
    pub fn now_at_least(&self, floor_ms: i64) -> DateTime<Utc> {
        let now = self.source.now_ms();
        let issued = self.issue(|last| now.max(floor_ms).max(last));
        to_datetime(issued)
    }

    /// A millisecond tick strictly greater than both `floor` and every tick
    /// this clock issued before.
    pub fn next_strict_ms(&self, floor: i64) -> i64 {
        let now = self.source.now_ms();
        let floor = floor.saturating_add(1);
        self.issue(|last| now.max(floor).max(last.saturating_add(1)))
    }

    fn issue(&self, next: impl Fn(i64) -> i64) -> i64 {
        let mut last = self.last_ms.load(Ordering::Acquire);
        loop {
            let candidate = next(last);
            match self.last_ms.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Converts epoch milliseconds to a UTC datetime, clamping out-of-range
/// values to the epoch.
pub fn to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_reasonable_time() {
        // after 2025-01-01
        assert!(SystemClock.now_ms() > 1_735_689_600_000);
    }

    #[test]
    fn test_now_never_decreases() {
        let clock = MonotonicClock::new(Arc::new(FixedClock::new(1_000)));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(first, second);
        assert_eq!(first.timestamp_millis(), 1_000);
    }

    #[test]
    fn test_strict_ticks_increase_with_frozen_clock() {
        let clock = MonotonicClock::new(Arc::new(FixedClock::new(5_000)));
        let a = clock.next_strict_ms(i64::MIN);
        let b = clock.next_strict_ms(i64::MIN);
        let c = clock.next_strict_ms(9_000);
        assert_eq!(a, 5_000);
        assert_eq!(b, 5_001);
        assert_eq!(c, 9_001);
    }

    #[test]
    fn test_now_at_least_honours_floor_and_history() {
        let clock = MonotonicClock::new(Arc::new(FixedClock::new(1_000)));
        assert_eq!(clock.now_at_least(i64::MIN).timestamp_millis(), 1_000);
        assert_eq!(clock.now_at_least(4_000).timestamp_millis(), 4_000);
        assert_eq!(clock.now_at_least(2_000).timestamp_millis(), 4_000);
        assert_eq!(clock.now().timestamp_millis(), 4_000);
    }
}
