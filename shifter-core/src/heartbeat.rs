//! Keep-alive support for the timer-driven variant.
//!
//! A periodic timer context bumps a [`TickCounter`]; the poll loop reads it
//! and forces a full report every [`KeepAlive::period`] ticks even when no
//! button changed. The counter is the only state shared between the two
//! contexts. It is a single atomic word so reads can never tear; targets
//! without native read-modify-write (thumbv6m) get `fetch_add` through
//! `portable-atomic`'s critical-section fallback.

use portable_atomic::{AtomicU32, Ordering};

/// Default keep-alive period in ticks.
pub const DEFAULT_PERIOD_TICKS: u32 = 20;

/// Monotonic tick counter written by the timer context.
///
/// Wraps at `u32::MAX`; consumers compare with wrapping arithmetic.
pub struct TickCounter {
    ticks: AtomicU32,
}

impl TickCounter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    /// Advance by one tick. Returns the new value.
    #[inline]
    pub fn tick(&self) -> u32 {
        self.ticks.fetch_add(1, Ordering::Release).wrapping_add(1)
    }

    #[inline]
    #[must_use]
    pub fn now(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks when the last report went out and whether one is due.
///
/// Owned by the poll loop only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeepAlive {
    period: u32,
    last: u32,
}

impl KeepAlive {
    /// `period` of zero is treated as one tick.
    #[must_use]
    pub const fn new(period: u32) -> Self {
        Self {
            period: if period == 0 { 1 } else { period },
            last: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn period(&self) -> u32 {
        self.period
    }

    /// True once `period` ticks have elapsed since the last [`mark`](Self::mark).
    #[inline]
    #[must_use]
    pub const fn due(&self, now: u32) -> bool {
        now.wrapping_sub(self.last) >= self.period
    }

    /// Record that a report went out at `now`.
    #[inline]
    pub fn mark(&mut self, now: u32) {
        self.last = now;
    }
}

impl Default for KeepAlive {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_TICKS)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_tick_counts_up() {
        let counter = TickCounter::new();
        assert_eq!(counter.now(), 0);
        assert_eq!(counter.tick(), 1);
        assert_eq!(counter.tick(), 2);
        assert_eq!(counter.now(), 2);
    }

    #[test]
    fn test_ticks_from_another_thread_are_not_lost() {
        let counter = Arc::new(TickCounter::new());
        let producer = {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..10_000 {
                    counter.tick();
                }
            })
        };
        for _ in 0..10_000 {
            counter.tick();
        }
        producer.join().unwrap();
        assert_eq!(counter.now(), 20_000);
    }

    #[test]
    fn test_keep_alive_due_every_period() {
        let mut keep_alive = KeepAlive::new(20);
        assert!(!keep_alive.due(19));
        assert!(keep_alive.due(20));
        keep_alive.mark(20);
        assert!(!keep_alive.due(39));
        assert!(keep_alive.due(40));
    }

    #[test]
    fn test_keep_alive_handles_wrap() {
        let mut keep_alive = KeepAlive::new(20);
        keep_alive.mark(u32::MAX - 5);
        assert!(!keep_alive.due(10));
        assert!(keep_alive.due(14));
    }

    #[test]
    fn test_zero_period_clamped() {
        assert_eq!(KeepAlive::new(0).period(), 1);
    }
}
