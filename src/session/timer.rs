//! Owned timers polled from the event loop.
//!
//! A timer only exists while the feature that owns it is active, so
//! dropping it is the cancellation: no tick can be observed afterwards.

use std::time::{Duration, Instant};

/// Shortest allowed period, keeps `poll` from spinning.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A repeating timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// Starts a timer whose first tick is due one period after `now`.
    pub fn start(now: Instant, period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Returns how many ticks became due up to `now` and consumes them.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while now >= self.next_due {
            fired += 1;
            self.next_due += self.period;
        }
        fired
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// A one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(now: Instant, delay: Duration) -> Self {
        Self { at: now + delay }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.at
    }
}
