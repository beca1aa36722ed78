//! Timer module - gravity scheduling
//!
//! The board never reads a clock. The runner keeps a [`FallTimer`], ticks the
//! board when it is due, and reschedules with the board's current
//! `fall_interval()` so speed-ups take effect on the very next fall.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FallTimer {
    deadline: Instant,
}

impl FallTimer {
    /// First fall happens `interval` after `now`
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            deadline: now + interval,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Time left before the next fall; zero once due
    pub fn time_until(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Schedule the next fall `interval` after `now`
    pub fn reschedule(&mut self, now: Instant, interval: Duration) {
        self.deadline = now + interval;
    }
}
