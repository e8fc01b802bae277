//! Timer Slots
//!
//! The overlay never sleeps. Each pending callback is a deadline parked in
//! an owned [`Timer`] slot, and whoever drives the overlay (the async
//! driver, a render loop, a test) asks for the earliest deadline and calls
//! back once it has passed.
//!
//! A slot holds at most one deadline. Arming it again replaces whatever
//! was there, so a superseded callback can never fire after the transition
//! that replaced it.

use std::time::{Duration, Instant};

/// A single cancellable timer, one-shot or periodic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
    period: Option<Duration>,
}

impl Timer {
    /// An unarmed slot
    pub const fn new() -> Self {
        Self {
            deadline: None,
            period: None,
        }
    }

    /// Fire once at `at`
    pub fn arm_once(&mut self, at: Instant) {
        self.deadline = Some(at);
        self.period = None;
    }

    /// Fire every `period`, first at `start + period`
    pub fn arm_periodic(&mut self, start: Instant, period: Duration) {
        self.deadline = Some(start + period);
        self.period = Some(period);
    }

    /// Drop any pending deadline
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Whether the deadline has passed at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| d <= now)
    }

    /// Consume one firing
    ///
    /// Periodic timers are re-armed from their own deadline rather than
    /// from the wall clock, so a late driver does not stretch the cadence.
    /// Returns the logical firing time.
    pub fn fire(&mut self) -> Option<Instant> {
        let fired_at = self.deadline?;
        match self.period {
            Some(period) if !period.is_zero() => self.deadline = Some(fired_at + period),
            _ => self.cancel(),
        }
        Some(fired_at)
    }

    /// Consume every firing due at `now` in one step
    ///
    /// Returns how many firings were consumed. A periodic timer ends up
    /// armed for its first deadline after `now`; a one-shot is disarmed.
    pub fn fire_through(&mut self, now: Instant) -> u64 {
        let Some(deadline) = self.deadline.filter(|d| *d <= now) else {
            return 0;
        };
        let period = match self.period {
            Some(period) if !period.is_zero() => period,
            _ => {
                self.cancel();
                return 1;
            }
        };

        let missed = now.duration_since(deadline).as_nanos() / period.as_nanos();
        let count = missed + 1;
        let advance = u64::try_from(period.as_nanos().saturating_mul(count)).unwrap_or(u64::MAX);
        self.deadline = Some(deadline + Duration::from_nanos(advance));
        u64::try_from(count).unwrap_or(u64::MAX)
    }
}
