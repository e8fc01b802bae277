//! Loading Signal
//!
//! The host hands the overlay either a plain flag ("is something loading?")
//! or a counter of outstanding requests. Both collapse into a single
//! "is active" bit before the state machine sees them.

use serde::{Deserialize, Serialize};

/// Raw signal supplied by the host application
///
/// Deserializes from either `true`/`false` or a non-negative integer, so
/// config files and JSON payloads can use whichever shape they have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoadingSignal {
    /// Boolean "is loading"
    Flag(bool),
    /// Number of in-flight requests
    Count(u64),
}

impl LoadingSignal {
    /// Idle signal (nothing loading)
    pub const IDLE: Self = Self::Flag(false);

    /// Interpret the signal as an activation bit
    ///
    /// In queue mode a counter is active while it is above zero. Outside
    /// queue mode the value is taken for its truthiness, which for an
    /// unsigned counter is the same thing.
    #[must_use]
    pub fn is_active(self, queue_mode: bool) -> bool {
        match (self, queue_mode) {
            (Self::Count(n), true) => n > 0,
            (Self::Flag(b), _) => b,
            (Self::Count(n), false) => n != 0,
        }
    }

    /// Numeric view of the signal (`true` counts as one)
    #[must_use]
    pub fn count(self) -> u64 {
        match self {
            Self::Flag(b) => u64::from(b),
            Self::Count(n) => n,
        }
    }

    /// One more outstanding request
    #[must_use]
    pub fn incremented(self) -> Self {
        Self::Count(self.count().saturating_add(1))
    }

    /// One fewer outstanding request, never below zero
    #[must_use]
    pub fn decremented(self) -> Self {
        Self::Count(self.count().saturating_sub(1))
    }
}

impl Default for LoadingSignal {
    fn default() -> Self {
        Self::IDLE
    }
}

impl From<bool> for LoadingSignal {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<u64> for LoadingSignal {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

impl From<u32> for LoadingSignal {
    fn from(value: u32) -> Self {
        Self::Count(u64::from(value))
    }
}

impl From<usize> for LoadingSignal {
    fn from(value: usize) -> Self {
        Self::Count(value as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_ignores_queue_mode() {
        assert!(LoadingSignal::Flag(true).is_active(false));
        assert!(LoadingSignal::Flag(true).is_active(true));
        assert!(!LoadingSignal::Flag(false).is_active(false));
        assert!(!LoadingSignal::Flag(false).is_active(true));
    }

    #[test]
    fn test_count_in_queue_mode() {
        assert!(LoadingSignal::from(2u32).is_active(true));
        assert!(!LoadingSignal::from(0u32).is_active(true));
        assert_eq!(
            LoadingSignal::from(0u32).is_active(true),
            LoadingSignal::Flag(false).is_active(true)
        );
    }

    #[test]
    fn test_count_outside_queue_mode_is_truthiness() {
        assert!(LoadingSignal::Count(7).is_active(false));
        assert!(!LoadingSignal::Count(0).is_active(false));
    }

    #[test]
    fn test_increment_decrement() {
        let s = LoadingSignal::IDLE.incremented().incremented();
        assert_eq!(s, LoadingSignal::Count(2));
        assert_eq!(s.decremented(), LoadingSignal::Count(1));
        assert_eq!(LoadingSignal::Count(0).decremented(), LoadingSignal::Count(0));
        assert_eq!(LoadingSignal::Flag(true).incremented(), LoadingSignal::Count(2));
    }

    #[test]
    fn test_default_is_idle() {
        assert!(!LoadingSignal::default().is_active(true));
    }
}
