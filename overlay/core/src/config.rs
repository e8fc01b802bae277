//! Overlay Configuration
//!
//! Options the host passes to the overlay. They are read at transition
//! time, so swapping the config mid-cycle takes effect on the next timer
//! that depends on it.
//!
//! Field names accept both snake_case and the short camelCase names used
//! by web hosts (`trueFan`, `memes`, `minDuration`, `safemod`, ...), so the
//! same TOML/JSON blob can drive either surface.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::messages::default_messages;

/// Per-character reveal interval during the load phase
pub const LOAD_TICK: Duration = Duration::from_millis(300);

/// Cursor blink half-period once the message is fully revealed
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);

/// Fixed grace window between deactivation and hiding
pub const HIDE_GRACE: Duration = Duration::from_millis(1000);

/// Floor for the boost duration
pub const MIN_BOOST: Duration = Duration::from_millis(100);

/// Min/boost duration used in safe mode regardless of configuration
pub const SAFE_MODE_DURATION: Duration = Duration::from_millis(100);

/// Default boost duration in seconds
const DEFAULT_BOOST_SECS: f64 = 0.1;

/// Overlay configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Pool of messages to reveal
    #[serde(alias = "memes")]
    pub messages: Vec<String>,

    /// Easter-egg mode: always pick message index 28
    #[serde(alias = "trueFan", alias = "true_fan")]
    pub easter_egg: bool,

    /// Opaque background value handed straight to the surface
    #[serde(alias = "backgroundColor")]
    pub background_color: String,

    /// Minimum visible time in seconds
    #[serde(alias = "minDuration")]
    pub min_duration_secs: f64,

    /// Suppress text and force fast timings
    #[serde(alias = "safemod", alias = "safeMode")]
    pub safe_mode: bool,

    /// Target duration in seconds for revealing the rest of the message
    /// after loading finishes
    #[serde(alias = "boostDuration")]
    pub boost_duration_secs: f64,

    /// Treat the signal as an outstanding-request counter
    #[serde(alias = "queueMode")]
    pub queue_mode: bool,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            messages: default_messages(),
            easter_egg: false,
            background_color: String::new(),
            min_duration_secs: 0.0,
            safe_mode: false,
            boost_duration_secs: DEFAULT_BOOST_SECS,
            queue_mode: false,
        }
    }
}

/// Durations after safe-mode normalization and clamping
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Minimum time the mask stays visible after activation
    pub min_duration: Duration,
    /// Time budget for revealing the remaining characters during boot
    pub boost_duration: Duration,
}

impl MaskConfig {
    /// Replace the message pool
    #[must_use]
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_easter_egg(mut self, enabled: bool) -> Self {
        self.easter_egg = enabled;
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background_color = background.into();
        self
    }

    #[must_use]
    pub fn with_min_duration(mut self, secs: f64) -> Self {
        self.min_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn with_safe_mode(mut self, enabled: bool) -> Self {
        self.safe_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_boost_duration(mut self, secs: f64) -> Self {
        self.boost_duration_secs = secs;
        self
    }

    #[must_use]
    pub fn with_queue_mode(mut self, enabled: bool) -> Self {
        self.queue_mode = enabled;
        self
    }

    /// Effective durations
    ///
    /// Safe mode pins both to [`SAFE_MODE_DURATION`]. Otherwise the minimum
    /// duration is floored at zero and the boost duration at [`MIN_BOOST`];
    /// NaN and infinities fall back to those floors.
    pub fn timing(&self) -> Timing {
        if self.safe_mode {
            return Timing {
                min_duration: SAFE_MODE_DURATION,
                boost_duration: SAFE_MODE_DURATION,
            };
        }

        Timing {
            min_duration: secs_at_least(self.min_duration_secs, Duration::ZERO),
            boost_duration: secs_at_least(self.boost_duration_secs, MIN_BOOST),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `MEMELOAD_QUEUE_MODE`: "1" or "true" to count requests
    /// - `MEMELOAD_TRUE_FAN`: "1" or "true" for easter-egg mode
    /// - `MEMELOAD_SAFE_MODE`: "1" or "true" to suppress text
    /// - `MEMELOAD_MIN_DURATION`: minimum visible time in seconds
    /// - `MEMELOAD_BOOST_DURATION`: boost duration in seconds
    /// - `MEMELOAD_BACKGROUND`: background value passed to the surface
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            messages: defaults.messages,
            easter_egg: env_flag("MEMELOAD_TRUE_FAN").unwrap_or(defaults.easter_egg),
            background_color: std::env::var("MEMELOAD_BACKGROUND")
                .unwrap_or(defaults.background_color),
            min_duration_secs: std::env::var("MEMELOAD_MIN_DURATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_duration_secs),
            safe_mode: env_flag("MEMELOAD_SAFE_MODE").unwrap_or(defaults.safe_mode),
            boost_duration_secs: std::env::var("MEMELOAD_BOOST_DURATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.boost_duration_secs),
            queue_mode: env_flag("MEMELOAD_QUEUE_MODE").unwrap_or(defaults.queue_mode),
        }
    }

    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

fn secs_at_least(secs: f64, floor: Duration) -> Duration {
    if !secs.is_finite() || secs <= 0.0 {
        return floor;
    }
    // Whole microseconds, rounded, so 0.3 means exactly 300ms
    Duration::from_micros((secs * 1_000_000.0).round() as u64).max(floor)
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
