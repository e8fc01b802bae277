//! Memeload Core - Headless Loading Overlay
//!
//! This crate owns everything about the loading mask except drawing it:
//! deciding when it is visible, which quip it shows, and how much of that
//! quip has been "typed" so far. Surfaces (the ratatui TUI, a web bridge,
//! a test harness) feed it a signal and render the [`MaskView`] it hands
//! back.
//!
//! # Architecture
//!
//! ```text
//!   LoadingSignal ──▶ is_active(queue_mode)
//!                          │
//!                          ▼
//!                  ┌───────────────┐   timers   ┌──────────┐
//!                  │  LoadingMask  │◀──────────▶│  Timer×3 │
//!                  │ Load/Boot/Off │            └──────────┘
//!                  └───────┬───────┘
//!                          │ Revealer (chars typed so far)
//!                          ▼
//!                      MaskView ──▶ surface
//! ```
//!
//! - [`LoadingMask`]: the state machine; time is passed in, nothing sleeps
//! - [`MaskDriver`]: runs a `LoadingMask` on tokio and publishes views
//! - [`MaskConfig`]: options, TOML/env loading, safe-mode normalization
//! - [`MessagePicker`]: injectable message selection
//!
//! # Quick Start
//!
//! ```
//! use std::time::{Duration, Instant};
//! use memeload_core::{FixedPicker, LoadingMask, MaskConfig, PhaseKind};
//!
//! let config = MaskConfig::default().with_messages(["ABC"]);
//! let mut mask = LoadingMask::with_picker(config, FixedPicker(0));
//!
//! let t0 = Instant::now();
//! mask.set_signal(true, t0);
//! mask.advance(t0 + Duration::from_millis(900));
//! assert_eq!(mask.view().display_text(), "ABC_");
//!
//! mask.set_signal(false, t0 + Duration::from_millis(900));
//! mask.advance(t0 + Duration::from_millis(1900));
//! assert_eq!(mask.phase_kind(), PhaseKind::Off);
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod machine;
pub mod messages;
pub mod reveal;
pub mod signal;
pub mod timer;
pub mod view;

pub use config::{MaskConfig, Timing};
pub use driver::{LoadGuard, MaskDriver, MaskHandle};
pub use error::{ConfigError, MaskError};
pub use machine::{LoadingMask, Phase, PhaseKind};
pub use messages::{
    FixedPicker, MessagePicker, RandomPicker, SequencePicker, DEFAULT_MESSAGES, EASTER_EGG_INDEX,
};
pub use reveal::Revealer;
pub use signal::LoadingSignal;
pub use timer::Timer;
pub use view::{MaskView, Visibility};
