//! Overlay State Machine
//!
//! A single owner for the whole overlay lifecycle:
//!
//! ```text
//!            signal on                 signal off
//!   Off ───────────────────▶ Load ───────────────────▶ Boot
//!    ▲                        ▲                          │
//!    │                        └──────── signal on ───────┤
//!    └──────────────── hide timer (grace + min) ─────────┘
//! ```
//!
//! - **Load**: mask visible, message typed at one character per 300ms.
//!   Once fully typed the cursor blinks.
//! - **Boot**: loading finished; whatever is left of the message is typed
//!   at boost speed while the hide timer counts down.
//! - **Off**: mask hidden, no timers armed, message forgotten.
//!
//! Time is injected: every operation takes `now`, and the host calls
//! [`LoadingMask::advance`] once [`LoadingMask::next_deadline`] has passed.
//! Each timer fires at its own deadline, so a host that polls late sees
//! exactly the state it would have seen polling on time.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{MaskConfig, BLINK_PERIOD, HIDE_GRACE, LOAD_TICK};
use crate::messages::{message_at, MessagePicker, RandomPicker, EASTER_EGG_INDEX};
use crate::reveal::{boost_interval, Revealer};
use crate::signal::LoadingSignal;
use crate::timer::Timer;
use crate::view::{MaskView, Visibility};

/// Phase without its payload, for comparisons and logs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Load,
    Boot,
    Off,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Boot => "boot",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current phase and the timestamps it depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Hidden and idle
    Off,
    /// Loading; `activated_at` is when the signal last turned on
    Load { activated_at: Instant },
    /// Winding down; the mask hides at `hide_at`
    Boot {
        activated_at: Instant,
        hide_at: Instant,
    },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::Off => PhaseKind::Off,
            Self::Load { .. } => PhaseKind::Load,
            Self::Boot { .. } => PhaseKind::Boot,
        }
    }

    pub fn activated_at(&self) -> Option<Instant> {
        match *self {
            Self::Off => None,
            Self::Load { activated_at } | Self::Boot { activated_at, .. } => Some(activated_at),
        }
    }
}

/// Which timer is due; ordering breaks ties between equal deadlines
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Due {
    Reveal,
    Blink,
    Hide,
}

/// The loading overlay
///
/// Owns the phase, the reveal progress and three timer slots (reveal
/// ticker, cursor blink, hide). Every mutation goes through
/// [`set_signal`](Self::set_signal), [`set_config`](Self::set_config),
/// [`advance`](Self::advance) or [`shutdown`](Self::shutdown).
#[derive(Debug)]
pub struct LoadingMask<P = RandomPicker> {
    config: MaskConfig,
    picker: P,
    signal: LoadingSignal,
    phase: Phase,
    revealer: Revealer,
    visible: bool,
    /// Cursor state while blinking; `true` shows the underscore
    blink_on: bool,
    reveal_timer: Timer,
    blink_timer: Timer,
    hide_timer: Timer,
}

impl LoadingMask {
    /// Overlay with random message selection
    pub fn new(config: MaskConfig) -> Self {
        Self::with_picker(config, RandomPicker)
    }
}

impl Default for LoadingMask {
    fn default() -> Self {
        Self::new(MaskConfig::default())
    }
}

impl<P: MessagePicker> LoadingMask<P> {
    /// Overlay with an injected message picker
    pub fn with_picker(config: MaskConfig, picker: P) -> Self {
        Self {
            config,
            picker,
            signal: LoadingSignal::IDLE,
            phase: Phase::Off,
            revealer: Revealer::new(),
            visible: false,
            blink_on: true,
            reveal_timer: Timer::new(),
            blink_timer: Timer::new(),
            hide_timer: Timer::new(),
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Feed a new signal value
    ///
    /// Only edges matter: turning on from Off or Boot enters Load, turning
    /// off from Load enters Boot. Repeating the current state is a no-op,
    /// so `activated_at` only moves on an actual activation.
    ///
    /// Returns `true` if the phase changed.
    pub fn set_signal(&mut self, signal: impl Into<LoadingSignal>, now: Instant) -> bool {
        self.signal = signal.into();
        self.sync_activity(now)
    }

    /// Swap the configuration
    ///
    /// Re-supplying an equal config changes nothing. The Load ticker runs
    /// at a fixed pace and is never restarted here; the Boot ticker is
    /// re-armed only when the effective boost budget changes. A pending
    /// hide deadline is kept as scheduled, and the selected message stays
    /// until the cycle ends.
    pub fn set_config(&mut self, config: MaskConfig, now: Instant) {
        if config == self.config {
            return;
        }
        let old_boost = self.config.timing().boost_duration;
        self.config = config;
        if self.sync_activity(now) {
            return;
        }
        let boost_changed = self.config.timing().boost_duration != old_boost;
        if matches!(self.phase, Phase::Boot { .. }) && boost_changed {
            self.arm_reveal(now);
        }
    }

    /// Fire every timer whose deadline is at or before `now`
    ///
    /// Returns `true` if anything observable changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(due) = self.next_due(now) {
            match due {
                Due::Reveal => self.on_reveal_tick(),
                Due::Blink => self.on_blink(now),
                Due::Hide => self.on_hide(),
            }
            changed = true;
        }
        changed
    }

    /// Cancel every timer and hide immediately (the overlay is going away)
    pub fn shutdown(&mut self) {
        if self.phase != Phase::Off {
            debug!(from = %self.phase.kind(), "overlay shut down");
        }
        self.enter_off();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Earliest pending timer deadline, if any timer is armed
    pub fn next_deadline(&self) -> Option<Instant> {
        [&self.reveal_timer, &self.blink_timer, &self.hide_timer]
            .into_iter()
            .filter_map(Timer::deadline)
            .min()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn signal(&self) -> LoadingSignal {
        self.signal
    }

    /// The signal as interpreted under the current queue mode
    pub fn is_active(&self) -> bool {
        self.signal.is_active(self.config.queue_mode)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// When the signal last turned on, while Load or Boot
    pub fn activated_at(&self) -> Option<Instant> {
        self.phase.activated_at()
    }

    /// Characters revealed so far
    pub fn revealed(&self) -> usize {
        self.revealer.revealed()
    }

    /// Index of the message being revealed, if a cycle is in progress
    pub fn selected_index(&self) -> Option<usize> {
        self.revealer.index()
    }

    /// Full text of the message being revealed
    pub fn selected_message(&self) -> &str {
        self.revealer.message()
    }

    /// Current reveal tick period, if the reveal ticker is armed
    pub fn reveal_interval(&self) -> Option<Duration> {
        self.reveal_timer.period()
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Snapshot for rendering
    pub fn view(&self) -> MaskView {
        let safe = self.config.safe_mode;
        let cursor = match self.phase {
            _ if safe => None,
            Phase::Off => None,
            Phase::Load { .. } if self.revealer.is_done() => {
                Some(if self.blink_on { '_' } else { ' ' })
            }
            Phase::Load { .. } | Phase::Boot { .. } => Some('_'),
        };

        MaskView {
            phase: self.phase.kind(),
            visibility: Visibility::from_visible(self.visible),
            background: self.config.background_color.clone(),
            fragment: if safe {
                String::new()
            } else {
                self.revealer.fragment().to_string()
            },
            cursor,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    fn sync_activity(&mut self, now: Instant) -> bool {
        let active = self.is_active();
        match (active, self.phase) {
            (true, Phase::Load { .. }) | (false, Phase::Off | Phase::Boot { .. }) => false,
            (true, _) => {
                self.enter_load(now);
                true
            }
            (false, Phase::Load { activated_at }) => {
                self.enter_boot(activated_at, now);
                true
            }
        }
    }

    fn enter_load(&mut self, now: Instant) {
        let from = self.phase.kind();
        self.hide_timer.cancel();

        if self.revealer.index().is_none() {
            self.select_message();
        }

        self.phase = Phase::Load { activated_at: now };
        self.visible = true;
        self.arm_reveal(now);

        debug!(
            from = %from,
            to = %PhaseKind::Load,
            message_index = ?self.revealer.index(),
            revealed = self.revealer.revealed(),
            "overlay transition"
        );
    }

    fn enter_boot(&mut self, activated_at: Instant, now: Instant) {
        let timing = self.config.timing();
        let elapsed = now.saturating_duration_since(activated_at);
        let remaining_min = timing.min_duration.saturating_sub(elapsed);
        let hide_at = now + HIDE_GRACE + remaining_min;

        self.phase = Phase::Boot {
            activated_at,
            hide_at,
        };
        self.hide_timer.arm_once(hide_at);
        self.blink_timer.cancel();
        self.arm_reveal(now);

        debug!(
            from = %PhaseKind::Load,
            to = %PhaseKind::Boot,
            elapsed_ms = elapsed.as_millis() as u64,
            hide_in_ms = (HIDE_GRACE + remaining_min).as_millis() as u64,
            remaining_chars = self.revealer.remaining(),
            "overlay transition"
        );
    }

    fn enter_off(&mut self) {
        self.reveal_timer.cancel();
        self.blink_timer.cancel();
        self.hide_timer.cancel();
        self.revealer.clear();
        self.phase = Phase::Off;
        self.visible = false;
        self.blink_on = true;
    }

    fn select_message(&mut self) {
        let len = self.config.messages.len();
        let index = if self.config.easter_egg {
            if EASTER_EGG_INDEX >= len {
                warn!(
                    index = EASTER_EGG_INDEX,
                    pool = len,
                    "easter-egg message missing from pool, showing empty message"
                );
            }
            EASTER_EGG_INDEX
        } else {
            self.picker.pick(len)
        };

        let message = message_at(&self.config.messages, index);
        self.revealer.select(index, message);
    }

    /// Arm the reveal ticker (or the blink) for the current phase
    fn arm_reveal(&mut self, now: Instant) {
        match self.phase {
            Phase::Load { .. } if self.revealer.is_done() => {
                self.reveal_timer.cancel();
                if !self.blink_timer.is_armed() {
                    self.start_blink(now);
                }
            }
            Phase::Load { .. } => {
                self.blink_timer.cancel();
                self.reveal_timer.arm_periodic(now, LOAD_TICK);
            }
            Phase::Boot { .. } => {
                let remaining = self.revealer.remaining();
                if remaining == 0 {
                    self.reveal_timer.cancel();
                } else {
                    let boost = self.config.timing().boost_duration;
                    self.reveal_timer
                        .arm_periodic(now, boost_interval(boost, remaining));
                }
            }
            Phase::Off => self.reveal_timer.cancel(),
        }
    }

    fn start_blink(&mut self, at: Instant) {
        self.blink_on = true;
        self.blink_timer.arm_periodic(at, BLINK_PERIOD);
    }

    // ========================================================================
    // Timer callbacks
    // ========================================================================

    fn next_due(&self, now: Instant) -> Option<Due> {
        [
            (Due::Reveal, &self.reveal_timer),
            (Due::Blink, &self.blink_timer),
            (Due::Hide, &self.hide_timer),
        ]
        .into_iter()
        .filter_map(|(due, timer)| {
            timer
                .deadline()
                .filter(|deadline| *deadline <= now)
                .map(|deadline| (deadline, due))
        })
        .min()
        .map(|(_, due)| due)
    }

    fn on_reveal_tick(&mut self) {
        let Some(at) = self.reveal_timer.fire() else {
            return;
        };
        self.revealer.advance();
        trace!(
            phase = %self.phase.kind(),
            revealed = self.revealer.revealed(),
            total = self.revealer.len(),
            "reveal tick"
        );

        if self.revealer.is_done() {
            self.reveal_timer.cancel();
            if matches!(self.phase, Phase::Load { .. }) {
                self.start_blink(at);
            }
        }
    }

    fn on_blink(&mut self, now: Instant) {
        // Toggles missed by a late host collapse into their parity
        if self.blink_timer.fire_through(now) % 2 == 1 {
            self.blink_on = !self.blink_on;
        }
    }

    fn on_hide(&mut self) {
        self.hide_timer.fire();
        debug!(from = %PhaseKind::Boot, to = %PhaseKind::Off, "overlay transition");
        self.enter_off();
    }
}
