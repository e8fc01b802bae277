//! Text Revealer
//!
//! Tracks which message is on screen and how much of it has been "typed"
//! so far. Counting is per Unicode scalar value, so a CJK or emoji message
//! reveals one glyph per tick instead of one byte.

use std::time::Duration;

/// Smallest boot-phase tick; very long messages with a short boost budget
/// reveal one character per millisecond instead of spinning.
const MIN_REVEAL_TICK: Duration = Duration::from_millis(1);

/// Progress through the selected message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Revealer {
    /// Index into the message pool, `None` until a cycle selects one
    index: Option<usize>,
    /// Text of the selected message (captured at selection time)
    message: String,
    /// Message length in chars
    total: usize,
    /// Chars revealed so far, always `<= total`
    revealed: usize,
}

impl Revealer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start revealing a new message from the first character
    pub fn select(&mut self, index: usize, message: &str) {
        self.index = Some(index);
        self.message = message.to_string();
        self.total = message.chars().count();
        self.revealed = 0;
    }

    /// Forget the message entirely, ready for the next cycle
    pub fn clear(&mut self) {
        self.index = None;
        self.message.clear();
        self.total = 0;
        self.revealed = 0;
    }

    /// Reveal one more character. Returns `false` if already complete.
    pub fn advance(&mut self) -> bool {
        if self.revealed < self.total {
            self.revealed += 1;
            true
        } else {
            false
        }
    }

    /// Index of the selected message, if any
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Full text of the selected message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Message length in chars
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn remaining(&self) -> usize {
        self.total - self.revealed
    }

    pub fn is_done(&self) -> bool {
        self.revealed >= self.total
    }

    /// The revealed prefix
    pub fn fragment(&self) -> &str {
        match self.message.char_indices().nth(self.revealed) {
            Some((byte_idx, _)) => &self.message[..byte_idx],
            None => &self.message,
        }
    }
}

/// Per-character interval that spreads `remaining` characters evenly over
/// the boost budget
///
/// With nothing left to reveal the whole budget is returned; no tick will
/// fire in that case, so the value only matters for reporting.
pub fn boost_interval(boost: Duration, remaining: usize) -> Duration {
    if remaining == 0 {
        return boost;
    }
    let divisor = u32::try_from(remaining).unwrap_or(u32::MAX);
    (boost / divisor).max(MIN_REVEAL_TICK)
}
