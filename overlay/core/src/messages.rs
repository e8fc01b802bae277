//! Message Pool
//!
//! The built-in pool of loading quips, plus the pluggable index picker
//! the state machine uses when a fresh cycle needs a message.

use rand::Rng;

/// Index reserved for the easter-egg message
pub const EASTER_EGG_INDEX: usize = 28;

/// Built-in loading quips
///
/// Entry [`EASTER_EGG_INDEX`] is the one true fans get every time.
pub const DEFAULT_MESSAGES: &[&str] = &[
    "Reticulating splines...",
    "Convincing the server it wants to help",
    "Warming up the hamsters",
    "Asking the database nicely",
    "Downloading more RAM",
    "Untangling the cables",
    "Bribing the bits to move faster",
    "Counting to infinity, almost there",
    "Feeding the gremlins after midnight",
    "Turning it off and on again",
    "Dividing by zero, carefully",
    "Compiling excuses",
    "Shuffling the ones and zeroes",
    "Spinning up the flux capacitor",
    "Waking the intern",
    "Rounding up the stray packets",
    "Polishing the pixels",
    "Negotiating with the cache",
    "Buffering the buffer",
    "Herding asynchronous cats",
    "Looking for the any key",
    "Loading the loading screen",
    "Consulting the rubber duck",
    "Checking if it works on my machine",
    "Generating witty loading message",
    "Pretending this is instant",
    "Putting the fun in function call",
    "Adjusting the bandwidth knob",
    "The underscore at the end is not a typo. Probably.",
    "Almost done, for real this time",
];

/// Look up a message, falling back to the empty string when the index is
/// outside the pool.
pub fn message_at<S: AsRef<str>>(messages: &[S], index: usize) -> &str {
    messages.get(index).map_or("", |m| m.as_ref())
}

/// Source of message indices for fresh loading cycles
pub trait MessagePicker {
    /// Pick an index in `[0, len)`; `len` may be zero, in which case any
    /// value is acceptable since the lookup is guarded.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random selection
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPicker;

impl MessagePicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always the same index
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedPicker(pub usize);

impl MessagePicker for FixedPicker {
    fn pick(&mut self, _len: usize) -> usize {
        self.0
    }
}

/// Walks a fixed list of indices, wrapping around at the end
#[derive(Clone, Debug, Default)]
pub struct SequencePicker {
    indices: Vec<usize>,
    next: usize,
}

impl SequencePicker {
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self {
            indices: indices.into(),
            next: 0,
        }
    }
}

impl MessagePicker for SequencePicker {
    fn pick(&mut self, _len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let idx = self.indices[self.next % self.indices.len()];
        self.next = self.next.wrapping_add(1);
        idx
    }
}

impl<P: MessagePicker + ?Sized> MessagePicker for Box<P> {
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Built-in pool as owned strings
pub fn default_messages() -> Vec<String> {
    DEFAULT_MESSAGES.iter().map(|s| (*s).to_string()).collect()
}
