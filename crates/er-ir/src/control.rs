//! Control events from the input layer.

use crate::steps::Pattern;

/// A discrete control event applied to a running sequencer.
///
/// Input handling (buttons, pots) lives outside the core; it reports
/// what the player asked for as one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    /// Start the beat clock.
    Start,
    /// Stop the beat clock and reset the beat counter.
    Stop,
    /// Set the tempo in bpm.
    SetTempo(u16),
    /// Move the tempo by a signed amount, saturating at the valid range.
    NudgeTempo(i16),
    /// Set every channel's sequence length.
    SetLength(u8),
    /// Grow or shrink every channel's sequence length, clamped to range.
    OffsetLength(i16),
    /// Flip a channel's mute flag.
    ToggleMute { channel: usize },
    /// Flip one step of a channel's pattern.
    ToggleStep { channel: usize, step: u8 },
    /// Replace a channel's pattern, keeping its sequence length.
    SetPattern { channel: usize, pattern: Pattern },
}
