//! Per-beat transcript entries.

use core::fmt;

/// What happened on one beat, as seen by the sequencer's handlers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BeatRecord {
    pub beat: u32,
    pub sequence_length: u8,
    /// Playhead of each channel after the step
    pub positions: Vec<u8>,
    /// Whether each channel fired
    pub triggers: Vec<bool>,
}

impl BeatRecord {
    /// Number of channels that fired.
    pub fn hits(&self) -> usize {
        self.triggers.iter().filter(|t| **t).count()
    }
}

impl fmt::Display for BeatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5} |", self.beat)?;
        for (pos, fired) in self.positions.iter().zip(&self.triggers) {
            write!(f, " {:02}{}", pos, if *fired { '*' } else { ' ' })?;
        }
        Ok(())
    }
}
