//! Error type for rejected sequencer operations.

use core::fmt;

/// Which bounded quantity an [`SeqError::OutOfRange`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Number of authored steps in a pattern
    PatternLength,
    /// Number of playable steps in a sequence
    SequenceLength,
    /// Ceiling applied to every channel's sequence length
    MaxSequenceLength,
    /// Number of channels owned by a sequencer
    ChannelCount,
    /// Index of a single pattern step
    Step,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bound::PatternLength => "pattern length",
            Bound::SequenceLength => "sequence length",
            Bound::MaxSequenceLength => "maximum sequence length",
            Bound::ChannelCount => "channel count",
            Bound::Step => "step index",
        };
        f.write_str(name)
    }
}

/// Error type for sequencer operations.
///
/// A call that returns an error has not changed any state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeqError {
    /// Tempo of zero or above [`crate::MAX_TEMPO`]
    InvalidTempo(u16),
    /// A length or index outside `[min, max]`
    OutOfRange {
        what: Bound,
        value: usize,
        min: usize,
        max: usize,
    },
    /// Channel index past the end of the channel list
    NoSuchChannel { index: usize, count: usize },
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeqError::InvalidTempo(bpm) => write!(f, "Invalid tempo: {} bpm", bpm),
            SeqError::OutOfRange { what, value, min, max } => {
                write!(f, "{} {} out of range [{}, {}]", what, value, min, max)
            }
            SeqError::NoSuchChannel { index, count } => {
                write!(f, "No channel {} (sequencer has {})", index, count)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SeqError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn out_of_range_message_names_the_bound() {
        let err = SeqError::OutOfRange {
            what: Bound::SequenceLength,
            value: 80,
            min: 1,
            max: 64,
        };
        assert_eq!(err.to_string(), "sequence length 80 out of range [1, 64]");
    }

    #[test]
    fn invalid_tempo_message() {
        assert_eq!(SeqError::InvalidTempo(0).to_string(), "Invalid tempo: 0 bpm");
    }
}
