//! Tempo and beat period.

use crate::error::SeqError;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: u32 = 60_000;

/// Fastest accepted tempo; keeps the beat period at one millisecond or more.
pub const MAX_TEMPO: u16 = 60_000;

/// Tempo a freshly built clock or sequencer runs at.
pub const DEFAULT_TEMPO: u16 = 120;

/// A validated tempo in beats per minute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tempo(u16);

impl Tempo {
    /// Create a tempo, rejecting 0 and anything above [`MAX_TEMPO`].
    pub const fn new(bpm: u16) -> Result<Self, SeqError> {
        if bpm == 0 || bpm > MAX_TEMPO {
            return Err(SeqError::InvalidTempo(bpm));
        }
        Ok(Self(bpm))
    }

    pub const fn bpm(self) -> u16 {
        self.0
    }

    /// Beat period in whole milliseconds (`60000 / bpm`).
    pub const fn period_ms(self) -> u32 {
        MS_PER_MINUTE / self.0 as u32
    }

    /// Move the tempo by `delta` bpm, saturating at `[1, MAX_TEMPO]`.
    pub fn nudge(self, delta: i16) -> Self {
        let bpm = (self.0 as i32 + delta as i32).clamp(1, MAX_TEMPO as i32);
        Self(bpm as u16)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self(DEFAULT_TEMPO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_from_bpm() {
        assert_eq!(Tempo::new(120).unwrap().period_ms(), 500);
        assert_eq!(Tempo::new(20).unwrap().period_ms(), 3000);
        assert_eq!(Tempo::new(MAX_TEMPO).unwrap().period_ms(), 1);
    }

    #[test]
    fn zero_and_oversized_tempo_rejected() {
        assert_eq!(Tempo::new(0), Err(SeqError::InvalidTempo(0)));
        assert_eq!(Tempo::new(MAX_TEMPO + 1), Err(SeqError::InvalidTempo(MAX_TEMPO + 1)));
    }

    #[test]
    fn nudge_saturates() {
        let t = Tempo::new(3).unwrap();
        assert_eq!(t.nudge(-10).bpm(), 1);
        assert_eq!(t.nudge(7).bpm(), 10);
        assert_eq!(Tempo::new(MAX_TEMPO - 1).unwrap().nudge(i16::MAX).bpm(), MAX_TEMPO);
    }
}
