//! Per-track playback state.

use er_ir::{Pattern, SeqError, Sequence};

/// One rhythmic track: a pattern, its expanded sequence, a playhead and a
/// mute flag.
///
/// Every mutating call either applies completely or returns an error and
/// leaves the channel untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pattern: Pattern,
    sequence: Sequence,
    /// Playhead, always `< sequence.len()`
    pos: u8,
    muted: bool,
}

impl Channel {
    /// Create a channel playing the empty one-step pattern over `seq_length`
    /// steps. The playhead starts on the last step so the first
    /// [`step`](Self::step) lands on step 0.
    pub fn new(seq_length: u8) -> Result<Self, SeqError> {
        let pattern = Pattern::empty();
        let sequence = Sequence::expand(&pattern, seq_length)?;
        Ok(Self {
            pattern,
            pos: sequence.len() - 1,
            sequence,
            muted: false,
        })
    }

    /// Replace the pattern with the first `pat_length` flags of `pattern`
    /// and play it over `seq_length` steps.
    pub fn change_sequence(
        &mut self,
        pattern: &[bool],
        pat_length: u8,
        seq_length: u8,
    ) -> Result<&Sequence, SeqError> {
        let pattern = Pattern::from_prefix(pattern, pat_length)?;
        let sequence = Sequence::expand(&pattern, seq_length)?;
        self.pattern = pattern;
        Ok(self.install(sequence))
    }

    /// Replace the pattern, keeping the current sequence length.
    pub fn set_pattern(&mut self, pattern: Pattern) -> Result<&Sequence, SeqError> {
        let sequence = Sequence::expand(&pattern, self.sequence.len())?;
        self.pattern = pattern;
        Ok(self.install(sequence))
    }

    /// Re-expand the current pattern to `seq_length` steps.
    pub fn set_sequence_length(&mut self, seq_length: u8) -> Result<&Sequence, SeqError> {
        let sequence = Sequence::expand(&self.pattern, seq_length)?;
        Ok(self.install(sequence))
    }

    /// Flip one pattern step and re-expand. Returns the step's new value.
    pub fn toggle_step(&mut self, step: u8) -> Result<bool, SeqError> {
        let mut pattern = self.pattern.clone();
        let hit = pattern.toggle(step)?;
        let sequence = Sequence::expand(&pattern, self.sequence.len())?;
        self.pattern = pattern;
        self.install(sequence);
        Ok(hit)
    }

    fn install(&mut self, sequence: Sequence) -> &Sequence {
        self.sequence = sequence;
        // Clamp the playhead into the new length
        if self.pos >= self.sequence.len() {
            self.pos = self.sequence.len() - 1;
        }
        &self.sequence
    }

    /// Move the playhead by `offset` steps, wrapping in both directions.
    pub fn offset_pos(&mut self, offset: i16) -> u8 {
        let len = self.sequence.len() as i32;
        self.pos = (self.pos as i32 + offset as i32).rem_euclid(len) as u8;
        self.pos
    }

    /// Advance one step and report whether the channel fires on it.
    pub fn step(&mut self) -> bool {
        self.offset_pos(1);
        let hit = self.sequence.get(self.pos as usize).unwrap_or(false);
        hit && !self.muted
    }

    /// Flip the mute flag, returning the new value.
    pub fn mute_toggle(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn position(&self) -> u8 {
        self.pos
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn pattern_length(&self) -> u8 {
        self.pattern.len()
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn sequence_length(&self) -> u8 {
        self.sequence.len()
    }
}
