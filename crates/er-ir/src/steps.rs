//! Pattern and sequence step storage.
//!
//! A [`Pattern`] is the loop a player authors; a [`Sequence`] is that loop
//! tiled or truncated to the length the sequencer is currently playing.
//! Both live in fixed-capacity storage so nothing here touches the heap.

use arrayvec::ArrayVec;
use core::fmt;

use crate::error::{Bound, SeqError};

/// Step capacity of every pattern and sequence.
pub const MAX_STEPS: usize = 64;

/// Fixed-capacity hit flags.
pub type Steps = ArrayVec<bool, MAX_STEPS>;

/// Validate a length against `[1, max]`, returning it as a `u8`.
pub fn check_length(what: Bound, len: usize, max: usize) -> Result<u8, SeqError> {
    if len == 0 || len > max {
        return Err(SeqError::OutOfRange { what, value: len, min: 1, max });
    }
    Ok(len as u8)
}

fn fmt_steps(steps: &[bool], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for &hit in steps {
        f.write_str(if hit { "x" } else { "." })?;
    }
    Ok(())
}

/// The authored loop of hit / no-hit flags for one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    steps: Steps,
}

impl Pattern {
    /// The single silent step every channel starts with.
    pub fn empty() -> Self {
        let mut steps = Steps::new();
        steps.push(false);
        Self { steps }
    }

    /// Build a pattern from every flag in `steps`.
    pub fn new(steps: &[bool]) -> Result<Self, SeqError> {
        check_length(Bound::PatternLength, steps.len(), MAX_STEPS)?;
        Ok(Self { steps: steps.iter().copied().collect() })
    }

    /// Build a pattern from the first `len` flags of `steps`.
    ///
    /// Fails if `len` is zero, above [`MAX_STEPS`], or longer than `steps`.
    pub fn from_prefix(steps: &[bool], len: u8) -> Result<Self, SeqError> {
        let len = check_length(Bound::PatternLength, len as usize, MAX_STEPS)? as usize;
        if len > steps.len() {
            return Err(SeqError::OutOfRange {
                what: Bound::PatternLength,
                value: len,
                min: 1,
                max: steps.len(),
            });
        }
        Self::new(&steps[..len])
    }

    /// Number of authored steps (always at least 1).
    pub fn len(&self) -> u8 {
        self.steps.len() as u8
    }

    /// Patterns are never empty; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.steps.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.steps
    }

    /// Flip one step, returning its new value.
    pub fn toggle(&mut self, index: u8) -> Result<bool, SeqError> {
        let len = self.steps.len();
        let step = self.steps.get_mut(index as usize).ok_or(SeqError::OutOfRange {
            what: Bound::Step,
            value: index as usize,
            min: 0,
            max: len - 1,
        })?;
        *step = !*step;
        Ok(*step)
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_steps(&self.steps, f)
    }
}

/// A pattern normalized to the playing length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sequence {
    steps: Steps,
}

impl Sequence {
    /// Expand `pattern` to `len` steps.
    ///
    /// A pattern shorter than `len` is tiled (`seq[i] = pat[i % pat_len]`);
    /// otherwise it is truncated to its first `len` steps.
    pub fn expand(pattern: &Pattern, len: u8) -> Result<Self, SeqError> {
        let len = check_length(Bound::SequenceLength, len as usize, MAX_STEPS)? as usize;
        let pat = pattern.as_slice();
        let steps = if pat.len() < len {
            (0..len).map(|i| pat[i % pat.len()]).collect()
        } else {
            pat[..len].iter().copied().collect()
        };
        Ok(Self { steps })
    }

    pub fn len(&self) -> u8 {
        self.steps.len() as u8
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.steps.get(index).copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.steps.iter().copied()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_steps(&self.steps, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn short_pattern_is_tiled() {
        let pat = Pattern::new(&bits("101")).unwrap();
        let seq = Sequence::expand(&pat, 16).unwrap();
        assert_eq!(seq.as_slice(), bits("1011011011011011").as_slice());
        assert_eq!(seq.get(15), Some(true));
    }

    #[test]
    fn long_pattern_is_truncated() {
        let pat = Pattern::new(&bits("10110010")).unwrap();
        let seq = Sequence::expand(&pat, 4).unwrap();
        assert_eq!(seq.as_slice(), bits("1011").as_slice());
        // The tail stays in the pattern
        assert_eq!(pat.len(), 8);
    }

    #[test]
    fn equal_lengths_copy_the_pattern() {
        let pat = Pattern::new(&bits("1001")).unwrap();
        let seq = Sequence::expand(&pat, 4).unwrap();
        assert_eq!(seq.as_slice(), pat.as_slice());
    }

    #[test]
    fn expansion_rule_holds_for_all_lengths() {
        let pat = Pattern::new(&bits("1101001")).unwrap();
        for len in 1..=MAX_STEPS as u8 {
            let seq = Sequence::expand(&pat, len).unwrap();
            assert_eq!(seq.len(), len);
            for i in 0..len as usize {
                let expected = if (pat.len() as usize) < len as usize {
                    pat.as_slice()[i % pat.len() as usize]
                } else {
                    pat.as_slice()[i]
                };
                assert_eq!(seq.get(i), Some(expected), "len {} index {}", len, i);
            }
        }
    }

    #[test]
    fn zero_or_oversized_lengths_are_rejected() {
        let pat = Pattern::empty();
        assert!(matches!(
            Sequence::expand(&pat, 0),
            Err(SeqError::OutOfRange { what: Bound::SequenceLength, value: 0, .. })
        ));
        assert!(Sequence::expand(&pat, MAX_STEPS as u8 + 1).is_err());
        assert!(Pattern::new(&[]).is_err());
        assert!(Pattern::new(&[true; MAX_STEPS + 1]).is_err());
    }

    #[test]
    fn prefix_longer_than_slice_is_rejected() {
        assert!(Pattern::from_prefix(&bits("10"), 3).is_err());
        let pat = Pattern::from_prefix(&bits("1100"), 2).unwrap();
        assert_eq!(pat.as_slice(), bits("11").as_slice());
    }

    #[test]
    fn toggle_flips_one_step() {
        let mut pat = Pattern::new(&bits("100")).unwrap();
        assert_eq!(pat.toggle(1), Ok(true));
        assert_eq!(pat.as_slice(), bits("110").as_slice());
        assert!(pat.toggle(3).is_err());
        assert_eq!(pat.as_slice(), bits("110").as_slice());
    }

    #[test]
    fn display_uses_grid_glyphs() {
        let pat = Pattern::new(&bits("1010")).unwrap();
        assert_eq!(pat.to_string(), "x.x.");
    }
}
