//! Multi-channel sequencer.
//!
//! Owns one [`Clock`] and up to [`MAX_CHANNELS`] [`Channel`]s. Every beat
//! advances all channels, then reports the post-step state to the beat
//! handler followed by the trigger handler.

use alloc::boxed::Box;
use er_ir::{check_length, Bound, Control, Pattern, SeqError, Sequence, Tempo, DEFAULT_TEMPO, MAX_STEPS};

use crate::channel::Channel;
use crate::clock::Clock;
use crate::handler::Handler;

/// Most channels a sequencer can own.
pub const MAX_CHANNELS: usize = 16;

/// Sequence length channels start with.
pub const DEFAULT_SEQ_LENGTH: u8 = 16;

/// Callback receiving the full post-step state of a beat.
pub type BeatFn = dyn FnMut(&BeatInfo<'_>);

/// Callback receiving one fire / no-fire flag per channel.
pub type TriggerFn = dyn FnMut(&[bool]);

/// Construction parameters for a [`Sequencer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequencerConfig {
    /// Number of channels (1 to [`MAX_CHANNELS`])
    pub channels: usize,
    /// Initial sequence length of every channel
    pub seq_length: u8,
    /// Ceiling for any sequence length (1 to [`MAX_STEPS`])
    pub max_seq_length: u8,
    /// Initial tempo in bpm
    pub tempo: u16,
}

impl SequencerConfig {
    pub fn with_channels(channels: usize) -> Self {
        Self { channels, ..Self::default() }
    }

    /// Check every field, returning the validated tempo.
    pub fn validate(&self) -> Result<Tempo, SeqError> {
        check_length(Bound::ChannelCount, self.channels, MAX_CHANNELS)?;
        let max = check_length(Bound::MaxSequenceLength, self.max_seq_length as usize, MAX_STEPS)?;
        check_length(Bound::SequenceLength, self.seq_length as usize, max as usize)?;
        Tempo::new(self.tempo)
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            channels: 4,
            seq_length: DEFAULT_SEQ_LENGTH,
            max_seq_length: MAX_STEPS as u8,
            tempo: DEFAULT_TEMPO,
        }
    }
}

/// Snapshot handed to the beat handler.
///
/// All slices are indexed by channel and reflect the state after every
/// channel has stepped.
#[derive(Clone, Copy, Debug)]
pub struct BeatInfo<'a> {
    pub positions: &'a [u8],
    pub sequences: &'a [Sequence],
    /// Channel 0's sequence length
    pub sequence_length: u8,
    pub beat: u32,
}

impl BeatInfo<'_> {
    pub fn channel_count(&self) -> usize {
        self.positions.len()
    }
}

/// Clock plus channels plus the two outgoing callbacks.
#[derive(Debug)]
pub struct Sequencer {
    clock: Clock,
    channels: heapless::Vec<Channel, MAX_CHANNELS>,
    max_seq_length: u8,
    on_beat: Handler<BeatFn>,
    on_trigger: Handler<TriggerFn>,
    // Per-beat snapshot buffers, refilled in place each step
    triggers: heapless::Vec<bool, MAX_CHANNELS>,
    positions: heapless::Vec<u8, MAX_CHANNELS>,
    sequences: heapless::Vec<Sequence, MAX_CHANNELS>,
}

impl Sequencer {
    /// Build a stopped sequencer. Invalid configuration is refused.
    pub fn new(config: SequencerConfig) -> Result<Self, SeqError> {
        let tempo = config.validate()?;

        let mut channels = heapless::Vec::new();
        for _ in 0..config.channels {
            // Capacity was checked by validate()
            let _ = channels.push(Channel::new(config.seq_length)?);
        }

        log::debug!(
            "sequencer: {} channels, length {}/{}, {} bpm",
            config.channels,
            config.seq_length,
            config.max_seq_length,
            config.tempo
        );

        Ok(Self {
            clock: Clock::with_tempo(tempo),
            channels,
            max_seq_length: config.max_seq_length,
            on_beat: Handler::new(),
            on_trigger: Handler::new(),
            triggers: heapless::Vec::new(),
            positions: heapless::Vec::new(),
            sequences: heapless::Vec::new(),
        })
    }

    // --- Handlers ---

    /// Register the beat handler; replaces any previous one.
    pub fn set_beat_handler(&mut self, handler: impl FnMut(&BeatInfo<'_>) + 'static) {
        self.on_beat.set(Box::new(handler));
    }

    pub fn clear_beat_handler(&mut self) {
        self.on_beat.clear();
    }

    /// Register the trigger handler; replaces any previous one.
    pub fn set_trigger_handler(&mut self, handler: impl FnMut(&[bool]) + 'static) {
        self.on_trigger.set(Box::new(handler));
    }

    pub fn clear_trigger_handler(&mut self) {
        self.on_trigger.clear();
    }

    // --- Transport ---

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn tempo(&self) -> Tempo {
        self.clock.tempo()
    }

    /// Change the tempo; a running clock restarts from beat 0 at `now`.
    pub fn set_tempo(&mut self, bpm: u16, now: u64) -> Result<(), SeqError> {
        self.clock.set_tempo(bpm, now)
    }

    pub fn start(&mut self, now: u64) {
        self.clock.start(now);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Poll the clock and step once for every beat that is due.
    ///
    /// Call on every iteration of the embedding loop. Returns the number of
    /// beats processed.
    pub fn update(&mut self, now: u64) -> u32 {
        let mut fired = 0;
        while let Some(beat) = self.clock.poll(now) {
            self.step(beat);
            fired += 1;
        }
        fired
    }

    /// Advance every channel one step and notify the handlers.
    ///
    /// The beat handler runs first, then the trigger handler; both see the
    /// state after all channels have stepped.
    pub fn step(&mut self, beat: u32) {
        #[cfg(feature = "alloc_check")]
        assert_no_alloc::assert_no_alloc(|| self.advance_channels());
        #[cfg(not(feature = "alloc_check"))]
        self.advance_channels();

        log::trace!("beat {}", beat);

        let sequence_length = self.length();
        if let Some(on_beat) = self.on_beat.get_mut() {
            on_beat(&BeatInfo {
                positions: self.positions.as_slice(),
                sequences: self.sequences.as_slice(),
                sequence_length,
                beat,
            });
        }
        if let Some(on_trigger) = self.on_trigger.get_mut() {
            on_trigger(self.triggers.as_slice());
        }
    }

    fn advance_channels(&mut self) {
        self.triggers.clear();
        self.positions.clear();
        self.sequences.clear();
        // Buffers share the channel list's capacity, so pushes cannot fail
        for channel in self.channels.iter_mut() {
            let _ = self.triggers.push(channel.step());
            let _ = self.positions.push(channel.position());
            let _ = self.sequences.push(channel.sequence().clone());
        }
    }

    // --- Length ---

    /// Sequence length of channel 0.
    ///
    /// Matches every channel as long as lengths only change through
    /// [`set_length`](Self::set_length) and
    /// [`offset_length`](Self::offset_length).
    pub fn length(&self) -> u8 {
        self.channels.first().map_or(1, Channel::sequence_length)
    }

    pub fn max_length(&self) -> u8 {
        self.max_seq_length
    }

    fn check_seq_length(&self, length: u8) -> Result<u8, SeqError> {
        check_length(Bound::SequenceLength, length as usize, self.max_seq_length as usize)
    }

    /// Set every channel's sequence length, keeping their patterns.
    ///
    /// A length outside `[1, max_length]` is rejected before any channel
    /// changes.
    pub fn set_length(&mut self, length: u8) -> Result<(), SeqError> {
        let length = self.check_seq_length(length)?;
        for channel in self.channels.iter_mut() {
            channel.set_sequence_length(length)?;
        }
        log::debug!("sequence length {}", length);
        Ok(())
    }

    /// Grow or shrink the sequence length by `offset`.
    ///
    /// The offset is reduced so the result lands on the nearest boundary of
    /// `[1, max_length]` instead of being rejected. Returns the new length.
    pub fn offset_length(&mut self, offset: i16) -> Result<u8, SeqError> {
        let length = self.length() as i32;
        let max = self.max_seq_length as i32;
        let mut offset = offset as i32;
        if length + offset > max {
            offset = max - length;
        }
        if length + offset < 1 {
            offset = 1 - length;
        }
        let length = (length + offset) as u8;
        self.set_length(length)?;
        Ok(length)
    }

    // --- Channels ---

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Result<&Channel, SeqError> {
        let count = self.channels.len();
        self.channels.get(index).ok_or(SeqError::NoSuchChannel { index, count })
    }

    fn channel_mut(&mut self, index: usize) -> Result<&mut Channel, SeqError> {
        let count = self.channels.len();
        self.channels.get_mut(index).ok_or(SeqError::NoSuchChannel { index, count })
    }

    /// Replace one channel's pattern and sequence length.
    pub fn change_sequence(
        &mut self,
        channel: usize,
        pattern: &[bool],
        pat_length: u8,
        seq_length: u8,
    ) -> Result<&Sequence, SeqError> {
        let seq_length = self.check_seq_length(seq_length)?;
        self.channel_mut(channel)?.change_sequence(pattern, pat_length, seq_length)
    }

    /// Replace one channel's pattern, keeping its sequence length.
    pub fn set_pattern(
        &mut self,
        channel: usize,
        pattern: &[bool],
        pat_length: u8,
    ) -> Result<&Sequence, SeqError> {
        let pattern = Pattern::from_prefix(pattern, pat_length)?;
        self.channel_mut(channel)?.set_pattern(pattern)
    }

    pub fn mute_toggle(&mut self, channel: usize) -> Result<bool, SeqError> {
        Ok(self.channel_mut(channel)?.mute_toggle())
    }

    pub fn toggle_step(&mut self, channel: usize, step: u8) -> Result<bool, SeqError> {
        self.channel_mut(channel)?.toggle_step(step)
    }

    /// Apply a control event from the input layer.
    pub fn apply(&mut self, control: Control, now: u64) -> Result<(), SeqError> {
        match control {
            Control::Start => self.start(now),
            Control::Stop => self.stop(),
            Control::SetTempo(bpm) => self.set_tempo(bpm, now)?,
            Control::NudgeTempo(delta) => {
                // A nudge pinned at a bound keeps the current phase
                let tempo = self.tempo().nudge(delta);
                if tempo != self.tempo() {
                    self.set_tempo(tempo.bpm(), now)?;
                }
            }
            Control::SetLength(length) => self.set_length(length)?,
            Control::OffsetLength(offset) => {
                self.offset_length(offset)?;
            }
            Control::ToggleMute { channel } => {
                self.mute_toggle(channel)?;
            }
            Control::ToggleStep { channel, step } => {
                self.toggle_step(channel, step)?;
            }
            Control::SetPattern { channel, pattern } => {
                self.channel_mut(channel)?.set_pattern(pattern)?;
            }
        }
        Ok(())
    }
}
