//! Mapping from sequencer channels to MIDI notes.

use er_engine::MAX_CHANNELS;

use crate::message::{check_channel, check_data, MidiError, MidiMessage};

/// Velocity of every note-on unless overridden.
pub const DEFAULT_VELOCITY: u8 = 0x45;

/// General MIDI percussion channel (channel 10, zero-based).
pub const GM_DRUM_CHANNEL: u8 = 9;

/// General MIDI percussion notes, one per sequencer channel.
pub const GM_DRUM_NOTES: [u8; MAX_CHANNELS] = [
    36, // bass drum
    38, // snare
    42, // closed hi-hat
    46, // open hi-hat
    39, // hand clap
    45, // low tom
    48, // high tom
    49, // crash
    51, // ride
    37, // side stick
    56, // cowbell
    54, // tambourine
    70, // maracas
    75, // claves
    60, // hi bongo
    61, // low bongo
];

/// Messages produced for one beat: at most a note-off and a note-on per
/// channel.
pub type MessageBatch = heapless::Vec<MidiMessage, { 2 * MAX_CHANNELS }>;

/// Turns per-channel triggers into note messages.
///
/// Notes are released on the following beat, so each trigger sounds for
/// exactly one beat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerMap {
    channel: u8,
    velocity: u8,
    notes: heapless::Vec<u8, MAX_CHANNELS>,
    /// Bit per sequencer channel whose note is still held
    sounding: u16,
}

impl TriggerMap {
    /// Map sequencer channel `i` to `notes[i]` on MIDI `channel`.
    pub fn new(channel: u8, notes: &[u8]) -> Result<Self, MidiError> {
        check_channel(channel)?;
        if notes.len() > MAX_CHANNELS {
            return Err(MidiError::TooManyNotes(notes.len()));
        }
        let mut mapped = heapless::Vec::new();
        for &note in notes {
            let _ = mapped.push(check_data(note)?);
        }
        Ok(Self {
            channel,
            velocity: DEFAULT_VELOCITY,
            notes: mapped,
            sounding: 0,
        })
    }

    /// The General MIDI drum kit on channel 10.
    pub fn drums() -> Self {
        Self {
            channel: GM_DRUM_CHANNEL,
            velocity: DEFAULT_VELOCITY,
            notes: GM_DRUM_NOTES.iter().copied().collect(),
            sounding: 0,
        }
    }

    pub fn with_velocity(mut self, velocity: u8) -> Result<Self, MidiError> {
        self.velocity = check_data(velocity)?;
        Ok(self)
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn note(&self, track: usize) -> Option<u8> {
        self.notes.get(track).copied()
    }

    /// Release the notes of the previous beat, then start a note for every
    /// channel that fires. Channels without a mapped note are ignored.
    pub fn note_messages(&mut self, triggers: &[bool]) -> MessageBatch {
        let mut batch = self.release_all();
        for (track, &fired) in triggers.iter().enumerate() {
            let Some(note) = self.note(track) else { break };
            if fired {
                let _ = batch.push(MidiMessage::NoteOn {
                    channel: self.channel,
                    note,
                    velocity: self.velocity,
                });
                self.sounding |= 1 << track;
            }
        }
        batch
    }

    /// Note-offs for every note still held.
    pub fn release_all(&mut self) -> MessageBatch {
        let mut batch = MessageBatch::new();
        for (track, &note) in self.notes.iter().enumerate() {
            if self.sounding & (1 << track) != 0 {
                let _ = batch.push(MidiMessage::NoteOff { channel: self.channel, note });
            }
        }
        self.sounding = 0;
        batch
    }
}
