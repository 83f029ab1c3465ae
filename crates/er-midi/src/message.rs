//! MIDI 1.0 message encoding.

use arrayvec::ArrayVec;
use core::fmt;

/// Timing clock (system real-time).
pub const MIDI_CLOCK: u8 = 0xF8;
/// Start (system real-time).
pub const MIDI_START: u8 = 0xFA;
/// Stop (system real-time).
pub const MIDI_STOP: u8 = 0xFC;
/// Note-on status, low nibble is the channel.
pub const NOTE_ON: u8 = 0x90;

/// Encoded bytes of one message (1 to 3 bytes).
pub type MidiBytes = ArrayVec<u8, 3>;

/// Error type for MIDI encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiError {
    /// Channel above 15
    InvalidChannel(u8),
    /// Note or velocity above 127
    InvalidData(u8),
    /// More notes than sequencer channels
    TooManyNotes(usize),
}

impl fmt::Display for MidiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MidiError::InvalidChannel(ch) => write!(f, "Invalid MIDI channel: {}", ch),
            MidiError::InvalidData(v) => write!(f, "Invalid MIDI data byte: {}", v),
            MidiError::TooManyNotes(n) => write!(f, "Too many notes: {}", n),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MidiError {}

pub(crate) fn check_channel(channel: u8) -> Result<u8, MidiError> {
    if channel > 0x0F {
        return Err(MidiError::InvalidChannel(channel));
    }
    Ok(channel)
}

pub(crate) fn check_data(value: u8) -> Result<u8, MidiError> {
    if value > 0x7F {
        return Err(MidiError::InvalidData(value));
    }
    Ok(value)
}

/// A message the sequencer emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Sent as note-on with velocity 0
    NoteOff { channel: u8, note: u8 },
    TimingClock,
    Start,
    Stop,
}

impl MidiMessage {
    /// Encode to wire bytes, validating channel and data ranges.
    pub fn encode(&self) -> Result<MidiBytes, MidiError> {
        let mut bytes = MidiBytes::new();
        match *self {
            MidiMessage::NoteOn { channel, note, velocity } => {
                bytes.push(NOTE_ON | check_channel(channel)?);
                bytes.push(check_data(note)?);
                bytes.push(check_data(velocity)?);
            }
            MidiMessage::NoteOff { channel, note } => {
                bytes.push(NOTE_ON | check_channel(channel)?);
                bytes.push(check_data(note)?);
                bytes.push(0);
            }
            MidiMessage::TimingClock => bytes.push(MIDI_CLOCK),
            MidiMessage::Start => bytes.push(MIDI_START),
            MidiMessage::Stop => bytes.push(MIDI_STOP),
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_bytes() {
        let msg = MidiMessage::NoteOn { channel: 0, note: 0x1E, velocity: 0x45 };
        assert_eq!(msg.encode().unwrap().as_slice(), &[0x90, 0x1E, 0x45]);
    }

    #[test]
    fn note_off_is_zero_velocity_note_on() {
        let msg = MidiMessage::NoteOff { channel: 9, note: 36 };
        assert_eq!(msg.encode().unwrap().as_slice(), &[0x99, 36, 0]);
    }

    #[test]
    fn real_time_bytes() {
        assert_eq!(MidiMessage::Start.encode().unwrap().as_slice(), &[0xFA]);
        assert_eq!(MidiMessage::Stop.encode().unwrap().as_slice(), &[0xFC]);
        assert_eq!(MidiMessage::TimingClock.encode().unwrap().as_slice(), &[0xF8]);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bad_channel = MidiMessage::NoteOn { channel: 16, note: 60, velocity: 1 };
        assert_eq!(bad_channel.encode(), Err(MidiError::InvalidChannel(16)));
        let bad_note = MidiMessage::NoteOff { channel: 0, note: 128 };
        assert_eq!(bad_note.encode(), Err(MidiError::InvalidData(128)));
    }
}
