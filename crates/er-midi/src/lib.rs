//! MIDI encoding for erhythms trigger output.
//!
//! Turns sequencer triggers into channel-voice messages and encodes them
//! as MIDI 1.0 bytes. Sending the bytes is left to the caller.

#![cfg_attr(not(feature = "std"), no_std)]

mod message;
mod trigger_map;

pub use message::{MidiBytes, MidiError, MidiMessage, MIDI_CLOCK, MIDI_START, MIDI_STOP, NOTE_ON};
pub use trigger_map::{MessageBatch, TriggerMap, DEFAULT_VELOCITY, GM_DRUM_CHANNEL, GM_DRUM_NOTES};
