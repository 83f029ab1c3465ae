//! Playback engine for the erhythms step sequencer.
//!
//! A [`Clock`] turns polled timestamps into numbered beats, each
//! [`Channel`] walks its sequence one step per beat, and the
//! [`Sequencer`] ties them together and reports every beat to the
//! registered handlers.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod channel;
mod clock;
mod handler;
pub mod sequencer;

pub use channel::Channel;
pub use clock::{Clock, ClockState};
pub use handler::Handler;
pub use sequencer::{BeatInfo, Sequencer, SequencerConfig, DEFAULT_SEQ_LENGTH, MAX_CHANNELS};
