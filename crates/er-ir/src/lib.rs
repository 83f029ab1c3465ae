//! Core data types for the erhythms step sequencer.
//!
//! This crate defines the pattern, sequence and tempo types shared by
//! the engine, the MIDI encoder and the host controller, together with
//! the error type every mutating operation reports through.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod control;
mod error;
mod steps;
mod tempo;

pub use control::Control;
pub use error::{Bound, SeqError};
pub use steps::{check_length, Pattern, Sequence, Steps, MAX_STEPS};
pub use tempo::{Tempo, DEFAULT_TEMPO, MAX_TEMPO, MS_PER_MINUTE};
