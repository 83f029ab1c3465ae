//! MIDI byte output for the host controller.

use er_midi::{MidiMessage, TriggerMap};
use std::io::{self, Write};

/// A writer receiving encoded MIDI plus the mapping that feeds it.
pub struct MidiSink {
    writer: Box<dyn Write>,
    map: TriggerMap,
    bytes_written: usize,
}

impl MidiSink {
    pub fn new(writer: Box<dyn Write>, map: TriggerMap) -> Self {
        Self { writer, map, bytes_written: 0 }
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Encode and write one message. Unencodable messages are skipped.
    pub fn send(&mut self, msg: MidiMessage) -> io::Result<()> {
        let bytes = match msg.encode() {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("dropping MIDI message {:?}: {}", msg, e);
                return Ok(());
            }
        };
        self.writer.write_all(&bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }

    /// Release last beat's notes and start the ones for `triggers`.
    pub fn send_triggers(&mut self, triggers: &[bool]) -> io::Result<()> {
        for msg in self.map.note_messages(triggers) {
            self.send(msg)?;
        }
        Ok(())
    }

    pub fn send_start(&mut self) -> io::Result<()> {
        self.send(MidiMessage::Start)?;
        self.writer.flush()
    }

    /// Release every held note, then send Stop.
    pub fn send_stop(&mut self) -> io::Result<()> {
        for msg in self.map.release_all() {
            self.send(msg)?;
        }
        self.send(MidiMessage::Stop)?;
        self.writer.flush()
    }
}

impl std::fmt::Debug for MidiSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiSink")
            .field("map", &self.map)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}
