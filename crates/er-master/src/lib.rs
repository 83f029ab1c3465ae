//! Headless controller for the erhythms step sequencer.
//!
//! Owns a [`Sequencer`], supplies it with wall-clock time, and wires its
//! beat and trigger handlers to a transcript and an optional MIDI writer,
//! so the CLI and tests share one API.

mod midi_out;
mod record;

use er_engine::Sequencer;
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

// Re-export common types so callers don't need er-ir/er-engine directly.
pub use er_engine::SequencerConfig;
pub use er_ir::{Control, Pattern, SeqError};
pub use er_midi::TriggerMap;

pub use midi_out::MidiSink;
pub use record::BeatRecord;

/// Headless sequencer controller.
pub struct Controller {
    sequencer: Sequencer,
    output: Rc<RefCell<Output>>,
    origin: Instant,
}

/// State shared with the sequencer's handlers.
#[derive(Debug, Default)]
struct Output {
    midi: Option<MidiSink>,
    /// Filled by the beat handler, completed by the trigger handler
    pending: Option<BeatRecord>,
    last: Option<BeatRecord>,
    recording: Option<Vec<BeatRecord>>,
}

impl Output {
    fn on_beat(&mut self, record: BeatRecord) {
        self.pending = Some(record);
    }

    fn on_triggers(&mut self, triggers: &[bool]) {
        if let Some(midi) = &mut self.midi {
            if let Err(e) = midi.send_triggers(triggers) {
                log::warn!("MIDI write failed: {}", e);
            }
        }
        let mut record = self.pending.take().unwrap_or_default();
        record.triggers = triggers.to_vec();
        if let Some(recording) = &mut self.recording {
            recording.push(record.clone());
        }
        self.last = Some(record);
    }
}

impl Controller {
    pub fn new(config: SequencerConfig) -> Result<Self, SeqError> {
        let mut sequencer = Sequencer::new(config)?;
        let output = Rc::new(RefCell::new(Output::default()));

        let out = output.clone();
        sequencer.set_beat_handler(move |info| {
            out.borrow_mut().on_beat(BeatRecord {
                beat: info.beat,
                sequence_length: info.sequence_length,
                positions: info.positions.to_vec(),
                triggers: Vec::new(),
            });
        });
        let out = output.clone();
        sequencer.set_trigger_handler(move |triggers| out.borrow_mut().on_triggers(triggers));

        Ok(Self {
            sequencer,
            output,
            origin: Instant::now(),
        })
    }

    // --- Sequencer access ---

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Direct access for edits that don't go through [`Control`].
    ///
    /// Replacing the sequencer's handlers here disconnects MIDI output and
    /// beat recording.
    pub fn sequencer_mut(&mut self) -> &mut Sequencer {
        &mut self.sequencer
    }

    /// Milliseconds since the controller was created.
    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Replace one channel's pattern and sequence length.
    pub fn change_sequence(
        &mut self,
        channel: usize,
        pattern: &[bool],
        pat_length: u8,
        seq_length: u8,
    ) -> Result<(), SeqError> {
        self.sequencer.change_sequence(channel, pattern, pat_length, seq_length)?;
        Ok(())
    }

    /// Apply a control event at the current time.
    pub fn apply(&mut self, control: Control) -> Result<(), SeqError> {
        match control {
            Control::Start => self.start(),
            Control::Stop => self.stop(),
            other => {
                let now = self.now_ms();
                self.sequencer.apply(other, now)?;
            }
        }
        Ok(())
    }

    // --- MIDI ---

    /// Send Start/Stop and one note per trigger to `writer`.
    pub fn attach_midi(&mut self, writer: impl Write + 'static, map: TriggerMap) {
        self.output.borrow_mut().midi = Some(MidiSink::new(Box::new(writer), map));
    }

    /// Bytes written to the attached MIDI writer so far.
    pub fn midi_bytes_written(&self) -> usize {
        self.output.borrow().midi.as_ref().map_or(0, MidiSink::bytes_written)
    }

    // --- Transport ---

    pub fn start(&mut self) {
        let now = self.now_ms();
        self.start_at(now);
    }

    fn start_at(&mut self, now: u64) {
        self.sequencer.start(now);
        if let Some(midi) = &mut self.output.borrow_mut().midi {
            if let Err(e) = midi.send_start() {
                log::warn!("MIDI write failed: {}", e);
            }
        }
    }

    /// Stop the clock and release held notes. No-op when stopped.
    pub fn stop(&mut self) {
        if !self.sequencer.is_running() {
            return;
        }
        self.sequencer.stop();
        if let Some(midi) = &mut self.output.borrow_mut().midi {
            if let Err(e) = midi.send_stop() {
                log::warn!("MIDI write failed: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.sequencer.is_running()
    }

    /// Process every beat due by now. Returns the number of beats.
    pub fn poll(&mut self) -> u32 {
        let now = self.now_ms();
        self.sequencer.update(now)
    }

    /// The most recent beat.
    pub fn last_beat(&self) -> Option<BeatRecord> {
        self.output.borrow().last.clone()
    }

    /// Play in real time for `duration`, calling `on_beat` for every beat.
    ///
    /// Starts the clock if it is stopped and stops it afterwards.
    pub fn run_for(&mut self, duration: Duration, mut on_beat: impl FnMut(&BeatRecord)) {
        if !self.is_running() {
            self.start();
        }
        self.output.borrow_mut().recording = Some(Vec::new());

        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            if self.poll() > 0 {
                let beats = self
                    .output
                    .borrow_mut()
                    .recording
                    .as_mut()
                    .map(std::mem::take)
                    .unwrap_or_default();
                beats.iter().for_each(&mut on_beat);
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        self.output.borrow_mut().recording = None;
        self.stop();
    }

    // --- Offline rendering ---

    /// Play `count` beats on a virtual clock and return their records.
    ///
    /// Runs as fast as possible with the same beat grid as real-time
    /// playback. Channel positions carry over, like any other run.
    pub fn render_beats(&mut self, count: u32) -> Vec<BeatRecord> {
        self.stop();
        self.output.borrow_mut().recording = Some(Vec::new());

        self.start_at(0);
        let period = self.sequencer.clock().period_ms() as u64;
        for n in 1..=count as u64 {
            self.sequencer.update(n * period);
        }
        self.stop();

        log::debug!("rendered {} beats", count);
        self.output.borrow_mut().recording.take().unwrap_or_default()
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("sequencer", &self.sequencer)
            .field("output", &self.output)
            .finish()
    }
}
