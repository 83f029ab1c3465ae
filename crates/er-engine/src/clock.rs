//! Periodic beat clock.
//!
//! The clock never reads time itself: the embedding loop passes a
//! monotonic millisecond timestamp to [`Clock::poll`] on every iteration
//! and the clock fires once for each period that has elapsed.

use alloc::boxed::Box;
use er_ir::{SeqError, Tempo};

use crate::handler::Handler;

/// Scheduling state of a [`Clock`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockState {
    /// No deadline armed.
    #[default]
    Stopped,
    /// Next beat fires once `now >= deadline`.
    Running { deadline: u64 },
}

/// Beat scheduler driven by polling.
#[derive(Debug)]
pub struct Clock {
    tempo: Tempo,
    /// Beats fired since the last start
    beat: u32,
    state: ClockState,
    handler: Handler<dyn FnMut(u32)>,
}

impl Clock {
    /// Create a stopped clock at `bpm`.
    pub fn new(bpm: u16) -> Result<Self, SeqError> {
        Ok(Self::with_tempo(Tempo::new(bpm)?))
    }

    pub fn with_tempo(tempo: Tempo) -> Self {
        Self {
            tempo,
            beat: 0,
            state: ClockState::Stopped,
            handler: Handler::new(),
        }
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn period_ms(&self) -> u32 {
        self.tempo.period_ms()
    }

    /// Index of the last beat fired (0 before the first beat).
    pub fn beat(&self) -> u32 {
        self.beat
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    /// Register the beat callback; replaces any previous one.
    pub fn set_beat_handler(&mut self, handler: impl FnMut(u32) + 'static) {
        self.handler.set(Box::new(handler));
    }

    pub fn clear_beat_handler(&mut self) {
        self.handler.clear();
    }

    /// Arm the first deadline one period after `now`.
    ///
    /// Starting a running clock restarts it from beat 0.
    pub fn start(&mut self, now: u64) {
        if self.is_running() {
            self.stop();
        }
        let deadline = now + self.period_ms() as u64;
        self.state = ClockState::Running { deadline };
        log::debug!("clock started at {} bpm ({} ms)", self.tempo.bpm(), self.period_ms());
    }

    /// Cancel the deadline and reset the beat counter. No-op when stopped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = ClockState::Stopped;
        self.beat = 0;
        log::debug!("clock stopped");
    }

    /// Change the tempo.
    ///
    /// A running clock is restarted at `now`: the beat counter goes back to
    /// 0 and the next beat fires one new period later. A stopped clock only
    /// stores the tempo.
    pub fn set_tempo(&mut self, bpm: u16, now: u64) -> Result<(), SeqError> {
        self.tempo = Tempo::new(bpm)?;
        if self.is_running() {
            self.stop();
            self.start(now);
        }
        Ok(())
    }

    /// Fire the next beat if its deadline has passed.
    ///
    /// Returns the index of the beat fired. At most one beat fires per call;
    /// the following deadline stays on the period grid, so a late poll is
    /// caught up by polling again.
    pub fn poll(&mut self, now: u64) -> Option<u32> {
        let ClockState::Running { deadline } = self.state else {
            return None;
        };
        if now < deadline {
            return None;
        }
        self.beat = self.beat.wrapping_add(1);
        self.state = ClockState::Running {
            deadline: deadline + self.period_ms() as u64,
        };
        if let Some(handler) = self.handler.get_mut() {
            handler(self.beat);
        }
        Some(self.beat)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::with_tempo(Tempo::default())
    }
}
