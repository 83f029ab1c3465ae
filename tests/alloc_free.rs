//! Allocation-free beat path tests.
//!
//! Handlers are registered up front (boxing them allocates); after that,
//! polling, stepping and live edits must not touch the heap, so the same
//! loop can run on a target without an allocator.
//!
//! Just run `cargo test`. Build with `--features alloc_check` to also
//! guard the channel advance inside the engine itself.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use er_engine::{Sequencer, SequencerConfig, MAX_CHANNELS};
use er_ir::{Control, Pattern};
use std::cell::Cell;
use std::rc::Rc;

/// A full sequencer whose handlers only bump counters.
fn counting_sequencer(channels: usize) -> (Sequencer, Rc<Cell<u32>>, Rc<Cell<u32>>) {
    let mut seq = Sequencer::new(SequencerConfig::with_channels(channels)).unwrap();
    for ch in 0..channels {
        let pattern: Vec<bool> = (0..=ch).map(|i| i == 0).collect();
        seq.change_sequence(ch, &pattern, pattern.len() as u8, 16).unwrap();
    }

    let beats = Rc::new(Cell::new(0));
    let hits = Rc::new(Cell::new(0));
    let b = beats.clone();
    seq.set_beat_handler(move |_| b.set(b.get() + 1));
    let h = hits.clone();
    seq.set_trigger_handler(move |triggers| {
        h.set(h.get() + triggers.iter().filter(|t| **t).count() as u32)
    });
    (seq, beats, hits)
}

#[test]
fn update_loop_alloc_free() {
    let (mut seq, beats, hits) = counting_sequencer(MAX_CHANNELS);
    seq.start(0);

    assert_no_alloc(|| {
        // 60 seconds of 1 ms polling at 120 bpm
        for now in 0..=60_000u64 {
            seq.update(now);
        }
    });

    assert_eq!(beats.get(), 120);
    assert!(hits.get() > 0);
}

#[test]
fn late_polls_alloc_free() {
    let (mut seq, beats, _) = counting_sequencer(4);
    seq.start(0);

    assert_no_alloc(|| {
        // Sparse polling drains several beats per call
        for now in (0..=10_200u64).step_by(1700) {
            seq.update(now);
        }
    });

    assert_eq!(beats.get(), 20);
}

#[test]
fn live_edits_alloc_free() {
    let (mut seq, beats, _) = counting_sequencer(8);
    let accent = Pattern::new(&[true, false, false, true]).unwrap();
    seq.start(0);

    assert_no_alloc(|| {
        for now in 0..=20_000u64 {
            match now {
                2_000 => seq.apply(Control::SetLength(12), now).unwrap(),
                4_000 => seq.apply(Control::OffsetLength(-4), now).unwrap(),
                6_000 => seq.apply(Control::ToggleStep { channel: 1, step: 1 }, now).unwrap(),
                8_000 => seq.apply(Control::ToggleMute { channel: 0 }, now).unwrap(),
                10_000 => seq
                    .apply(Control::SetPattern { channel: 2, pattern: accent.clone() }, now)
                    .unwrap(),
                12_000 => seq.apply(Control::NudgeTempo(60), now).unwrap(),
                _ => {}
            }
            seq.update(now);
        }
    });

    assert_eq!(seq.length(), 8);
    assert_eq!(seq.tempo().bpm(), 180);
    assert!(beats.get() > 0);
}
