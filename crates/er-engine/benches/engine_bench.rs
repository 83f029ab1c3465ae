use criterion::{black_box, criterion_group, criterion_main, Criterion};
use er_engine::{Sequencer, SequencerConfig, MAX_CHANNELS};

fn full_sequencer() -> Sequencer {
    let mut seq = Sequencer::new(SequencerConfig::with_channels(MAX_CHANNELS)).unwrap();
    for ch in 0..MAX_CHANNELS {
        let pattern: Vec<bool> = (0..ch + 3).map(|i| i % 3 == 0).collect();
        seq.change_sequence(ch, &pattern, pattern.len() as u8, 64).unwrap();
    }
    seq
}

fn bench_step(c: &mut Criterion) {
    let mut seq = full_sequencer();
    let mut fired = 0usize;
    seq.set_trigger_handler(move |trigs| {
        fired += trigs.iter().filter(|t| **t).count();
        black_box(fired);
    });

    let mut beat = 0u32;
    c.bench_function("step_16_channels", |b| {
        b.iter(|| {
            beat += 1;
            seq.step(black_box(beat));
        })
    });
}

fn bench_update(c: &mut Criterion) {
    let mut seq = full_sequencer();
    seq.set_tempo(60_000, 0).unwrap();
    seq.start(0);

    let mut now = 0u64;
    c.bench_function("update_every_ms", |b| {
        b.iter(|| {
            now += 1;
            black_box(seq.update(black_box(now)));
        })
    });
}

criterion_group!(benches, bench_step, bench_update);
criterion_main!(benches);
