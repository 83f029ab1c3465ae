//! erhythms CLI: play step patterns in the terminal, optionally as MIDI.
//!
//! Usage:
//!   erhythms --pattern 0:x...x... --pattern 1:..x. --tempo 120 --seconds 8
//!   erhythms --pattern 0:x.x --beats 32 --midi out.mid.raw
//!
//! Set RUST_LOG=debug for transport logging.

use er_master::{BeatRecord, Control, Controller, SequencerConfig, TriggerMap};
use std::time::Duration;
use std::{env, fs, process};

const USAGE: &str = "Usage: erhythms [--channels N] [--length N] [--max-length N] [--tempo BPM]
                [--pattern CH:STEPS]... [--mute CH]... [--beats N | --seconds S]
                [--midi FILE]

STEPS uses x or 1 for a hit and . or 0 for a rest, e.g. 0:x..x..x.";

/// Longest offline render; every beat is kept in memory until printed.
const MAX_BEATS: u32 = 1_000_000;

/// Parsed command line.
#[derive(Debug)]
struct Options {
    config: SequencerConfig,
    patterns: Vec<(usize, Vec<bool>)>,
    mutes: Vec<usize>,
    beats: Option<u32>,
    seconds: u64,
    midi: Option<String>,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let opts = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("{}\n\n{}", e, USAGE);
        process::exit(1);
    });

    let mut ctrl = Controller::new(opts.config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1);
    });

    let length = ctrl.sequencer().length();
    for (channel, steps) in &opts.patterns {
        // Oversized patterns saturate and are rejected as out of range
        let pat_length = u8::try_from(steps.len()).unwrap_or(u8::MAX);
        if let Err(e) = ctrl.change_sequence(*channel, steps, pat_length, length) {
            eprintln!("Pattern for channel {}: {}", channel, e);
            process::exit(1);
        }
    }
    for &channel in &opts.mutes {
        if let Err(e) = ctrl.apply(Control::ToggleMute { channel }) {
            eprintln!("Mute: {}", e);
            process::exit(1);
        }
    }

    if let Some(path) = &opts.midi {
        let file = fs::File::create(path).unwrap_or_else(|e| {
            eprintln!("Failed to create {}: {}", path, e);
            process::exit(1);
        });
        ctrl.attach_midi(file, TriggerMap::drums());
    }

    print_header(&ctrl);

    match opts.beats {
        Some(beats) => {
            log::info!("rendering {} beats offline", beats);
            for record in ctrl.render_beats(beats) {
                print_beat(&record);
            }
        }
        None => {
            log::info!("playing for {} s", opts.seconds);
            ctrl.run_for(Duration::from_secs(opts.seconds), print_beat);
        }
    }

    if opts.midi.is_some() {
        println!("Wrote {} MIDI bytes", ctrl.midi_bytes_written());
    }
}

fn print_header(ctrl: &Controller) {
    let seq = ctrl.sequencer();
    println!(
        "Tempo:    {} BPM ({} ms/beat)",
        seq.tempo().bpm(),
        seq.tempo().period_ms()
    );
    println!("Length:   {} (max {})", seq.length(), seq.max_length());
    for (i, ch) in seq.channels().iter().enumerate() {
        println!(
            "Ch {:>2}:    {}{}",
            i,
            ch.sequence(),
            if ch.is_muted() { "  (muted)" } else { "" }
        );
    }
    println!();
}

fn print_beat(record: &BeatRecord) {
    println!("{}", record);
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options {
        config: SequencerConfig::default(),
        patterns: Vec::new(),
        mutes: Vec::new(),
        beats: None,
        seconds: 8,
        midi: None,
    };

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .map(String::as_str)
                .ok_or_else(|| format!("Missing value for {}", flag))
        };
        match flag.as_str() {
            "--channels" => opts.config.channels = parse_number(flag, value()?)?,
            "--length" => opts.config.seq_length = parse_number(flag, value()?)?,
            "--max-length" => opts.config.max_seq_length = parse_number(flag, value()?)?,
            "--tempo" => opts.config.tempo = parse_number(flag, value()?)?,
            "--pattern" => opts.patterns.push(parse_pattern(value()?)?),
            "--mute" => opts.mutes.push(parse_number(flag, value()?)?),
            "--beats" => {
                let beats = parse_number(flag, value()?)?;
                if beats > MAX_BEATS {
                    return Err(format!("--beats must be at most {}, got {}", MAX_BEATS, beats));
                }
                opts.beats = Some(beats);
            }
            "--seconds" => opts.seconds = parse_number(flag, value()?)?,
            "--midi" => opts.midi = Some(value()?.to_string()),
            "-h" | "--help" => return Err("erhythms step sequencer".to_string()),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(opts)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}

/// Parse `CH:STEPS`, e.g. `2:x..x`.
fn parse_pattern(spec: &str) -> Result<(usize, Vec<bool>), String> {
    let (channel, steps) = spec
        .split_once(':')
        .ok_or_else(|| format!("Pattern must look like CH:STEPS, got {}", spec))?;
    let channel = parse_number("--pattern", channel)?;
    let steps = steps
        .chars()
        .map(|c| match c {
            'x' | 'X' | '1' => Ok(true),
            '.' | '-' | '0' => Ok(false),
            other => Err(format!("Invalid step '{}' in {}", other, spec)),
        })
        .collect::<Result<Vec<bool>, String>>()?;
    Ok((channel, steps))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_into_config() {
        let opts = parse_args(&args(&[
            "--channels", "3", "--length", "8", "--tempo", "90", "--pattern", "1:x.x", "--beats", "4",
        ]))
        .unwrap();
        assert_eq!(opts.config.channels, 3);
        assert_eq!(opts.config.seq_length, 8);
        assert_eq!(opts.config.tempo, 90);
        assert_eq!(opts.patterns, [(1, vec![true, false, true])]);
        assert_eq!(opts.beats, Some(4));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["--tempo"])).is_err());
        assert!(parse_args(&args(&["--tempo", "fast"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_pattern("x.x").is_err());
        assert!(parse_pattern("0:x?x").is_err());
    }

    #[test]
    fn oversized_beat_count_is_rejected() {
        assert!(parse_args(&args(&["--beats", "4294967295"])).is_err());
        let over = (MAX_BEATS + 1).to_string();
        assert!(parse_args(&args(&["--beats", &over])).is_err());
        let opts = parse_args(&args(&["--beats", &MAX_BEATS.to_string()])).unwrap();
        assert_eq!(opts.beats, Some(MAX_BEATS));
    }

    #[test]
    fn pattern_glyphs() {
        assert_eq!(parse_pattern("2:X-1.0").unwrap(), (2, vec![true, false, true, false, false]));
    }
}
