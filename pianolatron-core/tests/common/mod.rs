#![allow(dead_code)]
//! Test harness utilities for pianolatron-core integration tests.

use std::path::Path;
use std::time::Duration;

use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use pianolatron_core::engine;
use pianolatron_core::loader::{load_roll_file, midi_path, LoadOutcome};
use pianolatron_core::piano::PianoBackend;
use pianolatron_core::state::AppState;

pub const TICKS_PER_BEAT: u16 = 480;

enum Ev {
    Text(String),
    Tempo(u32),
    Note(u8, u8),
    Controller(u8, u8),
}

/// Builds a two-track roll MIDI file: metadata and tempos on track 0,
/// holes and pedalling on track 1.
pub struct RollBuilder {
    meta: Vec<(u64, Ev)>,
    holes: Vec<(u64, Ev)>,
}

impl RollBuilder {
    pub fn new(roll_type: &str) -> Self {
        Self {
            meta: Vec::new(),
            holes: Vec::new(),
        }
        .meta("ROLL_TYPE", roll_type)
        .meta("IMAGE_LENGTH", "10000")
        .meta("FIRST_HOLE", "0")
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.meta.push((0, Ev::Text(format!("@{}: {}", key, value))));
        self
    }

    pub fn tempo(mut self, tick: u64, bpm: u32) -> Self {
        self.meta.push((tick, Ev::Tempo(60_000_000 / bpm)));
        self
    }

    pub fn note(mut self, tick: u64, note: u8, velocity: u8) -> Self {
        self.holes.push((tick, Ev::Note(note, velocity)));
        self
    }

    pub fn controller(mut self, tick: u64, number: u8, value: u8) -> Self {
        self.holes.push((tick, Ev::Controller(number, value)));
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut smf = Smf::new(Header::new(
            Format::Parallel,
            Timing::Metrical(u15::new(TICKS_PER_BEAT)),
        ));
        smf.tracks.push(track(&self.meta));
        smf.tracks.push(track(&self.holes));
        let mut buf = Vec::new();
        smf.write(&mut buf).expect("write roll");
        buf
    }

    /// Write the roll as `<dir>/<id>.mid`.
    pub fn write_to(&self, dir: &Path, id: &str) {
        std::fs::write(midi_path(dir, id), self.bytes()).expect("write roll file");
    }
}

fn track(events: &[(u64, Ev)]) -> Vec<TrackEvent<'_>> {
    let mut sorted: Vec<&(u64, Ev)> = events.iter().collect();
    sorted.sort_by_key(|(tick, _)| *tick);

    let mut out = Vec::new();
    let mut last = 0;
    for (tick, ev) in sorted {
        let kind = match ev {
            Ev::Text(s) => TrackEventKind::Meta(MetaMessage::Text(s.as_bytes())),
            Ev::Tempo(us) => TrackEventKind::Meta(MetaMessage::Tempo(u24::new(*us))),
            Ev::Note(key, vel) => TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::NoteOn {
                    key: u7::new(*key),
                    vel: u7::new(*vel),
                },
            },
            Ev::Controller(controller, value) => TrackEventKind::Midi {
                channel: u4::new(0),
                message: MidiMessage::Controller {
                    controller: u7::new(*controller),
                    value: u7::new(*value),
                },
            },
        };
        out.push(TrackEvent {
            delta: u28::new((*tick - last) as u32),
            kind,
        });
        last = *tick;
    }
    out.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    out
}

/// Load `roll` into a fresh state with samples marked ready.
pub fn load(roll: &RollBuilder, piano: &dyn PianoBackend) -> AppState {
    let dir = tempfile::tempdir().expect("tempdir");
    roll.write_to(dir.path(), "roll");
    let mut state = AppState::new();
    state.samples_ready = true;
    assert_eq!(
        load_roll_file(&mut state, piano, dir.path(), "roll"),
        LoadOutcome::Applied
    );
    state
}

/// Advance in fixed frames until playback leaves the Playing state.
pub fn play_to_end(state: &mut AppState, piano: &dyn PianoBackend, frame: Duration) -> usize {
    let mut frames = 0;
    while state.playback.is_playing() {
        engine::advance(state, piano, frame);
        frames += 1;
        assert!(frames < 100_000, "roll never finished");
    }
    frames
}
