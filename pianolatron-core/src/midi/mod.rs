//! Decoding roll MIDI files into the engine's event stream.
//!
//! Roll MIDI files are SMF format 1: track 0 carries `@KEY: value` text
//! events and tempo changes, the remaining tracks carry hole (note) and
//! expression/pedal (controller) events.

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use pianolatron_types::{RollEvent, RollEventKind, Tick};

use crate::error::LoadError;

/// Fallback resolution for SMPTE-timed files, which rolls never are.
const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// A decoded roll MIDI file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMidi {
    /// All tracks merged into one stream ordered by tick. Events on the same
    /// tick keep track order, then file order.
    pub events: Vec<RollEvent>,
    /// Tick of the last event on any track.
    pub total_ticks: Tick,
    pub ticks_per_beat: u16,
}

impl ParsedMidi {
    /// Events of the metadata track, in stream order.
    pub fn metadata_events(&self) -> impl Iterator<Item = &RollEvent> {
        self.events.iter().filter(|e| e.is_metadata())
    }
}

/// Convert a Set Tempo payload (microseconds per quarter note) to whole BPM.
pub fn tempo_to_bpm(us_per_quarter: u32) -> f64 {
    if us_per_quarter == 0 {
        return 0.0;
    }
    (60_000_000.0 / f64::from(us_per_quarter)).round()
}

pub fn parse_roll_midi(bytes: &[u8]) -> Result<ParsedMidi, LoadError> {
    let smf = Smf::parse(bytes)?;
    if smf.tracks.is_empty() {
        return Err(LoadError::NoTracks);
    }

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(t) => t.as_int(),
        Timing::Timecode(..) => {
            log::warn!(target: "midi", "timecode-based MIDI file, assuming {} ticks per beat", DEFAULT_TICKS_PER_BEAT);
            DEFAULT_TICKS_PER_BEAT
        }
    };

    let mut events = Vec::new();
    for (track_index, track) in smf.tracks.iter().enumerate() {
        let mut tick: Tick = 0;
        for ev in track {
            tick += Tick::from(ev.delta.as_int());
            if let Some(kind) = convert_kind(&ev.kind) {
                events.push(RollEvent::new(tick, track_index, kind));
            }
        }
    }
    // Stable sort keeps per-track order for simultaneous events.
    events.sort_by_key(|e| (e.tick, e.track));
    let total_ticks = events.last().map(|e| e.tick).unwrap_or(0);

    log::debug!(
        target: "midi",
        "decoded {} events over {} tracks, {} ticks",
        events.len(),
        smf.tracks.len(),
        total_ticks
    );

    Ok(ParsedMidi {
        events,
        total_ticks,
        ticks_per_beat,
    })
}

fn convert_kind(kind: &TrackEventKind<'_>) -> Option<RollEventKind> {
    match kind {
        TrackEventKind::Midi { message, .. } => match *message {
            MidiMessage::NoteOn { key, vel } => Some(RollEventKind::NoteOn {
                note: key.as_int(),
                velocity: vel.as_int(),
            }),
            MidiMessage::NoteOff { key, .. } => Some(RollEventKind::NoteOff { note: key.as_int() }),
            MidiMessage::Controller { controller, value } => {
                Some(RollEventKind::ControllerChange {
                    number: controller.as_int(),
                    value: value.as_int(),
                })
            }
            _ => None,
        },
        TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some(RollEventKind::SetTempo {
            bpm: tempo_to_bpm(t.as_int()),
        }),
        TrackEventKind::Meta(MetaMessage::Text(bytes)) => {
            Some(RollEventKind::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
        TrackEventKind::Meta(MetaMessage::EndOfTrack) => Some(RollEventKind::EndOfTrack),
        _ => None,
    }
}
