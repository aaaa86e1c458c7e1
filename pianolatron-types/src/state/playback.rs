use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::Tick;

/// Allowed range for the master, bass and treble volume coefficients.
pub const VOLUME_RANGE: RangeInclusive<f64> = 0.0..=4.0;
/// Allowed range for the tempo coefficient.
pub const TEMPO_COEFFICIENT_RANGE: RangeInclusive<f64> = 0.1..=4.0;

/// Transport position of the roll player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transport {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Constants of the velocity and tempo model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSettings {
    /// Velocity used for every note when roll expressions are off.
    pub default_note_velocity: u8,
    /// BPM used when the roll has no tempo map or MIDI tempo events are off.
    pub default_tempo: f64,
    pub soft_pedal_ratio: f64,
    pub accent_bump: f64,
    /// First MIDI number of the treble half (F# above middle C).
    pub half_boundary: u8,
}

impl Default for ExpressionSettings {
    fn default() -> Self {
        Self {
            default_note_velocity: 50,
            default_tempo: 60.0,
            soft_pedal_ratio: 0.67,
            accent_bump: 1.5,
            half_boundary: 66,
        }
    }
}

/// User-adjustable values a freshly loaded roll starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackDefaults {
    pub volume: f64,
    pub bass_volume: f64,
    pub treble_volume: f64,
    pub tempo_coefficient: f64,
    pub play_expressions: bool,
    pub roll_pedaling: bool,
    pub use_midi_tempo_events: bool,
}

impl Default for PlaybackDefaults {
    fn default() -> Self {
        Self {
            volume: 1.0,
            bass_volume: 1.0,
            treble_volume: 1.0,
            tempo_coefficient: 1.0,
            play_expressions: true,
            roll_pedaling: true,
            use_midi_tempo_events: true,
        }
    }
}

/// Playback state for the single active roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub volume: f64,
    pub bass_volume: f64,
    pub treble_volume: f64,
    pub tempo_coefficient: f64,
    pub soft: bool,
    pub sustain: bool,
    pub accent: bool,
    pub play_expressions: bool,
    pub roll_pedaling: bool,
    pub use_midi_tempo_events: bool,
    pub transport: Transport,
    pub current_tick: Tick,
    active_notes: BTreeSet<u8>,
}

impl PlaybackState {
    pub fn new(defaults: &PlaybackDefaults) -> Self {
        Self {
            volume: defaults.volume,
            bass_volume: defaults.bass_volume,
            treble_volume: defaults.treble_volume,
            tempo_coefficient: defaults.tempo_coefficient,
            soft: false,
            sustain: false,
            accent: false,
            play_expressions: defaults.play_expressions,
            roll_pedaling: defaults.roll_pedaling,
            use_midi_tempo_events: defaults.use_midi_tempo_events,
            transport: Transport::Stopped,
            current_tick: 0,
            active_notes: BTreeSet::new(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.transport == Transport::Playing
    }

    /// Notes struck and not yet released, lowest first.
    pub fn active_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.active_notes.iter().copied()
    }

    pub fn is_active(&self, note: u8) -> bool {
        self.active_notes.contains(&note)
    }

    pub fn note_on(&mut self, note: u8) {
        self.active_notes.insert(note);
    }

    pub fn note_off(&mut self, note: u8) {
        self.active_notes.remove(&note);
    }

    /// Forget all sounding notes, returning the ones that were active.
    pub fn take_active_notes(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.active_notes).into_iter().collect()
    }

    /// Clear the momentary performer controls (pedals and accent).
    pub fn reset_toggles(&mut self) {
        self.soft = false;
        self.sustain = false;
        self.accent = false;
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(&PlaybackDefaults::default())
    }
}
