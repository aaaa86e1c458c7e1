use serde::{Deserialize, Serialize};

use crate::Tick;

/// A decoded event from a roll's MIDI stream, at an absolute tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollEvent {
    pub tick: Tick,
    /// Index of the track the event came from. Track 0 carries roll metadata.
    pub track: usize,
    pub kind: RollEventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RollEventKind {
    /// Velocity 0 is a release, per MIDI running-status convention.
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    ControllerChange { number: u8, value: u8 },
    /// Tempo in beats per minute.
    SetTempo { bpm: f64 },
    Text(String),
    EndOfTrack,
}

impl RollEvent {
    pub fn new(tick: Tick, track: usize, kind: RollEventKind) -> Self {
        Self { tick, track, kind }
    }

    pub fn is_metadata(&self) -> bool {
        self.track == 0
    }
}
