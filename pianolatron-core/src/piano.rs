//! Piano backend trait: the sampled piano the engine plays.
//!
//! `PianoBackend` captures what the engine means to do (strike a key,
//! release it, move the sustain pedal) independently of how the samples are
//! rendered. This enables unit testing of the expression logic without
//! loading any audio.

use std::sync::Mutex;

/// Semantic-level piano interface.
pub trait PianoBackend {
    /// Strike a key. `velocity` is in (0, 1].
    fn key_down(&self, midi: u8, velocity: f64);

    fn key_up(&self, midi: u8);

    fn pedal_down(&self);

    fn pedal_up(&self);
}

// ─── TestPiano ──────────────────────────────────────────────────────

/// A recorded piano operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PianoOp {
    KeyDown { midi: u8, velocity: f64 },
    KeyUp(u8),
    PedalDown,
    PedalUp,
}

/// A piano that records every operation for assertions.
/// Uses `Mutex` for interior mutability so it can be shared behind `&`.
pub struct TestPiano {
    ops: Mutex<Vec<PianoOp>>,
}

impl TestPiano {
    pub fn new() -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
        }
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<PianoOp> {
        self.ops.lock().map(|ops| ops.clone()).unwrap_or_default()
    }

    /// Clear recorded operations.
    pub fn clear(&self) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.clear();
        }
    }

    /// Velocities of every key-down for `midi`, in order.
    pub fn strikes(&self, midi: u8) -> Vec<f64> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                PianoOp::KeyDown { midi: m, velocity } if m == midi => Some(velocity),
                _ => None,
            })
            .collect()
    }

    pub fn count<F: Fn(&PianoOp) -> bool>(&self, f: F) -> usize {
        self.operations().iter().filter(|op| f(op)).count()
    }

    /// The last pedal operation, if any.
    pub fn last_pedal(&self) -> Option<PianoOp> {
        self.operations()
            .into_iter()
            .rev()
            .find(|op| matches!(op, PianoOp::PedalDown | PianoOp::PedalUp))
    }

    fn record(&self, op: PianoOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }
}

impl Default for TestPiano {
    fn default() -> Self {
        Self::new()
    }
}

impl PianoBackend for TestPiano {
    fn key_down(&self, midi: u8, velocity: f64) {
        self.record(PianoOp::KeyDown { midi, velocity });
    }
    fn key_up(&self, midi: u8) {
        self.record(PianoOp::KeyUp(midi));
    }
    fn pedal_down(&self) {
        self.record(PianoOp::PedalDown);
    }
    fn pedal_up(&self) {
        self.record(PianoOp::PedalUp);
    }
}

// ─── NullPiano ──────────────────────────────────────────────────────

/// A piano that plays nothing. Useful before the samples have loaded.
pub struct NullPiano;

impl PianoBackend for NullPiano {
    fn key_down(&self, _: u8, _: f64) {}
    fn key_up(&self, _: u8) {}
    fn pedal_down(&self) {}
    fn pedal_up(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piano_records_in_order() {
        let piano = TestPiano::new();
        piano.pedal_down();
        piano.key_down(60, 0.5);
        piano.key_up(60);
        piano.pedal_up();
        assert_eq!(
            piano.operations(),
            vec![
                PianoOp::PedalDown,
                PianoOp::KeyDown { midi: 60, velocity: 0.5 },
                PianoOp::KeyUp(60),
                PianoOp::PedalUp,
            ]
        );
        assert_eq!(piano.strikes(60), vec![0.5]);
        assert_eq!(piano.last_pedal(), Some(PianoOp::PedalUp));
        piano.clear();
        assert!(piano.operations().is_empty());
    }
}
