//! Action types for the dispatch system.
//!
//! Actions are user intents (transport buttons, sliders, pedal keys) that
//! flow through `pianolatron_core::dispatch`. Events coming from the roll
//! itself do not go through here; the playback engine handles them directly.

use serde::{Deserialize, Serialize};

use crate::{Notification, Tick};

/// A user-adjustable playback coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coefficient {
    Volume,
    BassVolume,
    TrebleVolume,
    Tempo,
}

/// A boolean playback control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Toggle {
    Soft,
    Sustain,
    Accent,
    PlayExpressions,
    RollPedaling,
    UseMidiTempoEvents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackAction {
    /// Pause when playing, otherwise start or resume.
    PlayPause,
    Play,
    Pause,
    /// Stop and rewind to the start of the roll.
    Stop,
    SkipToTick(Tick),
    /// Seek to a fraction (0.0-1.0) of the roll's length.
    SkipToPercentage(f64),
    /// Seek relative to the current position, clamped to the roll.
    SkipBy(i64),
    SetCoefficient(Coefficient, f64),
    /// Add a delta to a coefficient, clamped to its allowed range.
    AdjustCoefficient(Coefficient, f64),
    SetToggle(Toggle, bool),
    FlipToggle(Toggle),
}

/// Derived state that must be recomputed after an action changed something
/// it depends on. Replaces reactive store subscriptions with an explicit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recompute {
    /// Player tempo = tempo at the current tick * tempo coefficient.
    Tempo,
    /// Piano sustain pedal follows the sustain toggle.
    SustainPedal,
    /// Roll pedalling switched off: both pedals are forced up.
    RollPedaling,
}

/// Side effects of dispatching an action, for the front end to process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    /// Recomputations that were run, in order.
    pub recomputed: Vec<Recompute>,
    pub notifications: Vec<Notification>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_notification(notification: Notification) -> Self {
        Self {
            notifications: vec![notification],
            ..Self::default()
        }
    }

    pub fn merge(&mut self, other: DispatchResult) {
        self.recomputed.extend(other.recomputed);
        self.notifications.extend(other.notifications);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_concatenates() {
        let mut a = DispatchResult::none();
        a.recomputed.push(Recompute::Tempo);
        let b = DispatchResult::with_notification(Notification::error("boom"));
        a.merge(b);
        assert_eq!(a.recomputed, vec![Recompute::Tempo]);
        assert_eq!(a.notifications.len(), 1);
    }
}
