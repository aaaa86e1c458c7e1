//! Pure state-mutation reducers for playback controls.
//!
//! These functions are the single source of truth for how a user action
//! changes `PlaybackState`. They do NOT:
//! - touch the player's tick scheduler
//! - send commands to the piano
//! - run the recomputations an action triggers (see [`recompute_for`])
//!
//! Transport and seek actions need the player and the piano, so they are
//! reported as not reducible and left to `pianolatron_core::dispatch`.

mod coefficient;
mod toggle;

use crate::{PlaybackAction, PlaybackState, Recompute, Toggle};

/// Outcome of reducing one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduced {
    Changed,
    Unchanged,
    /// The action needs the engine (transport or seek).
    NotReducible,
}

impl Reduced {
    fn from_change(changed: bool) -> Self {
        if changed {
            Reduced::Changed
        } else {
            Reduced::Unchanged
        }
    }
}

/// Apply an action's state mutation to `state`.
pub fn reduce_action(action: &PlaybackAction, state: &mut PlaybackState) -> Reduced {
    match action {
        PlaybackAction::SetCoefficient(c, value) => {
            Reduced::from_change(coefficient::set(state, *c, *value))
        }
        PlaybackAction::AdjustCoefficient(c, delta) => {
            Reduced::from_change(coefficient::adjust(state, *c, *delta))
        }
        PlaybackAction::SetToggle(t, on) => Reduced::from_change(toggle::set(state, *t, *on)),
        PlaybackAction::FlipToggle(t) => {
            let on = !toggle::get(state, *t);
            Reduced::from_change(toggle::set(state, *t, on))
        }
        PlaybackAction::PlayPause
        | PlaybackAction::Play
        | PlaybackAction::Pause
        | PlaybackAction::Stop
        | PlaybackAction::SkipToTick(_)
        | PlaybackAction::SkipToPercentage(_)
        | PlaybackAction::SkipBy(_) => Reduced::NotReducible,
    }
}

/// The dependency table: what must be recomputed once `action` has changed
/// `state`. Call after a reduction that reported [`Reduced::Changed`], or after
/// the engine performed a seek.
///
/// | change                         | recompute                 |
/// |--------------------------------|---------------------------|
/// | tempo coefficient              | `Tempo`                   |
/// | use-MIDI-tempo-events toggle   | `Tempo`                   |
/// | any seek                       | `Tempo`                   |
/// | sustain toggle                 | `SustainPedal`            |
/// | roll pedalling switched off    | `RollPedaling`            |
pub fn recompute_for(action: &PlaybackAction, state: &PlaybackState) -> Vec<Recompute> {
    use crate::Coefficient;

    let toggle = match action {
        PlaybackAction::SetCoefficient(Coefficient::Tempo, _)
        | PlaybackAction::AdjustCoefficient(Coefficient::Tempo, _) => {
            return vec![Recompute::Tempo]
        }
        PlaybackAction::SkipToTick(_)
        | PlaybackAction::SkipToPercentage(_)
        | PlaybackAction::SkipBy(_) => return vec![Recompute::Tempo],
        PlaybackAction::SetToggle(t, _) | PlaybackAction::FlipToggle(t) => *t,
        _ => return Vec::new(),
    };

    match toggle {
        Toggle::UseMidiTempoEvents => vec![Recompute::Tempo],
        Toggle::Sustain => vec![Recompute::SustainPedal],
        Toggle::RollPedaling if !state.roll_pedaling => vec![Recompute::RollPedaling],
        _ => Vec::new(),
    }
}
