mod local;

pub use local::LocalDispatcher;

use pianolatron_types::reduce::{recompute_for, reduce_action, Reduced};
use pianolatron_types::{Coefficient, DispatchResult, Notification, PlaybackAction, Recompute};

use crate::engine;
use crate::piano::PianoBackend;
use crate::state::AppState;

/// Dispatch a user action. Transport and seek actions go to the engine;
/// control changes go through the pure reducers, after which the
/// recompute table decides what derived state to refresh.
pub fn dispatch_action(
    action: &PlaybackAction,
    state: &mut AppState,
    piano: &dyn PianoBackend,
) -> DispatchResult {
    let mut result = match action {
        PlaybackAction::PlayPause => {
            if state.playback.is_playing() {
                engine::pause_playback(state, piano);
                DispatchResult::none()
            } else {
                start(state)
            }
        }
        PlaybackAction::Play => {
            if state.playback.is_playing() {
                DispatchResult::none()
            } else {
                start(state)
            }
        }
        PlaybackAction::Pause => {
            if state.playback.is_playing() {
                engine::pause_playback(state, piano);
            }
            DispatchResult::none()
        }
        PlaybackAction::Stop => {
            engine::stop_playback(state, piano);
            DispatchResult::none()
        }
        PlaybackAction::SkipToTick(tick) => {
            engine::skip_to_tick(state, piano, *tick);
            DispatchResult::none()
        }
        PlaybackAction::SkipToPercentage(fraction) => {
            engine::skip_to_percentage(state, piano, *fraction);
            DispatchResult::none()
        }
        PlaybackAction::SkipBy(delta) => {
            engine::skip_by(state, piano, *delta);
            DispatchResult::none()
        }
        PlaybackAction::SetCoefficient(..)
        | PlaybackAction::AdjustCoefficient(..)
        | PlaybackAction::SetToggle(..)
        | PlaybackAction::FlipToggle(_) => match reduce_action(action, &mut state.playback) {
            Reduced::Changed => DispatchResult::none(),
            Reduced::Unchanged | Reduced::NotReducible => return DispatchResult::none(),
        },
    };

    for recompute in recompute_for(action, &state.playback) {
        apply_recompute(recompute, state, piano);
        result.recomputed.push(recompute);
    }
    result
}

fn start(state: &mut AppState) -> DispatchResult {
    if engine::start_playback(state) {
        DispatchResult::none()
    } else {
        DispatchResult::with_notification(Notification::info("Not ready", "No roll is loaded"))
    }
}

fn apply_recompute(recompute: Recompute, state: &mut AppState, piano: &dyn PianoBackend) {
    match recompute {
        Recompute::Tempo => engine::recompute_tempo(state),
        Recompute::SustainPedal => engine::apply_sustain(state, piano),
        Recompute::RollPedaling => engine::release_roll_pedals(state, piano),
    }
}

/// One press of a coefficient's up or down control, using the configured step.
pub fn step_coefficient(state: &AppState, coefficient: Coefficient, up: bool) -> PlaybackAction {
    let step = match coefficient {
        Coefficient::Tempo => state.steps.tempo,
        Coefficient::Volume | Coefficient::BassVolume | Coefficient::TrebleVolume => {
            state.steps.volume
        }
    };
    PlaybackAction::AdjustCoefficient(coefficient, if up { step } else { -step })
}

/// One press of the seek forward or backward control.
pub fn step_seek(state: &AppState, forward: bool) -> PlaybackAction {
    let ticks = i64::try_from(state.steps.seek_ticks).unwrap_or(i64::MAX);
    PlaybackAction::SkipBy(if forward { ticks } else { -ticks })
}
