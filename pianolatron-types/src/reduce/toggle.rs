use crate::{PlaybackState, Toggle};

fn slot(state: &mut PlaybackState, t: Toggle) -> &mut bool {
    match t {
        Toggle::Soft => &mut state.soft,
        Toggle::Sustain => &mut state.sustain,
        Toggle::Accent => &mut state.accent,
        Toggle::PlayExpressions => &mut state.play_expressions,
        Toggle::RollPedaling => &mut state.roll_pedaling,
        Toggle::UseMidiTempoEvents => &mut state.use_midi_tempo_events,
    }
}

pub(super) fn get(state: &PlaybackState, t: Toggle) -> bool {
    match t {
        Toggle::Soft => state.soft,
        Toggle::Sustain => state.sustain,
        Toggle::Accent => state.accent,
        Toggle::PlayExpressions => state.play_expressions,
        Toggle::RollPedaling => state.roll_pedaling,
        Toggle::UseMidiTempoEvents => state.use_midi_tempo_events,
    }
}

pub(super) fn set(state: &mut PlaybackState, t: Toggle, on: bool) -> bool {
    let v = slot(state, t);
    if *v == on {
        return false;
    }
    *v = on;
    true
}
