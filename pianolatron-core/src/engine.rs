//! The playback expression engine.
//!
//! Turns the roll's event stream into piano commands: velocities are shaped
//! by the roll's expression data and the user's coefficients, the roll's
//! control track drives the pedals when roll pedalling is on, and tempo
//! events are scaled by the tempo coefficient. Also owns the transport
//! transitions (play, pause, stop, seek) since each of them has to keep the
//! piano, the scheduler and `PlaybackState` in step.

use std::time::Duration;

use pianolatron_types::controller::{PEDAL_ON, SOFT_PEDAL, SUSTAIN_PEDAL};
use pianolatron_types::{
    ExpressionSettings, PlaybackState, RollEvent, RollEventKind, Tick, Transport,
};

use crate::piano::PianoBackend;
use crate::player::PlayerStep;
use crate::state::AppState;

/// Final key-down velocity for a roll note-on, in [0, 1].
///
/// ```text
/// (expressions ? v : default) / 100 * (soft ? ratio : 1) * (accent ? bump : 1)
///     * volume * (note < half boundary ? bass : treble)
/// ```
pub fn note_velocity(
    settings: &ExpressionSettings,
    playback: &PlaybackState,
    note: u8,
    velocity: u8,
) -> f64 {
    let base = if playback.play_expressions {
        f64::from(velocity)
    } else {
        f64::from(settings.default_note_velocity)
    };
    let soft = if playback.soft { settings.soft_pedal_ratio } else { 1.0 };
    let accent = if playback.accent { settings.accent_bump } else { 1.0 };
    let half = if note < settings.half_boundary {
        playback.bass_volume
    } else {
        playback.treble_volume
    };
    (base / 100.0 * soft * accent * playback.volume * half).min(1.0)
}

/// Strike a note. A zero velocity sounds nothing but still marks the note
/// active, so the key-up sent on its note-off or on a release is expected.
pub fn start_note(state: &mut AppState, piano: &dyn PianoBackend, note: u8, velocity: u8) {
    let v = note_velocity(&state.expression, &state.playback, note, velocity);
    if v > 0.0 {
        piano.key_down(note, v);
    } else {
        log::debug!(target: "engine", "suppressed silent note-on {}", note);
    }
    state.playback.note_on(note);
}

pub fn stop_note(state: &mut AppState, piano: &dyn PianoBackend, note: u8) {
    piano.key_up(note);
    state.playback.note_off(note);
}

/// Release every active key and clear the set. The sustain pedal is
/// lifted to damp ringing strings and put back if it is held.
pub fn stop_all_notes(state: &mut AppState, piano: &dyn PianoBackend) {
    piano.pedal_up();
    if state.playback.sustain {
        piano.pedal_down();
    }
    for note in state.playback.take_active_notes() {
        piano.key_up(note);
    }
}

/// Move the piano's sustain pedal to follow the sustain toggle.
pub fn apply_sustain(state: &AppState, piano: &dyn PianoBackend) {
    if state.playback.sustain {
        piano.pedal_down();
    } else {
        piano.pedal_up();
    }
}

/// Set the sustain toggle, moving the pedal only when it changes.
pub fn set_sustain(state: &mut AppState, piano: &dyn PianoBackend, on: bool) {
    if state.playback.sustain != on {
        state.playback.sustain = on;
        apply_sustain(state, piano);
    }
}

/// Roll pedalling was switched off: both pedals come up.
pub fn release_roll_pedals(state: &mut AppState, piano: &dyn PianoBackend) {
    set_sustain(state, piano, false);
    state.playback.soft = false;
}

/// Set the player's tempo from the tempo map and coefficient, pausing the
/// scheduler around the change when it is running.
pub fn recompute_tempo(state: &mut AppState) {
    let tempo = state.effective_tempo();
    if state.player.is_playing() {
        state.player.pause();
        state.player.set_tempo(tempo);
        state.player.play();
    } else {
        state.player.set_tempo(tempo);
    }
    log::debug!(target: "engine", "tempo {:.2} bpm at tick {}", tempo, state.playback.current_tick);
}

/// Start or resume playback. Returns false when no roll is loaded.
pub fn start_playback(state: &mut AppState) -> bool {
    if state.roll.is_none() {
        log::warn!(target: "engine", "play requested with no roll loaded");
        return false;
    }
    recompute_tempo(state);
    state.player.play();
    state.playback.transport = Transport::Playing;
    true
}

/// Pause, silencing the piano and clearing the momentary controls.
pub fn pause_playback(state: &mut AppState, piano: &dyn PianoBackend) {
    if state.playback.transport == Transport::Stopped {
        return;
    }
    state.player.pause();
    stop_all_notes(state, piano);
    let sustained = state.playback.sustain;
    state.playback.reset_toggles();
    if sustained {
        piano.pedal_up();
    }
    state.playback.transport = Transport::Paused;
}

/// Halt, release active notes and rewind to the start of the roll.
pub fn stop_playback(state: &mut AppState, piano: &dyn PianoBackend) {
    state.player.stop();
    stop_all_notes(state, piano);
    state.playback.current_tick = 0;
    state.playback.transport = Transport::Stopped;
}

/// Stop and return every control to its configured default.
pub fn reset_playback(state: &mut AppState, piano: &dyn PianoBackend) {
    stop_playback(state, piano);
    let sustained = state.playback.sustain;
    state.playback = PlaybackState::new(&state.defaults);
    if sustained {
        piano.pedal_up();
    }
    recompute_tempo(state);
}

/// Seek to `tick`, clamped to the roll. Notes sounding at the old position
/// are released.
pub fn skip_to_tick(state: &mut AppState, piano: &dyn PianoBackend, tick: Tick) {
    let tick = tick.min(state.player.total_ticks());
    let playing = state.player.is_playing();
    if playing {
        state.player.pause();
    }
    if state.playback.active_notes().next().is_some() {
        stop_all_notes(state, piano);
    }
    state.player.skip_to_tick(tick);
    state.playback.current_tick = state.player.current_tick();
    if playing {
        state.player.play();
    }
    log::debug!(target: "engine", "seek to tick {}", tick);
}

/// Seek to a fraction of the roll's length. Non-finite fractions are ignored.
pub fn skip_to_percentage(state: &mut AppState, piano: &dyn PianoBackend, fraction: f64) {
    if !fraction.is_finite() {
        log::warn!(target: "engine", "ignoring seek to {}", fraction);
        return;
    }
    let total = state.player.total_ticks();
    let tick = (total as f64 * fraction.clamp(0.0, 1.0)) as Tick;
    skip_to_tick(state, piano, tick);
}

/// Seek relative to the current position.
pub fn skip_by(state: &mut AppState, piano: &dyn PianoBackend, delta: i64) {
    let current = state.playback.current_tick;
    let tick = if delta < 0 {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as u64)
    };
    skip_to_tick(state, piano, tick);
}

/// Interpret one event emitted by the scheduler.
pub fn handle_roll_event(state: &mut AppState, piano: &dyn PianoBackend, event: &RollEvent) {
    match event.kind {
        RollEventKind::NoteOn { note, velocity: 0 } | RollEventKind::NoteOff { note } => {
            stop_note(state, piano, note)
        }
        RollEventKind::NoteOn { note, velocity } => start_note(state, piano, note, velocity),
        RollEventKind::ControllerChange { number, value } if state.playback.roll_pedaling => {
            let on = value == PEDAL_ON;
            match number {
                SUSTAIN_PEDAL => {
                    if on {
                        piano.pedal_down();
                    } else {
                        piano.pedal_up();
                    }
                    state.playback.sustain = on;
                }
                SOFT_PEDAL => state.playback.soft = on,
                _ => {}
            }
        }
        RollEventKind::SetTempo { bpm } if state.playback.use_midi_tempo_events => {
            state.player.set_tempo(bpm * state.playback.tempo_coefficient);
        }
        _ => {}
    }
}

/// Run the scheduler for `elapsed` and play what came due. At the end of
/// the roll playback pauses.
///
/// The whole frame advances at the tempo in effect when it starts; a tempo
/// event inside the frame applies from the next frame on. Keep frames
/// short (10-20 ms) so the drift stays below one frame.
pub fn advance(state: &mut AppState, piano: &dyn PianoBackend, elapsed: Duration) -> PlayerStep {
    if !state.playback.is_playing() {
        return PlayerStep::default();
    }
    let step = state.player.advance(elapsed);
    for event in &step.events {
        handle_roll_event(state, piano, event);
    }
    state.playback.current_tick = state.player.current_tick();
    if step.end_of_stream {
        log::info!(target: "engine", "end of roll at tick {}", state.playback.current_tick);
        pause_playback(state, piano);
    }
    step
}
