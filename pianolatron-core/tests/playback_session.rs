mod common;

use std::time::Duration;

use common::RollBuilder;
use pianolatron_core::dispatch::{dispatch_action, LocalDispatcher};
use pianolatron_core::engine;
use pianolatron_core::loader::{begin_load, finish_load, LoadOutcome};
use pianolatron_core::piano::{PianoOp, TestPiano};
use pianolatron_core::state::AppState;
use pianolatron_types::controller::{PEDAL_ON, SOFT_PEDAL, SUSTAIN_PEDAL};
use pianolatron_types::{Dispatcher, NotificationKind, PlaybackAction, Toggle, Transport};

const FRAME: Duration = Duration::from_millis(20);

fn scale_roll() -> RollBuilder {
    RollBuilder::new("welte-red")
        .meta("TITLE", "Scale")
        .tempo(0, 60)
        .note(0, 60, 40)
        .note(240, 60, 0)
        .note(240, 62, 60)
        .note(480, 62, 0)
        .note(480, 64, 80)
        .note(720, 64, 0)
}

#[test]
fn plays_a_roll_to_the_end() {
    let piano = TestPiano::new();
    let mut state = common::load(&scale_roll(), &piano);
    assert!(state.is_ready());

    let mut dispatcher = LocalDispatcher::new(&mut state, &piano);
    dispatcher.dispatch(&PlaybackAction::Play);
    common::play_to_end(&mut state, &piano, FRAME);

    assert_eq!(state.playback.transport, Transport::Paused);
    assert_eq!(state.playback.current_tick, 720);
    assert_eq!(state.progress(), 1.0);
    assert_eq!(state.playback.active_notes().count(), 0);
    assert_eq!(piano.strikes(60), vec![0.4]);
    assert_eq!(piano.strikes(62), vec![0.6]);
    assert_eq!(piano.strikes(64), vec![0.8]);
    assert_eq!(
        piano.count(|op| matches!(op, PianoOp::KeyUp(64))),
        1,
        "last note released exactly once"
    );
}

#[test]
fn roll_soft_pedal_shapes_velocity() {
    let roll = RollBuilder::new("welte-red")
        .controller(0, SOFT_PEDAL, PEDAL_ON)
        .note(10, 40, 80)
        .note(100, 40, 0);
    let piano = TestPiano::new();
    let mut state = common::load(&roll, &piano);
    dispatch_action(&PlaybackAction::Play, &mut state, &piano);
    common::play_to_end(&mut state, &piano, FRAME);

    let strikes = piano.strikes(40);
    assert_eq!(strikes.len(), 1);
    assert!((strikes[0] - 0.536).abs() < 1e-9);
}

#[test]
fn roll_pedaling_off_ignores_roll_pedals() {
    let roll = RollBuilder::new("welte-red")
        .controller(0, SUSTAIN_PEDAL, PEDAL_ON)
        .controller(0, SOFT_PEDAL, PEDAL_ON)
        .note(10, 70, 80)
        .note(100, 70, 0);
    let piano = TestPiano::new();
    let mut state = common::load(&roll, &piano);
    dispatch_action(
        &PlaybackAction::SetToggle(Toggle::RollPedaling, false),
        &mut state,
        &piano,
    );
    piano.clear();
    dispatch_action(&PlaybackAction::Play, &mut state, &piano);
    common::play_to_end(&mut state, &piano, FRAME);

    assert_eq!(piano.count(|op| *op == PianoOp::PedalDown), 0);
    assert_eq!(piano.strikes(70), vec![0.8]);
}

#[test]
fn roll_sustain_is_released_when_paused() {
    let roll = RollBuilder::new("welte-red")
        .controller(0, SUSTAIN_PEDAL, PEDAL_ON)
        .note(0, 50, 60)
        .note(2000, 50, 0);
    let piano = TestPiano::new();
    let mut state = common::load(&roll, &piano);
    dispatch_action(&PlaybackAction::Play, &mut state, &piano);
    engine::advance(&mut state, &piano, FRAME);
    assert!(state.playback.sustain);
    assert!(state.playback.is_active(50));

    dispatch_action(&PlaybackAction::PlayPause, &mut state, &piano);
    assert_eq!(state.playback.transport, Transport::Paused);
    assert!(!state.playback.sustain);
    assert!(piano.operations().contains(&PianoOp::KeyUp(50)));
    assert_eq!(piano.last_pedal(), Some(PianoOp::PedalUp));
}

#[test]
fn tempo_events_change_playback_speed() {
    let roll = RollBuilder::new("welte-red")
        .tempo(0, 60)
        .tempo(480, 120)
        .note(960, 72, 50)
        .note(1000, 72, 0);
    let piano = TestPiano::new();
    let mut state = common::load(&roll, &piano);
    dispatch_action(&PlaybackAction::Play, &mut state, &piano);

    // one beat at 60 bpm
    engine::advance(&mut state, &piano, Duration::from_secs(1));
    assert_eq!(state.playback.current_tick, 480);
    assert_eq!(state.player.tempo(), 120.0);
    assert!(piano.strikes(72).is_empty());

    // one beat at 120 bpm
    engine::advance(&mut state, &piano, Duration::from_millis(500));
    assert_eq!(state.playback.current_tick, 960);
    assert_eq!(piano.strikes(72), vec![0.5]);
}

#[test]
fn seeking_picks_up_tempo_at_new_position() {
    let roll = RollBuilder::new("welte-red")
        .tempo(0, 60)
        .tempo(480, 120)
        .note(1000, 72, 0);
    let piano = TestPiano::new();
    let mut state = common::load(&roll, &piano);
    dispatch_action(&PlaybackAction::SkipToPercentage(0.5), &mut state, &piano);
    assert_eq!(state.playback.current_tick, 500);
    assert_eq!(state.player.tempo(), 120.0);
    dispatch_action(&PlaybackAction::SkipBy(-400), &mut state, &piano);
    assert_eq!(state.player.tempo(), 60.0);
}

#[test]
fn newer_load_wins_over_slow_older_one() {
    let piano = TestPiano::new();
    let mut state = AppState::new();
    let first = begin_load(&mut state, "first").unwrap();
    let second = begin_load(&mut state, "second").unwrap();

    let second_roll = RollBuilder::new("88-note").meta("TITLE", "Second");
    assert_eq!(
        finish_load(&mut state, &piano, second, Ok(second_roll.bytes())),
        LoadOutcome::Applied
    );
    assert_eq!(
        finish_load(&mut state, &piano, first, Ok(scale_roll().bytes())),
        LoadOutcome::Stale
    );
    let roll = state.roll.as_ref().unwrap();
    assert_eq!(roll.id, "second");
    assert_eq!(roll.metadata.get("TITLE"), Some("Second"));
}

#[test]
fn failed_load_keeps_previous_roll() {
    let piano = TestPiano::new();
    let mut state = common::load(&scale_roll(), &piano);
    dispatch_action(&PlaybackAction::SkipToTick(300), &mut state, &piano);

    let ticket = begin_load(&mut state, "broken").unwrap();
    assert!(!state.is_ready());
    let outcome = finish_load(&mut state, &piano, ticket, Ok(vec![0x4d, 0x54]));
    assert_eq!(outcome, LoadOutcome::Failed);
    assert_eq!(state.loads.current.as_deref(), Some("roll"));
    assert!(state.is_ready());
    assert_eq!(state.playback.current_tick, 300);

    let notifications = state.take_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
}

#[test]
fn loading_resets_controls_to_defaults() {
    let piano = TestPiano::new();
    let mut state = common::load(&scale_roll(), &piano);
    dispatch_action(
        &PlaybackAction::SetCoefficient(pianolatron_types::Coefficient::Volume, 2.5),
        &mut state,
        &piano,
    );
    dispatch_action(&PlaybackAction::Play, &mut state, &piano);
    engine::advance(&mut state, &piano, FRAME);

    let ticket = begin_load(&mut state, "other").unwrap();
    finish_load(&mut state, &piano, ticket, Ok(scale_roll().bytes()));
    assert_eq!(state.playback.volume, 1.0);
    assert_eq!(state.playback.transport, Transport::Stopped);
    assert_eq!(state.playback.current_tick, 0);
    assert_eq!(state.playback.active_notes().count(), 0);
}
