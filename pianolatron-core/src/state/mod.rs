//! Application state owned by the front end and threaded through dispatch.

use pianolatron_types::{
    ExpressionBox, ExpressionSettings, Notification, PlaybackDefaults, PlaybackState, RollType,
    Tick,
};

use crate::annotate::NoteVelocities;
use crate::config::Config;
use crate::metadata::RollMetadata;
use crate::player::Player;
use crate::tempo_map::TempoMap;

/// Everything derived from one roll's MIDI file.
#[derive(Debug, Clone)]
pub struct LoadedRoll {
    /// Roll identifier (the druid the MIDI file is named after).
    pub id: String,
    pub metadata: RollMetadata,
    /// `None` when the metadata names no roll type or an unknown one.
    pub roll_type: Option<RollType>,
    pub tempo_map: TempoMap,
    pub velocities: NoteVelocities,
    pub expression_box: Option<ExpressionBox>,
    pub total_ticks: Tick,
    pub ticks_per_beat: u16,
    pub event_count: usize,
}

/// Roll identity and the load generation counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadState {
    /// Roll the user asked for most recently.
    pub current: Option<String>,
    /// Roll that was current before that request; restored on failure.
    pub previous: Option<String>,
    pub(crate) generation: u64,
}

impl LoadState {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Adjustment steps for the keyboard-style controls.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSteps {
    pub volume: f64,
    pub tempo: f64,
    pub seek_ticks: u64,
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self {
            volume: 0.1,
            tempo: 0.05,
            seek_ticks: 1000,
        }
    }
}

/// Top-level application state, owned by the front end and passed to
/// dispatch by reference.
pub struct AppState {
    pub playback: PlaybackState,
    pub player: Player,
    /// The roll whose MIDI data is loaded into the player.
    pub roll: Option<LoadedRoll>,
    pub loads: LoadState,
    /// Set by the front end once the piano samples have loaded.
    pub samples_ready: bool,
    /// Notifications not yet shown to the user.
    pub notifications: Vec<Notification>,
    pub defaults: PlaybackDefaults,
    pub expression: ExpressionSettings,
    pub steps: ControlSteps,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::new_with_defaults(
            PlaybackDefaults::default(),
            ExpressionSettings::default(),
            ControlSteps::default(),
        )
    }

    pub fn new_with_defaults(
        defaults: PlaybackDefaults,
        expression: ExpressionSettings,
        steps: ControlSteps,
    ) -> Self {
        let mut player = Player::new();
        player.set_tempo(expression.default_tempo);
        Self {
            playback: PlaybackState::new(&defaults),
            player,
            roll: None,
            loads: LoadState::default(),
            samples_ready: false,
            notifications: Vec::new(),
            defaults,
            expression,
            steps,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new_with_defaults(
            config.playback_defaults(),
            config.expression_settings(),
            ControlSteps {
                volume: config.volume_step(),
                tempo: config.tempo_step(),
                seek_ticks: config.seek_ticks(),
            },
        )
    }

    /// Samples loaded and the current roll's MIDI parsed.
    pub fn is_ready(&self) -> bool {
        self.samples_ready
            && match (&self.roll, &self.loads.current) {
                (Some(roll), Some(current)) => &roll.id == current,
                _ => false,
            }
    }

    /// Fraction of the roll played, 0.0 when nothing is loaded.
    pub fn progress(&self) -> f64 {
        let total = self.player.total_ticks();
        if total == 0 {
            return 0.0;
        }
        (self.playback.current_tick as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Drain pending notifications for display.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Tempo the player should run at for the current tick and coefficient.
    pub fn effective_tempo(&self) -> f64 {
        let base = match &self.roll {
            Some(roll) => roll.tempo_map.tempo_at_tick(
                self.playback.current_tick,
                self.playback.use_midi_tempo_events,
                self.expression.default_tempo,
            ),
            None => self.expression.default_tempo,
        };
        base * self.playback.tempo_coefficient
    }
}
