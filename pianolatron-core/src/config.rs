use std::path::{Path, PathBuf};

use serde::Deserialize;

use pianolatron_types::{ExpressionSettings, PlaybackDefaults};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    expression: ExpressionConfig,
    #[serde(default)]
    controls: ControlsConfig,
    #[serde(default)]
    assets: AssetsConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    volume: Option<f64>,
    bass_volume: Option<f64>,
    treble_volume: Option<f64>,
    tempo_coefficient: Option<f64>,
    play_expressions: Option<bool>,
    roll_pedaling: Option<bool>,
    use_midi_tempo_events: Option<bool>,
}

#[derive(Deserialize, Default)]
struct ExpressionConfig {
    default_note_velocity: Option<u8>,
    default_tempo: Option<f64>,
    soft_pedal_ratio: Option<f64>,
    accent_bump: Option<f64>,
    half_boundary: Option<u8>,
}

#[derive(Deserialize, Default)]
struct ControlsConfig {
    volume_step: Option<f64>,
    tempo_step: Option<f64>,
    seek_ticks: Option<u64>,
}

#[derive(Deserialize, Default)]
struct AssetsConfig {
    midi_dir: Option<String>,
    samples_url: Option<String>,
    sample_velocities: Option<u8>,
    max_polyphony: Option<u16>,
}

/// Sample-player settings handed to the piano backend at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSettings {
    pub url: String,
    pub velocities: u8,
    pub max_polyphony: u16,
}

pub struct Config {
    defaults: DefaultsConfig,
    expression: ExpressionConfig,
    controls: ControlsConfig,
    assets: AssetsConfig,
}

impl Config {
    /// Embedded defaults overlaid with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults overlaid with the config file at `path`.
    /// A missing, unreadable or malformed file is logged and ignored.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            log::debug!(target: "config", "loaded user config {}", path.display());
                            merge(&mut base, user);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            defaults: base.defaults,
            expression: base.expression,
            controls: base.controls,
            assets: base.assets,
        }
    }

    pub fn playback_defaults(&self) -> PlaybackDefaults {
        let fallback = PlaybackDefaults::default();
        let d = &self.defaults;
        PlaybackDefaults {
            volume: d.volume.unwrap_or(fallback.volume),
            bass_volume: d.bass_volume.unwrap_or(fallback.bass_volume),
            treble_volume: d.treble_volume.unwrap_or(fallback.treble_volume),
            tempo_coefficient: d.tempo_coefficient.unwrap_or(fallback.tempo_coefficient),
            play_expressions: d.play_expressions.unwrap_or(fallback.play_expressions),
            roll_pedaling: d.roll_pedaling.unwrap_or(fallback.roll_pedaling),
            use_midi_tempo_events: d
                .use_midi_tempo_events
                .unwrap_or(fallback.use_midi_tempo_events),
        }
    }

    pub fn expression_settings(&self) -> ExpressionSettings {
        let fallback = ExpressionSettings::default();
        let e = &self.expression;
        ExpressionSettings {
            default_note_velocity: e
                .default_note_velocity
                .unwrap_or(fallback.default_note_velocity),
            default_tempo: e
                .default_tempo
                .filter(|t| *t > 0.0)
                .unwrap_or(fallback.default_tempo),
            soft_pedal_ratio: e.soft_pedal_ratio.unwrap_or(fallback.soft_pedal_ratio),
            accent_bump: e.accent_bump.unwrap_or(fallback.accent_bump),
            half_boundary: e.half_boundary.unwrap_or(fallback.half_boundary),
        }
    }

    /// Coefficient change for one volume up/down press.
    pub fn volume_step(&self) -> f64 {
        self.controls.volume_step.unwrap_or(0.1).abs()
    }

    /// Coefficient change for one tempo up/down press.
    pub fn tempo_step(&self) -> f64 {
        self.controls.tempo_step.unwrap_or(0.05).abs()
    }

    pub fn seek_ticks(&self) -> u64 {
        self.controls.seek_ticks.unwrap_or(1000)
    }

    /// Directory holding `<roll id>.mid` files.
    pub fn midi_dir(&self) -> PathBuf {
        PathBuf::from(self.assets.midi_dir.as_deref().unwrap_or("assets/midi"))
    }

    pub fn sample_settings(&self) -> SampleSettings {
        SampleSettings {
            url: self
                .assets
                .samples_url
                .clone()
                .unwrap_or_else(|| "assets/samples/".to_string()),
            velocities: self.assets.sample_velocities.unwrap_or(2),
            max_polyphony: self.assets.max_polyphony.unwrap_or(64),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pianolatron").join("config.toml"))
}

macro_rules! overlay {
    ($base:expr, $user:expr, $($field:ident),+ $(,)?) => {
        $(
            if $user.$field.is_some() {
                $base.$field = $user.$field;
            }
        )+
    };
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    overlay!(
        base.defaults,
        user.defaults,
        volume,
        bass_volume,
        treble_volume,
        tempo_coefficient,
        play_expressions,
        roll_pedaling,
        use_midi_tempo_events,
    );
    overlay!(
        base.expression,
        user.expression,
        default_note_velocity,
        default_tempo,
        soft_pedal_ratio,
        accent_bump,
        half_boundary,
    );
    overlay!(base.controls, user.controls, volume_step, tempo_step, seek_ticks);
    overlay!(
        base.assets,
        user.assets,
        midi_dir,
        samples_url,
        sample_velocities,
        max_polyphony,
    );
}
