//! # pianolatron-core
//!
//! Roll engine for the Pianolatron player piano. Provides roll loading,
//! hole annotation, tempo lookup, the playback expression engine and action
//! dispatch, independent of any UI or audio framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pianolatron_core::config::Config;
//! use pianolatron_core::dispatch::dispatch_action;
//! use pianolatron_core::{engine, loader};
//! use pianolatron_core::piano::NullPiano;
//! use pianolatron_core::state::AppState;
//!
//! // 1. Create state with playback defaults from config
//! let config = Config::load();
//! let mut state = AppState::from_config(&config);
//! let piano = NullPiano;
//!
//! // 2. Load a roll (or begin_load / finish_load around an async fetch)
//! loader::load_roll_file(&mut state, &piano, &config.midi_dir(), "zb497jz4405");
//!
//! // 3. Dispatch user actions
//! let result = dispatch_action(&PlaybackAction::Play, &mut state, &piano);
//!
//! // 4. Drive the scheduler from the front end's clock
//! engine::advance(&mut state, &piano, frame_time);
//! ```
//!
//! ## Module Overview
//!
//! - [`state`]: `AppState`, the loaded roll, load generations
//! - [`dispatch`]: `dispatch_action()`, the entry point for user actions,
//!   and the recompute table applied after each control change
//! - [`engine`]: note velocity model, roll event handling, transport
//! - [`player`]: tick scheduler over the roll's event stream
//! - [`loader`]: two-phase roll loading with stale-request cancellation
//! - [`annotate`]: hole classification, coordinates and colours
//! - [`tempo_map`]: tempo breakpoints and lookup by tick
//! - [`metadata`]: `@KEY: value` roll metadata
//! - [`midi`]: SMF decoding via midly
//! - [`piano`]: `PianoBackend` trait and test doubles
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod annotate;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod loader;
pub mod metadata;
pub mod midi;
pub mod piano;
pub mod player;
pub mod state;
pub mod tempo_map;
