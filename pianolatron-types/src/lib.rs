//! # pianolatron-types
//!
//! Shared type definitions for the Pianolatron roll player.
//! This crate holds the static roll tables (profiles, expression boxes),
//! the hole and event data model, playback state, and the pure reducers
//! that mutate that state. Anything that touches a synthesizer, a MIDI
//! decoder or the filesystem lives in pianolatron-core.

pub mod action;
mod dispatch;
mod event;
mod expression;
mod hole;
mod profile;
pub mod reduce;
mod roll;
pub mod state;
pub mod util;

pub use action::*;
pub use dispatch::Dispatcher;
pub use event::{RollEvent, RollEventKind};
pub use expression::{expression_box_for, ExpressionBox};
pub use hole::{Hole, HoleColor, HoleType, HOLE_COLOR_MAP};
pub use profile::{hole_label, note_name, profile_for, profile_for_name, RollProfile};
pub use roll::{RollType, UnknownRollType};

pub use state::*;

/// Player tick position.
pub type Tick = u64;

/// MIDI controller numbers the roll's control track uses for pedalling.
pub mod controller {
    pub const SUSTAIN_PEDAL: u8 = 64;
    /// Una corda.
    pub const SOFT_PEDAL: u8 = 67;
    pub const PEDAL_ON: u8 = 127;
}
