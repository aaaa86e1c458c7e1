//! Two-phase roll loading.
//!
//! [`begin_load`] records the requested roll and hands out a [`LoadTicket`];
//! the bytes are fetched however the front end likes, then handed to
//! [`finish_load`]. Only the ticket from the most recent request may apply,
//! so a slow fetch for a roll the user has already moved away from is
//! dropped instead of replacing the newer one.

use std::path::{Path, PathBuf};

use pianolatron_types::{expression_box_for, Notification};

use crate::annotate::NoteVelocities;
use crate::engine;
use crate::error::LoadError;
use crate::metadata::RollMetadata;
use crate::midi::{parse_roll_midi, ParsedMidi};
use crate::piano::PianoBackend;
use crate::state::{AppState, LoadedRoll};
use crate::tempo_map::TempoMap;

/// Identifies one roll load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    roll_id: String,
    generation: u64,
}

impl LoadTicket {
    pub fn roll_id(&self) -> &str {
        &self.roll_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The roll is installed and playback was reset.
    Applied,
    /// A newer request superseded this one; nothing changed.
    Stale,
    /// Fetch or decode failed; the previous roll is current again and an
    /// error notification was queued.
    Failed,
}

/// `<dir>/<roll id>.mid`
pub fn midi_path(dir: &Path, roll_id: &str) -> PathBuf {
    dir.join(format!("{}.mid", roll_id))
}

/// Make `roll_id` the current roll and start a load for it. Returns `None`
/// when that roll is already the loaded one. Either way any load still in
/// flight is superseded.
pub fn begin_load(state: &mut AppState, roll_id: &str) -> Option<LoadTicket> {
    state.loads.current = Some(roll_id.to_string());
    state.loads.generation += 1;
    if state.loads.previous.as_deref() == Some(roll_id)
        && state.roll.as_ref().is_some_and(|r| r.id == roll_id)
    {
        return None;
    }
    log::info!(target: "loader", "loading roll {} (generation {})", roll_id, state.loads.generation);
    Some(LoadTicket {
        roll_id: roll_id.to_string(),
        generation: state.loads.generation,
    })
}

/// Complete a load with the fetched bytes or the fetch error.
pub fn finish_load(
    state: &mut AppState,
    piano: &dyn PianoBackend,
    ticket: LoadTicket,
    bytes: Result<Vec<u8>, LoadError>,
) -> LoadOutcome {
    if ticket.generation != state.loads.generation {
        log::info!(
            target: "loader",
            "dropping stale load of {} (generation {}, latest {})",
            ticket.roll_id,
            ticket.generation,
            state.loads.generation
        );
        return LoadOutcome::Stale;
    }

    match bytes.and_then(|b| parse_roll_midi(&b)) {
        Ok(parsed) => {
            engine::reset_playback(state, piano);
            install_roll(state, ticket.roll_id.clone(), parsed);
            state.loads.previous = Some(ticket.roll_id);
            LoadOutcome::Applied
        }
        Err(e) => {
            log::warn!(target: "loader", "failed to load roll {}: {}", ticket.roll_id, e);
            state.notifications.push(Notification::error(e.to_string()));
            state.loads.current = state.loads.previous.clone();
            LoadOutcome::Failed
        }
    }
}

/// Load `<dir>/<roll id>.mid` synchronously.
pub fn load_roll_file(
    state: &mut AppState,
    piano: &dyn PianoBackend,
    dir: &Path,
    roll_id: &str,
) -> LoadOutcome {
    let Some(ticket) = begin_load(state, roll_id) else {
        return LoadOutcome::Applied;
    };
    let bytes = std::fs::read(midi_path(dir, roll_id)).map_err(LoadError::from);
    finish_load(state, piano, ticket, bytes)
}

fn install_roll(state: &mut AppState, id: String, parsed: ParsedMidi) {
    let metadata = RollMetadata::from_events(parsed.metadata_events());
    let roll_type = metadata.roll_type();
    if roll_type.is_none() {
        log::warn!(
            target: "loader",
            "roll {} has unknown roll type {:?}",
            id,
            metadata.get("ROLL_TYPE")
        );
    }
    let tempo_map = TempoMap::from_events(parsed.metadata_events());
    let velocities = NoteVelocities::from_events(&parsed.events);

    log::info!(
        target: "loader",
        "loaded roll {} \"{}\": {} events, {} ticks, {} tempo changes",
        id,
        metadata.get("TITLE").unwrap_or(""),
        parsed.events.len(),
        parsed.total_ticks,
        tempo_map.entries().len()
    );

    let roll = LoadedRoll {
        id,
        roll_type,
        expression_box: roll_type.and_then(expression_box_for),
        metadata,
        tempo_map,
        velocities,
        total_ticks: parsed.total_ticks,
        ticks_per_beat: parsed.ticks_per_beat,
        event_count: parsed.events.len(),
    };
    state
        .player
        .load(parsed.events, parsed.total_ticks, parsed.ticks_per_beat);
    state.roll = Some(roll);
    engine::recompute_tempo(state);
}
