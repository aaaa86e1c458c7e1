//! Hole classification and annotation for the roll image overlay.

use std::collections::BTreeMap;

use pianolatron_types::util::{enforce_precision, map_to_range, normalize_in_range};
use pianolatron_types::{
    profile_for, Hole, HoleColor, HoleType, RollEvent, RollEventKind, RollType, HOLE_COLOR_MAP,
};

/// Roll geometry needed to place holes on the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollMeta {
    pub roll_type: RollType,
    /// Length of the roll image in pixels.
    pub image_length: i64,
    /// Image offset of the first hole; hole `y` minus this is the hole's tick.
    pub first_hole: i64,
}

/// Sparse note velocity lookup: tick -> (MIDI number -> velocity).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteVelocities {
    by_tick: BTreeMap<i64, BTreeMap<u8, f64>>,
}

impl NoteVelocities {
    /// Velocities of every sounding note-on in the roll's note tracks.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RollEvent>) -> Self {
        let mut v = Self::default();
        for event in events {
            if event.is_metadata() {
                continue;
            }
            if let RollEventKind::NoteOn { note, velocity } = event.kind {
                if velocity > 0 {
                    v.insert(event.tick as i64, note, f64::from(velocity));
                }
            }
        }
        v
    }

    pub fn insert(&mut self, tick: i64, midi_number: u8, velocity: f64) {
        self.by_tick.entry(tick).or_default().insert(midi_number, velocity);
    }

    pub fn get(&self, tick: i64, midi_number: u8) -> Option<f64> {
        self.by_tick.get(&tick)?.get(&midi_number).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.is_empty()
    }

    /// Lowest and highest velocity across the whole roll.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.by_tick
            .values()
            .flat_map(|notes| notes.values().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Classify a perforation by MIDI number on a roll of the given type.
///
/// Note range wins; then any control whose name mentions a pedal ("soft",
/// "sust") is a pedal; any other named control is a control. Numbers with
/// no meaning on this roll type are unclassified (`None`).
pub fn classify(midi_number: u8, roll_type: RollType) -> Option<HoleType> {
    let profile = profile_for(roll_type);
    if profile.is_note(midi_number) {
        return Some(HoleType::Note);
    }
    let name = profile.control_name(midi_number)?;
    if name.contains("soft") || name.contains("sust") {
        Some(HoleType::Pedal)
    } else {
        Some(HoleType::Control)
    }
}

/// Same as [`classify`], keyed by the roll type's metadata name. Unknown
/// roll types have no geometry and classify nothing.
pub fn classify_by_name(midi_number: u8, roll_type: &str) -> Option<HoleType> {
    RollType::from_name(roll_type).and_then(|t| classify(midi_number, t))
}

/// Ramp colour for a note velocity, relative to the roll's velocity bounds.
/// Missing or zero velocity gets the default colour.
fn note_color(velocity: Option<f64>, bounds: Option<(f64, f64)>) -> &'static str {
    let (Some(v), Some((min, max))) = (velocity, bounds) else {
        return HoleColor::DEFAULT;
    };
    if v == 0.0 || v.is_nan() {
        return HoleColor::DEFAULT;
    }
    let last = (HOLE_COLOR_MAP.len() - 1) as f64;
    let index = map_to_range(normalize_in_range(v, min, max), 0.0, last)
        .round()
        .clamp(0.0, last) as usize;
    HOLE_COLOR_MAP[index]
}

/// Annotate holes in place with image coordinates, velocity, type and colour.
///
/// `scroll_downwards` tells whether `y` already runs top-to-bottom on the
/// image; for upward-scrolling rolls the coordinates are flipped. The colour
/// ramp is relative to the lowest and highest velocity in `velocities`.
pub fn annotate(
    holes: &mut [Hole],
    meta: &RollMeta,
    scroll_downwards: bool,
    velocities: &NoteVelocities,
) {
    let bounds = velocities.bounds();

    for hole in holes.iter_mut() {
        if scroll_downwards {
            hole.start_y = Some(hole.y);
            hole.end_y = Some(hole.y + hole.h);
        } else {
            hole.start_y = Some(meta.image_length - hole.y - hole.h);
            hole.end_y = Some(meta.image_length - hole.y);
        }

        let tick_on = hole.y - meta.first_hole;
        hole.v = velocities
            .get(tick_on, hole.m)
            .map(|v| enforce_precision(v, 2));

        let hole_type = classify(hole.m, meta.roll_type);
        let color = match hole_type {
            Some(HoleType::Pedal) => HoleColor::PEDAL,
            Some(HoleType::Control) => HoleColor::CONTROL,
            Some(HoleType::Note) => note_color(hole.v, bounds),
            None => HoleColor::DEFAULT,
        };
        hole.hole_type = hole_type;
        hole.color = Some(color.to_string());
    }

    log::debug!(
        target: "annotate",
        "annotated {} holes on {} roll (velocity bounds {:?})",
        holes.len(),
        meta.roll_type,
        bounds
    );
}
