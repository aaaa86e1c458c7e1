//! Per-roll-type hole geometry: where the note perforations start and end,
//! and what each control perforation means.

use crate::RollType;

/// Static geometry and control-track layout of one roll type.
///
/// Only `bass_notes_begin` and `treble_notes_end` are present on every
/// profile; the 65-note roll has no control perforations at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollProfile {
    pub bass_ctrl_begin: Option<u8>,
    pub bass_ctrl_end: Option<u8>,
    pub bass_notes_begin: u8,
    pub bass_notes_end: Option<u8>,
    pub treble_notes_begin: Option<u8>,
    pub treble_notes_end: u8,
    pub treble_ctrl_begin: Option<u8>,
    pub treble_ctrl_end: Option<u8>,
    /// MIDI number -> control name. Sorted by MIDI number.
    pub ctrl_map: &'static [(u8, &'static str)],
}

impl RollProfile {
    /// Control name for a perforation, if the control track defines one.
    pub fn control_name(&self, midi_number: u8) -> Option<&'static str> {
        self.ctrl_map
            .binary_search_by_key(&midi_number, |&(m, _)| m)
            .ok()
            .map(|i| self.ctrl_map[i].1)
    }

    pub fn is_note(&self, midi_number: u8) -> bool {
        (self.bass_notes_begin..=self.treble_notes_end).contains(&midi_number)
    }
}

static WELTE_RED: RollProfile = RollProfile {
    bass_ctrl_begin: Some(14),
    bass_ctrl_end: Some(23),
    bass_notes_begin: 24,
    bass_notes_end: Some(66),
    treble_notes_begin: Some(67),
    treble_notes_end: 103,
    treble_ctrl_begin: Some(104),
    treble_ctrl_end: Some(113),
    ctrl_map: &[
        (14, "mf_off"),
        (15, "mf_on"),
        (16, "cresc_off"),
        (17, "cresc_on"),
        (18, "sf_off"),
        (19, "sf_on"),
        (20, "soft_off"),
        (21, "soft_on"),
        (22, "motor_off"),
        (23, "motor_on"),
        (104, "rewind"),
        (105, "elec_off"),
        (106, "sust_on"),
        (107, "sust_off"),
        (108, "sf_on"),
        (109, "sf_off"),
        (110, "cresc_on"),
        (111, "cresc_off"),
        (112, "mf_on"),
        (113, "mf_off"),
    ],
};

static WELTE_GREEN: RollProfile = RollProfile {
    bass_ctrl_begin: Some(16),
    bass_ctrl_end: Some(20),
    bass_notes_begin: 21,
    bass_notes_end: Some(66),
    treble_notes_begin: Some(67),
    treble_notes_end: 108,
    treble_ctrl_begin: Some(109),
    treble_ctrl_end: Some(113),
    ctrl_map: &[
        (16, "sfp"),
        (17, "mf"),
        (18, "sust"),
        (19, "cresc"),
        (20, "sff"),
        (109, "sff"),
        (110, "cresc"),
        (111, "soft"),
        (112, "mf"),
        (113, "sfp"),
    ],
};

static WELTE_LICENSEE: RollProfile = RollProfile {
    bass_ctrl_begin: Some(16),
    bass_ctrl_end: Some(23),
    bass_notes_begin: 24,
    bass_notes_end: Some(66),
    treble_notes_begin: Some(67),
    treble_notes_end: 103,
    treble_ctrl_begin: Some(104),
    treble_ctrl_end: Some(113),
    ctrl_map: &[
        (16, "mf_off"),
        (17, "mf_on"),
        (18, "cresc_off"),
        (19, "cresc_on"),
        (20, "sf_on"),
        (21, "sf_off"),
        (22, "soft_on"),
        (23, "soft_off"),
        (104, "rewind"),
        (106, "sust_on"),
        (107, "sust_off"),
        (108, "sf_on"),
        (109, "sf_off"),
        (110, "cresc_on"),
        (111, "cresc_off"),
        (112, "mf_on"),
        (113, "mf_off"),
    ],
};

static SIXTY_FIVE_NOTE: RollProfile = RollProfile {
    bass_ctrl_begin: None,
    bass_ctrl_end: None,
    bass_notes_begin: 33,
    bass_notes_end: None,
    treble_notes_begin: None,
    treble_notes_end: 97,
    treble_ctrl_begin: None,
    treble_ctrl_end: None,
    ctrl_map: &[],
};

static EIGHTY_EIGHT_NOTE: RollProfile = RollProfile {
    bass_ctrl_begin: Some(15),
    bass_ctrl_end: Some(20),
    bass_notes_begin: 21,
    bass_notes_end: Some(64),
    treble_notes_begin: Some(65),
    treble_notes_end: 108,
    treble_ctrl_begin: Some(109),
    treble_ctrl_end: Some(110),
    ctrl_map: &[
        (16, "rewind"),
        (18, "sust"),
        (19, "acc"),
        (20, "acc"),
        (109, "acc"),
        (110, "acc"),
    ],
};

pub fn profile_for(roll_type: RollType) -> &'static RollProfile {
    match roll_type {
        RollType::WelteRed => &WELTE_RED,
        RollType::WelteGreen => &WELTE_GREEN,
        RollType::WelteLicensee => &WELTE_LICENSEE,
        RollType::SixtyFiveNote => &SIXTY_FIVE_NOTE,
        RollType::EightyEightNote => &EIGHTY_EIGHT_NOTE,
    }
}

/// Look up a profile by its metadata name. Unknown roll types have no geometry.
pub fn profile_for_name(name: &str) -> Option<&'static RollProfile> {
    RollType::from_name(name).map(profile_for)
}

const NOTE_NAMES: [&str; 12] = [
    "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
];

/// Scientific pitch name, e.g. 60 -> "C4".
pub fn note_name(midi_number: u8) -> String {
    let octave = i32::from(midi_number) / 12 - 1;
    let index = (i32::from(midi_number) - 21).rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[index], octave)
}

/// Human-readable label for a perforation on a roll of the given type.
pub fn hole_label(midi_number: u8, roll_type: RollType) -> String {
    let profile = profile_for(roll_type);
    if profile.is_note(midi_number) {
        return note_name(midi_number);
    }
    match profile.control_name(midi_number) {
        Some(name) => name.to_string(),
        None => format!("mid_{}", midi_number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_maps_are_sorted_for_binary_search() {
        for t in RollType::ALL {
            let map = profile_for(t).ctrl_map;
            assert!(map.windows(2).all(|w| w[0].0 < w[1].0), "{} not sorted", t);
        }
    }

    #[test]
    fn control_name_lookup() {
        let red = profile_for(RollType::WelteRed);
        assert_eq!(red.control_name(20), Some("soft_off"));
        assert_eq!(red.control_name(106), Some("sust_on"));
        assert_eq!(red.control_name(50), None);
        assert_eq!(profile_for(RollType::SixtyFiveNote).control_name(20), None);
    }

    #[test]
    fn unknown_profile_name_has_no_geometry() {
        assert!(profile_for_name("welte-blue").is_none());
        assert_eq!(profile_for_name("88-note"), Some(&EIGHTY_EIGHT_NOTE));
    }

    #[test]
    fn note_names() {
        assert_eq!(note_name(21), "A0");
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(69), "A4");
        assert_eq!(note_name(108), "C8");
    }

    #[test]
    fn hole_labels_cover_notes_controls_and_unknowns() {
        assert_eq!(hole_label(60, RollType::EightyEightNote), "C4");
        assert_eq!(hole_label(16, RollType::EightyEightNote), "rewind");
        assert_eq!(hole_label(17, RollType::EightyEightNote), "mid_17");
        assert_eq!(hole_label(10, RollType::SixtyFiveNote), "mid_10");
    }
}
