use serde::{Deserialize, Serialize};

/// What a perforation does when it passes the tracker bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoleType {
    Note,
    Pedal,
    Control,
}

/// One perforation on a scanned roll.
///
/// The raw fields come from the roll's hole analysis: `y` is the leading
/// edge of the hole in the direction of scroll, `h` its length, `m` the
/// MIDI number of the tracker-bar channel. The remaining fields are filled
/// in by annotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i64>,
    pub y: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<i64>,
    pub h: i64,
    pub m: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<f64>,
    #[serde(rename = "startY", default, skip_serializing_if = "Option::is_none")]
    pub start_y: Option<i64>,
    #[serde(rename = "endY", default, skip_serializing_if = "Option::is_none")]
    pub end_y: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub hole_type: Option<HoleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Hole {
    pub fn new(y: i64, h: i64, m: u8) -> Self {
        Self {
            y,
            h,
            m,
            ..Self::default()
        }
    }
}

/// HSL colour triples ("H, S%, L%") used for hole overlays.
pub struct HoleColor;

impl HoleColor {
    /// Yellow: unclassified holes and notes without velocity data.
    pub const DEFAULT: &'static str = "60, 100%, 50%";
    /// Light green.
    pub const CONTROL: &'static str = "120, 73%, 75%";
    /// Orange.
    pub const PEDAL: &'static str = "39, 100%, 50%";
}

/// The "coolwarm" colour map, blue (soft) to red (loud).
pub const HOLE_COLOR_MAP: [&str; 15] = [
    "232, 53%, 49%",
    "229, 64%, 58%",
    "225, 78%, 66%",
    "223, 91%, 73%",
    "221, 98%, 79%",
    "219, 95%, 83%",
    "217, 73%, 86%",
    "21, 28%, 86%",
    "20, 69%, 83%",
    "18, 85%, 79%",
    "16, 85%, 73%",
    "13, 80%, 67%",
    "9, 70%, 59%",
    "2, 59%, 51%",
    "348, 96%, 36%",
];
