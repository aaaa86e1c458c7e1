use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of scanned roll. Determines hole geometry and which control
/// perforations exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollType {
    #[serde(rename = "welte-red")]
    WelteRed,
    #[serde(rename = "welte-green")]
    WelteGreen,
    #[serde(rename = "welte-licensee")]
    WelteLicensee,
    #[serde(rename = "65-note")]
    SixtyFiveNote,
    #[serde(rename = "88-note")]
    EightyEightNote,
}

impl RollType {
    pub const ALL: [RollType; 5] = [
        RollType::WelteRed,
        RollType::WelteGreen,
        RollType::WelteLicensee,
        RollType::SixtyFiveNote,
        RollType::EightyEightNote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RollType::WelteRed => "welte-red",
            RollType::WelteGreen => "welte-green",
            RollType::WelteLicensee => "welte-licensee",
            RollType::SixtyFiveNote => "65-note",
            RollType::EightyEightNote => "88-note",
        }
    }

    /// Parse the hyphenated name used in roll metadata. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for RollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a roll type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRollType(pub String);

impl fmt::Display for UnknownRollType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown roll type '{}'", self.0)
    }
}

impl std::error::Error for UnknownRollType {}

impl FromStr for RollType {
    type Err = UnknownRollType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownRollType(s.to_string()))
    }
}
