//! Error types for roll loading and annotation.
//!
//! Lookups that can legitimately come up empty (unknown roll type, no
//! expression box, no tempo map) return `Option` rather than one of these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The roll's MIDI file could not be read.
    #[error("Error fetching MIDI file! ({0})")]
    Io(#[from] std::io::Error),

    /// The bytes are not a Standard MIDI File.
    #[error("Invalid MIDI data: {0}")]
    Midi(#[from] midly::Error),

    /// The file parsed but contains no tracks, so there is no metadata track.
    #[error("MIDI file has no tracks")]
    NoTracks,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnnotateError {
    #[error("Roll metadata is missing {0}")]
    MissingMetadata(&'static str),

    #[error("Unknown roll type '{0}'")]
    UnknownRollType(String),

    #[error("Roll metadata {key} is not a number: '{value}'")]
    BadNumber { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(LoadError::NoTracks.to_string(), "MIDI file has no tracks");
        let err = AnnotateError::BadNumber {
            key: "IMAGE_LENGTH",
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Roll metadata IMAGE_LENGTH is not a number: 'abc'"
        );
    }
}
