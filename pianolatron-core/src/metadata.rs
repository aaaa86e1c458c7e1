//! Roll metadata carried as `@KEY: value` text events on the MIDI file's
//! first track.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use pianolatron_types::{RollEvent, RollEventKind, RollType};

use crate::annotate::RollMeta;
use crate::error::AnnotateError;

fn metadata_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@([^:]*):[\t\s]*(.*)$").expect("valid metadata regex"))
}

fn decimal_entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#(\d+);").expect("valid entity regex"))
}

fn hex_entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#x([A-Za-z0-9]+);").expect("valid entity regex"))
}

fn entity_char(caps: &Captures<'_>, radix: u32) -> String {
    u32::from_str_radix(&caps[1], radix)
        .ok()
        .and_then(char::from_u32)
        .map(String::from)
        .unwrap_or_else(|| caps[0].to_string())
}

/// Replace numeric HTML character references (`&#233;`, `&#xE9;`).
/// References that do not name a valid code point are left as written.
pub fn decode_html_entities(s: &str) -> String {
    let decimal = decimal_entity_regex().replace_all(s, |caps: &Captures<'_>| entity_char(caps, 10));
    hex_entity_regex()
        .replace_all(&decimal, |caps: &Captures<'_>| entity_char(caps, 16))
        .into_owned()
}

/// Split one `@KEY: value` text event into its decoded key and value.
pub fn parse_text_event(text: &str) -> Option<(String, String)> {
    let caps = metadata_regex().captures(text)?;
    Some((decode_html_entities(&caps[1]), decode_html_entities(&caps[2])))
}

/// Flat key -> value map of a roll's metadata text events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollMetadata {
    entries: BTreeMap<String, String>,
}

impl RollMetadata {
    /// Collect the metadata track's text events. Text that does not follow the
    /// `@KEY: value` pattern is skipped; a repeated key keeps its last value.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RollEvent>) -> Self {
        let mut entries = BTreeMap::new();
        for event in events {
            if !event.is_metadata() {
                continue;
            }
            if let RollEventKind::Text(text) = &event.kind {
                match parse_text_event(text) {
                    Some((k, v)) => {
                        entries.insert(k, v);
                    }
                    None => log::debug!(target: "metadata", "skipping text event {:?}", text),
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The roll type, if present and recognized.
    pub fn roll_type(&self) -> Option<RollType> {
        self.get("ROLL_TYPE").and_then(RollType::from_name)
    }

    /// Geometry needed to annotate this roll's holes.
    pub fn roll_meta(&self) -> Result<RollMeta, AnnotateError> {
        let name = self
            .get("ROLL_TYPE")
            .ok_or(AnnotateError::MissingMetadata("ROLL_TYPE"))?;
        let roll_type = RollType::from_name(name)
            .ok_or_else(|| AnnotateError::UnknownRollType(name.to_string()))?;
        Ok(RollMeta {
            roll_type,
            image_length: self.int_field("IMAGE_LENGTH")?,
            first_hole: self.int_field("FIRST_HOLE")?,
        })
    }

    fn int_field(&self, key: &'static str) -> Result<i64, AnnotateError> {
        let raw = self.get(key).ok_or(AnnotateError::MissingMetadata(key))?;
        parse_int_prefix(raw).ok_or_else(|| AnnotateError::BadNumber {
            key,
            value: raw.to_string(),
        })
    }
}

/// Integer parsing with `parseInt` leniency: leading whitespace and an
/// optional sign, then as many digits as are present ("2400px" -> 2400).
fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}
