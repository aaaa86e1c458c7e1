mod common;

use common::RollBuilder;
use pianolatron_core::annotate::{annotate, NoteVelocities};
use pianolatron_core::error::AnnotateError;
use pianolatron_core::metadata::RollMetadata;
use pianolatron_core::midi::parse_roll_midi;
use pianolatron_types::{Hole, HoleColor, HoleType, HOLE_COLOR_MAP};

fn decode(roll: &RollBuilder) -> (RollMetadata, NoteVelocities) {
    let parsed = parse_roll_midi(&roll.bytes()).unwrap();
    (
        RollMetadata::from_events(parsed.metadata_events()),
        NoteVelocities::from_events(&parsed.events),
    )
}

#[test]
fn annotates_holes_from_a_loaded_roll() {
    let roll = RollBuilder::new("welte-red")
        .meta("FIRST_HOLE", "200")
        .note(0, 60, 30)
        .note(50, 60, 0)
        .note(100, 67, 90)
        .note(150, 67, 0);
    let (metadata, velocities) = decode(&roll);
    let meta = metadata.roll_meta().unwrap();
    assert_eq!(meta.first_hole, 200);

    let mut holes = vec![
        Hole::new(200, 50, 60),
        Hole::new(300, 50, 67),
        Hole::new(400, 30, 106),
        Hole::new(500, 30, 10),
    ];
    annotate(&mut holes, &meta, false, &velocities);

    assert_eq!(holes[0].start_y, Some(10_000 - 200 - 50));
    assert_eq!(holes[0].end_y, Some(10_000 - 200));
    assert_eq!(holes[0].v, Some(30.0));
    assert_eq!(holes[0].color.as_deref(), Some(HOLE_COLOR_MAP[0]));
    assert_eq!(holes[1].color.as_deref(), Some(HOLE_COLOR_MAP[14]));
    assert_eq!(holes[1].hole_type, Some(HoleType::Note));

    // welte-red 106 is "sust_on"
    assert_eq!(holes[2].hole_type, Some(HoleType::Pedal));
    assert_eq!(holes[2].color.as_deref(), Some(HoleColor::PEDAL));
    assert_eq!(holes[3].hole_type, None);
    assert_eq!(holes[3].color.as_deref(), Some(HoleColor::DEFAULT));
}

#[test]
fn single_velocity_roll_uses_middle_colour() {
    let roll = RollBuilder::new("88-note")
        .note(0, 50, 64)
        .note(10, 52, 64)
        .note(20, 50, 0);
    let (metadata, velocities) = decode(&roll);
    let meta = metadata.roll_meta().unwrap();
    let mut holes = vec![Hole::new(0, 10, 50), Hole::new(10, 10, 52)];
    annotate(&mut holes, &meta, true, &velocities);
    for hole in &holes {
        assert_eq!(hole.color.as_deref(), Some(HOLE_COLOR_MAP[7]));
    }
}

#[test]
fn unknown_roll_type_is_reported() {
    let roll = RollBuilder::new("welte-blue");
    let (metadata, _) = decode(&roll);
    assert_eq!(metadata.roll_type(), None);
    assert_eq!(
        metadata.roll_meta(),
        Err(AnnotateError::UnknownRollType("welte-blue".to_string()))
    );
}

#[test]
fn annotated_holes_serialize_with_short_names() {
    let roll = RollBuilder::new("65-note").note(0, 40, 70);
    let (metadata, velocities) = decode(&roll);
    let meta = metadata.roll_meta().unwrap();
    let mut holes: Vec<Hole> =
        serde_json::from_str(r#"[{"x": 5, "y": 0, "w": 3, "h": 12, "m": 40}]"#).unwrap();
    annotate(&mut holes, &meta, true, &velocities);

    let json = serde_json::to_value(&holes).unwrap();
    let hole = &json[0];
    assert_eq!(hole["x"], 5);
    assert_eq!(hole["startY"], 0);
    assert_eq!(hole["endY"], 12);
    assert_eq!(hole["type"], "note");
    assert_eq!(hole["v"], 70.0);
}
