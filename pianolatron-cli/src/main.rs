use std::cell::Cell;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use pianolatron_core::annotate::{annotate, NoteVelocities};
use pianolatron_core::config::Config;
use pianolatron_core::dispatch::dispatch_action;
use pianolatron_core::engine;
use pianolatron_core::loader::{load_roll_file, LoadOutcome};
use pianolatron_core::metadata::RollMetadata;
use pianolatron_core::midi::{parse_roll_midi, ParsedMidi};
use pianolatron_core::piano::PianoBackend;
use pianolatron_core::state::AppState;
use pianolatron_core::tempo_map::TempoMap;
use pianolatron_types::{
    expression_box_for, hole_label, note_name, Coefficient, Hole, PlaybackAction, RollEventKind,
    Toggle,
};

/// Simulated frame length for `play`.
const FRAME: Duration = Duration::from_millis(10);

const USAGE: &str = "\
usage: pianolatron [-v] <command> ...

commands:
  annotate <roll.mid> <holes.json> [--scroll-up]   print annotated holes as JSON
  info <roll.mid>                                  print roll metadata and tempo map
  play <roll.mid | roll id> [options]              print the piano commands of a performance

play options:
  --tempo <coefficient>     scale the roll's tempo
  --volume <coefficient>    master volume
  --no-expressions          ignore roll velocities
  --no-roll-pedaling        ignore the roll's pedal events
  --no-midi-tempo           ignore the roll's tempo events";

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pianolatron")
        .join("pianolatron.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = File::create(&log_path).unwrap_or_else(|_| {
        File::create(std::env::temp_dir().join("pianolatron.log")).expect("Cannot create log file")
    });

    WriteLogger::init(log_level, simplelog::Config::default(), log_file)
        .expect("Failed to initialize logger");

    log::info!("pianolatron starting (log level: {:?})", log_level);
}

/// Piano that prints every command with its position in the performance.
struct PrintPiano {
    seconds: Cell<f64>,
}

impl PrintPiano {
    fn emit(&self, what: std::fmt::Arguments<'_>) {
        println!("{:>9.3}s  {}", self.seconds.get(), what);
    }
}

impl PianoBackend for PrintPiano {
    fn key_down(&self, midi: u8, velocity: f64) {
        self.emit(format_args!("key_down {:<5} {:.3}", note_name(midi), velocity));
    }
    fn key_up(&self, midi: u8) {
        self.emit(format_args!("key_up   {}", note_name(midi)));
    }
    fn pedal_down(&self) {
        self.emit(format_args!("pedal_down"));
    }
    fn pedal_up(&self) {
        self.emit(format_args!("pedal_up"));
    }
}

fn invalid(msg: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Positional arguments, skipping flags and the values of the flags that
/// take one.
fn positionals(args: &[String]) -> Vec<&str> {
    const WITH_VALUE: [&str; 2] = ["--tempo", "--volume"];
    let mut out = Vec::new();
    let mut skip = false;
    for a in args {
        if skip {
            skip = false;
            continue;
        }
        if WITH_VALUE.contains(&a.as_str()) {
            skip = true;
        } else if !a.starts_with('-') {
            out.push(a.as_str());
        }
    }
    out
}

fn read_roll(path: &Path) -> io::Result<(RollMetadata, ParsedMidi)> {
    let bytes = std::fs::read(path)?;
    let parsed = parse_roll_midi(&bytes).map_err(invalid)?;
    let metadata = RollMetadata::from_events(parsed.metadata_events());
    Ok((metadata, parsed))
}

fn run_annotate(args: &[String]) -> io::Result<()> {
    let pos = positionals(args);
    let (Some(roll_path), Some(holes_path)) = (pos.first(), pos.get(1)) else {
        return Err(invalid(USAGE));
    };
    let scroll_downwards = !args.iter().any(|a| a == "--scroll-up");

    let (metadata, parsed) = read_roll(Path::new(roll_path))?;
    let meta = metadata.roll_meta().map_err(invalid)?;
    let velocities = NoteVelocities::from_events(&parsed.events);

    let holes_json = std::fs::read_to_string(holes_path)?;
    let mut holes: Vec<Hole> = serde_json::from_str(&holes_json).map_err(invalid)?;
    annotate(&mut holes, &meta, scroll_downwards, &velocities);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &holes).map_err(invalid)?;
    writeln!(out)
}

fn run_info(args: &[String]) -> io::Result<()> {
    let pos = positionals(args);
    let Some(roll_path) = pos.first() else {
        return Err(invalid(USAGE));
    };
    let (metadata, parsed) = read_roll(Path::new(roll_path))?;

    for (key, value) in metadata.iter() {
        println!("{:<16} {}", key, value);
    }
    println!();
    println!("ticks per beat   {}", parsed.ticks_per_beat);
    println!("total ticks      {}", parsed.total_ticks);

    let tempo_map = TempoMap::from_events(parsed.metadata_events());
    println!("tempo changes    {}", tempo_map.entries().len());
    for (tick, bpm) in tempo_map.entries() {
        println!("  {:>8}  {} bpm", tick, bpm);
    }

    if let Some(roll_type) = metadata.roll_type() {
        let mut used: Vec<u8> = parsed
            .events
            .iter()
            .filter_map(|e| match e.kind {
                RollEventKind::NoteOn { note, .. } if !e.is_metadata() => Some(note),
                _ => None,
            })
            .collect();
        used.sort_unstable();
        used.dedup();
        let labels: Vec<String> = used.iter().map(|&m| hole_label(m, roll_type)).collect();
        println!("holes used       {}", labels.join(" "));

        if let Some(expression_box) = expression_box_for(roll_type) {
            let json = serde_json::to_string(&expression_box).map_err(invalid)?;
            println!("expression box   {}", json);
        }
    }
    Ok(())
}

/// Resolve a `play` argument to (directory, roll id): a `.mid` path is used
/// as is, anything else is a roll id in the configured MIDI directory.
fn roll_location(arg: &str, config: &Config) -> (PathBuf, String) {
    let path = Path::new(arg);
    if path.extension().is_some_and(|e| e == "mid") {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (dir, id)
    } else {
        (config.midi_dir(), arg.to_string())
    }
}

fn run_play(args: &[String], config: &Config) -> io::Result<()> {
    let pos = positionals(args);
    let Some(roll) = pos.first() else {
        return Err(invalid(USAGE));
    };
    let (dir, id) = roll_location(roll, config);

    let piano = PrintPiano {
        seconds: Cell::new(0.0),
    };
    let samples = config.sample_settings();
    log::info!(
        "simulated piano stands in for samples at {} ({} velocity layers, polyphony {})",
        samples.url,
        samples.velocities,
        samples.max_polyphony
    );
    let mut state = AppState::from_config(config);
    state.samples_ready = true;

    if load_roll_file(&mut state, &piano, &dir, &id) != LoadOutcome::Applied {
        let message = state
            .take_notifications()
            .into_iter()
            .map(|n| n.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(invalid(message));
    }

    let mut actions = Vec::new();
    if let Some(v) = flag_value(args, "--tempo") {
        let v: f64 = v.parse().map_err(invalid)?;
        actions.push(PlaybackAction::SetCoefficient(Coefficient::Tempo, v));
    }
    if let Some(v) = flag_value(args, "--volume") {
        let v: f64 = v.parse().map_err(invalid)?;
        actions.push(PlaybackAction::SetCoefficient(Coefficient::Volume, v));
    }
    for (flag, toggle) in [
        ("--no-expressions", Toggle::PlayExpressions),
        ("--no-roll-pedaling", Toggle::RollPedaling),
        ("--no-midi-tempo", Toggle::UseMidiTempoEvents),
    ] {
        if args.iter().any(|a| a == flag) {
            actions.push(PlaybackAction::SetToggle(toggle, false));
        }
    }
    actions.push(PlaybackAction::Play);

    for action in &actions {
        let result = dispatch_action(action, &mut state, &piano);
        for n in result.notifications {
            eprintln!("{}: {}", n.title, n.message);
        }
    }

    if let Some(title) = state.roll.as_ref().and_then(|r| r.metadata.get("TITLE")) {
        println!("# {}", title);
    }
    while state.playback.is_playing() {
        engine::advance(&mut state, &piano, FRAME);
        piano.seconds.set(piano.seconds.get() + FRAME.as_secs_f64());
    }
    println!(
        "# finished at tick {} ({:.0}%) after {:.1}s",
        state.playback.current_tick,
        state.progress() * 100.0,
        piano.seconds.get()
    );
    Ok(())
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let config = Config::load();
    let pos = positionals(&args);
    let Some(&command) = pos.first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };
    let rest: Vec<String> = match args.iter().position(|a| a == command) {
        Some(i) => args[i + 1..].to_vec(),
        None => Vec::new(),
    };

    let result = match command {
        "annotate" => run_annotate(&rest),
        "info" => run_info(&rest),
        "play" => run_play(&rest, &config),
        other => {
            eprintln!("unknown command '{}'\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    };
    if let Err(e) = &result {
        log::error!("{} failed: {}", command, e);
    }
    result
}
