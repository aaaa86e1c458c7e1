use pianolatron_types::{RollEvent, RollEventKind, Tick};

/// Tempo breakpoints of a roll, in tick order.
///
/// Built once per loaded roll from the metadata track's Set Tempo events.
/// Each distinct tempo appears once, at the tick it first occurred.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TempoMap {
    entries: Vec<(Tick, f64)>,
}

impl TempoMap {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RollEvent>) -> Self {
        let mut entries: Vec<(Tick, f64)> = Vec::new();
        for event in events {
            if !event.is_metadata() {
                continue;
            }
            if let RollEventKind::SetTempo { bpm } = event.kind {
                if !entries.iter().any(|&(_, seen)| seen == bpm) {
                    entries.push((event.tick, bpm));
                }
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(Tick, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tempo in effect at `tick`: the last breakpoint at or before it, or the
    /// first breakpoint when `tick` precedes every entry. Falls back to
    /// `default_tempo` when the map is empty or MIDI tempo events are not used.
    pub fn tempo_at_tick(&self, tick: Tick, use_midi_tempo_events: bool, default_tempo: f64) -> f64 {
        if !use_midi_tempo_events {
            return default_tempo;
        }
        let Some(&(_, first)) = self.entries.first() else {
            return default_tempo;
        };
        let mut tempo = first;
        for &(entry_tick, bpm) in &self.entries {
            if entry_tick > tick {
                break;
            }
            tempo = bpm;
        }
        tempo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tempo(tick: Tick, track: usize, bpm: f64) -> RollEvent {
        RollEvent::new(tick, track, RollEventKind::SetTempo { bpm })
    }

    fn map() -> TempoMap {
        TempoMap::from_events(&[
            tempo(100, 0, 60.0),
            tempo(500, 0, 72.0),
            tempo(900, 0, 60.0),
            tempo(1200, 0, 80.0),
            tempo(1300, 1, 200.0),
        ])
    }

    #[test]
    fn dedups_against_every_previous_value() {
        assert_eq!(map().entries(), &[(100, 60.0), (500, 72.0), (1200, 80.0)]);
    }

    #[test]
    fn lookup_returns_latest_applicable_tempo() {
        let m = map();
        assert_eq!(m.tempo_at_tick(100, true, 60.0), 60.0);
        assert_eq!(m.tempo_at_tick(499, true, 60.0), 60.0);
        assert_eq!(m.tempo_at_tick(500, true, 60.0), 72.0);
        // 900 repeated an earlier tempo and was dropped
        assert_eq!(m.tempo_at_tick(1000, true, 60.0), 72.0);
        assert_eq!(m.tempo_at_tick(50_000, true, 60.0), 80.0);
    }

    #[test]
    fn tick_before_first_entry_uses_first_tempo() {
        let m = TempoMap::from_events(&[tempo(400, 0, 90.0), tempo(800, 0, 70.0)]);
        assert_eq!(m.tempo_at_tick(0, true, 60.0), 90.0);
    }

    #[test]
    fn default_when_empty_or_disabled() {
        assert_eq!(TempoMap::default().tempo_at_tick(10, true, 60.0), 60.0);
        assert_eq!(map().tempo_at_tick(600, false, 60.0), 60.0);
    }

    #[test]
    fn lookup_follows_map_order_as_tick_increases() {
        let m = map();
        let positions: Vec<usize> = (0..2000)
            .step_by(50)
            .map(|t| {
                let bpm = m.tempo_at_tick(t, true, 60.0);
                m.entries().iter().position(|&(_, b)| b == bpm).unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }
}
