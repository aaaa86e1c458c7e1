//! The roll's tick scheduler.
//!
//! `Player` owns the merged event stream of the loaded roll and turns
//! elapsed wall-clock time into tick advancement at the current tempo,
//! handing back the events that became due. It knows nothing about pedals,
//! velocities or the piano; the engine interprets what it emits.

use std::time::Duration;

use pianolatron_types::{RollEvent, Tick};

/// Events released by one scheduler step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStep {
    pub events: Vec<RollEvent>,
    /// The stream ran out during this step.
    pub end_of_stream: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    events: Vec<RollEvent>,
    /// Index of the next event to emit.
    next: usize,
    /// Fractional tick position.
    position: f64,
    total_ticks: Tick,
    ticks_per_beat: u16,
    /// Beats per minute.
    tempo: f64,
    playing: bool,
}

impl Player {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next: 0,
            position: 0.0,
            total_ticks: 0,
            ticks_per_beat: 480,
            tempo: 60.0,
            playing: false,
        }
    }

    /// Replace the loaded stream. Events must be ordered by tick.
    pub fn load(&mut self, events: Vec<RollEvent>, total_ticks: Tick, ticks_per_beat: u16) {
        self.events = events;
        self.total_ticks = total_ticks;
        self.ticks_per_beat = ticks_per_beat.max(1);
        self.next = 0;
        self.position = 0.0;
        self.playing = false;
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Halt and rewind to the start.
    pub fn stop(&mut self) {
        self.playing = false;
        self.skip_to_tick(0);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_tempo(&mut self, bpm: f64) {
        if bpm.is_finite() && bpm > 0.0 {
            self.tempo = bpm;
        } else {
            log::warn!(target: "player", "ignoring invalid tempo {}", bpm);
        }
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn total_ticks(&self) -> Tick {
        self.total_ticks
    }

    pub fn current_tick(&self) -> Tick {
        self.position as Tick
    }

    /// Move the play position. Events before `tick` will not be emitted;
    /// events at `tick` will be.
    pub fn skip_to_tick(&mut self, tick: Tick) {
        let tick = tick.min(self.total_ticks);
        self.position = tick as f64;
        self.next = self.events.partition_point(|e| e.tick < tick);
    }

    /// Advance by `elapsed` at the current tempo and return the events that
    /// became due. Does nothing while paused.
    pub fn advance(&mut self, elapsed: Duration) -> PlayerStep {
        if !self.playing {
            return PlayerStep::default();
        }
        let ticks = elapsed.as_secs_f64() * self.tempo / 60.0 * f64::from(self.ticks_per_beat);
        self.advance_ticks(ticks)
    }

    /// Advance by a tick count directly.
    pub fn advance_ticks(&mut self, ticks: f64) -> PlayerStep {
        if !self.playing {
            return PlayerStep::default();
        }
        self.position = (self.position + ticks.max(0.0)).min(self.total_ticks as f64);
        let now = self.current_tick();

        let start = self.next;
        while self.next < self.events.len() && self.events[self.next].tick <= now {
            self.next += 1;
        }
        let events = self.events[start..self.next].to_vec();
        let end_of_stream = self.next >= self.events.len() && now >= self.total_ticks;
        if end_of_stream {
            self.playing = false;
        }
        PlayerStep {
            events,
            end_of_stream,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
