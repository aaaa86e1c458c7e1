use std::ops::RangeInclusive;

use crate::{Coefficient, PlaybackState, TEMPO_COEFFICIENT_RANGE, VOLUME_RANGE};

fn slot(state: &mut PlaybackState, c: Coefficient) -> (&mut f64, RangeInclusive<f64>) {
    match c {
        Coefficient::Volume => (&mut state.volume, VOLUME_RANGE),
        Coefficient::BassVolume => (&mut state.bass_volume, VOLUME_RANGE),
        Coefficient::TrebleVolume => (&mut state.treble_volume, VOLUME_RANGE),
        Coefficient::Tempo => (&mut state.tempo_coefficient, TEMPO_COEFFICIENT_RANGE),
    }
}

fn store(value: &mut f64, range: RangeInclusive<f64>, new: f64) -> bool {
    if !new.is_finite() {
        return false;
    }
    let new = crate::util::clamp(new, *range.start(), *range.end());
    if *value == new {
        return false;
    }
    *value = new;
    true
}

pub(super) fn set(state: &mut PlaybackState, c: Coefficient, value: f64) -> bool {
    let (v, range) = slot(state, c);
    store(v, range, value)
}

pub(super) fn adjust(state: &mut PlaybackState, c: Coefficient, delta: f64) -> bool {
    let (v, range) = slot(state, c);
    // Keep keyboard stepping on a clean 0.01 grid.
    let target = crate::util::enforce_precision(*v + delta, 2);
    store(v, range, target)
}
