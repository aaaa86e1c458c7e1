//! Small numeric helpers shared by annotation and playback.

/// Round `value` to `precision` decimal places, halves away from zero.
pub fn enforce_precision(value: f64, precision: u32) -> f64 {
    let multiplier = 10f64.powi(precision as i32);
    (value * multiplier).round() / multiplier
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Position of `value` between `min` and `max` as a fraction in [0, 1].
/// A zero-width range maps everything to the midpoint.
pub fn normalize_in_range(value: f64, min: f64, max: f64) -> f64 {
    if max - min == 0.0 {
        return 0.5;
    }
    (value - min) / (max - min)
}

/// Inverse of [`normalize_in_range`]: scale a [0, 1] fraction onto `[min, max]`.
pub fn map_to_range(value: f64, min: f64, max: f64) -> f64 {
    value * (max - min) + min
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precision_rounds_half_away_from_zero() {
        assert_eq!(enforce_precision(0.125, 2), 0.13);
        assert_eq!(enforce_precision(64.0, 2), 64.0);
        assert_eq!(enforce_precision(1.23456, 2), 1.23);
        assert_eq!(enforce_precision(-0.5, 0), -1.0);
    }

    #[test]
    fn normalize_zero_span_is_midpoint() {
        assert_eq!(normalize_in_range(42.0, 42.0, 42.0), 0.5);
        assert_eq!(normalize_in_range(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize_in_range(10.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn map_to_range_scales() {
        assert_eq!(map_to_range(0.5, 0.0, 14.0), 7.0);
        assert_eq!(map_to_range(0.0, 2.0, 4.0), 2.0);
    }

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.3, 0.0, 1.0), 0.3);
    }
}
