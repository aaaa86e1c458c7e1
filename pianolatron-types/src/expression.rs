use serde::Serialize;

use crate::RollType;

/// Dynamics constants of a reproducing-piano expression mechanism.
///
/// Pressures are in the arbitrary units of the Welte expression box. The
/// three `*_step` fields are the pressure change per tick in the slow,
/// fast crescendo and fast decrescendo regimes, derived from the other
/// constants when the box is built. Build a new box to change constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionBox {
    welte_p: f64,
    welte_mf: f64,
    welte_f: f64,
    welte_loud: f64,
    left_adjust: f64,
    cresc_rate: f64,
    slow_decay_rate: f64,
    fast_c_decay_rate: f64,
    fast_d_decay_rate: f64,
    slow_step: f64,
    fast_c_step: f64,
    fast_d_step: f64,
}

impl ExpressionBox {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        welte_p: f64,
        welte_mf: f64,
        welte_f: f64,
        welte_loud: f64,
        left_adjust: f64,
        cresc_rate: f64,
        slow_decay_rate: f64,
        fast_c_decay_rate: f64,
        fast_d_decay_rate: f64,
    ) -> Self {
        Self {
            welte_p,
            welte_mf,
            welte_f,
            welte_loud,
            left_adjust,
            cresc_rate,
            slow_decay_rate,
            fast_c_decay_rate,
            fast_d_decay_rate,
            slow_step: (welte_mf - welte_p) / slow_decay_rate,
            fast_c_step: (welte_mf - welte_p) / fast_c_decay_rate,
            fast_d_step: (welte_f - welte_p) / fast_d_decay_rate,
        }
    }

    /// The red Welte-Mignon (T-100) expression box.
    pub fn welte_red() -> Self {
        Self::new(35.0, 65.0, 85.0, 70.0, -5.0, 1.0, 2380.0, 300.0, 400.0)
    }

    pub fn welte_p(&self) -> f64 {
        self.welte_p
    }

    pub fn welte_mf(&self) -> f64 {
        self.welte_mf
    }

    pub fn welte_f(&self) -> f64 {
        self.welte_f
    }

    pub fn welte_loud(&self) -> f64 {
        self.welte_loud
    }

    pub fn left_adjust(&self) -> f64 {
        self.left_adjust
    }

    pub fn cresc_rate(&self) -> f64 {
        self.cresc_rate
    }

    pub fn decay_rates(&self) -> (f64, f64, f64) {
        (self.slow_decay_rate, self.fast_c_decay_rate, self.fast_d_decay_rate)
    }

    pub fn slow_step(&self) -> f64 {
        self.slow_step
    }

    pub fn fast_c_step(&self) -> f64 {
        self.fast_c_step
    }

    pub fn fast_d_step(&self) -> f64 {
        self.fast_d_step
    }
}

/// Expression box for a roll type. Only welte-red rolls carry expression
/// data this player interprets; every other type has none.
pub fn expression_box_for(roll_type: RollType) -> Option<ExpressionBox> {
    match roll_type {
        RollType::WelteRed => Some(ExpressionBox::welte_red()),
        _ => None,
    }
}
