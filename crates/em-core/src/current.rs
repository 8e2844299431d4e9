//! Induced current and indicator lamps.
//!
//! Moving a magnet past a coil drives a signed current through the circuit.
//! The sign follows which of the magnet's poles is nearer its own anchor, so
//! flipping the magnet flips the current. Two complementary lamp types
//! report the sign: a forward lamp for positive current, a reverse lamp for
//! negative current.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Signed current produced by a magnet moving at `speed`.
///
/// `reference` is the anchor the pole distances are measured from.
pub fn compute_current(speed: f64, pole_n: Point, pole_s: Point, reference: Point) -> f64 {
    let to_n = reference.distance_to(pole_n);
    let to_s = reference.distance_to(pole_s);
    if to_n < to_s { -speed } else { speed }
}

/// Which current direction lights a lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LampPolarity {
    Forward,
    Reverse,
}

impl LampPolarity {
    /// Lamp decision for a given current and circuit state.
    pub fn is_lit(&self, current: f64, connected: bool) -> bool {
        connected
            && match self {
                LampPolarity::Forward => current > 0.0,
                LampPolarity::Reverse => current < 0.0,
            }
    }
}

/// State owned by a lamp element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LampState {
    pub polarity: LampPolarity,
    pub lit: bool,
}

impl LampState {
    pub fn new(polarity: LampPolarity) -> Self {
        Self {
            polarity,
            lit: false,
        }
    }

    /// Apply a broadcast current. Returns `true` if the lamp changed state.
    pub fn apply_current(&mut self, current: f64, connected: bool) -> bool {
        let lit = self.polarity.is_lit(current, connected);
        let changed = lit != self.lit;
        self.lit = lit;
        changed
    }
}
