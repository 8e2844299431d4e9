//! Hanging-magnet swing.
//!
//! The hanging magnet moves horizontally around a rest point under the pivot,
//! pushed and pulled by the four pole pairs it forms with a driving magnet.
//! One step runs per driver position change; the damping is a fixed
//! per-step decay, so the settling speed follows the event rate.

use crate::config::PhysicsConfig;
use crate::geometry::Point;
use crate::poles::Poles;
use serde::{Deserialize, Serialize};

/// Rest x of a hanging magnet of `width` under a pivot at `pivot_x`.
pub fn rest_x(pivot_x: f64, width: f64) -> f64 {
    pivot_x - width / 3.0
}

/// Net horizontal force on `own` from `other`.
///
/// Opposite poles attract (+1), like poles repel (−1); each pair contributes
/// `sign · k / d²` projected onto the x axis.
pub fn net_force(own: Poles, other: Poles, strength: f64, min_distance: f64) -> f64 {
    let pairs = [
        (own.pole_n, other.pole_n, -1.0),
        (own.pole_n, other.pole_s, 1.0),
        (own.pole_s, other.pole_n, 1.0),
        (own.pole_s, other.pole_s, -1.0),
    ];

    pairs
        .iter()
        .map(|&(this, that, sign)| {
            let dx = that.x - this.x;
            let dy = that.y - this.y;
            let distance = dx.hypot(dy).max(min_distance);
            let magnitude = sign * strength / (distance * distance);
            magnitude * (dx / distance)
        })
        .sum()
}

/// Swing state owned by a hanging magnet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendulumState {
    pub center_point: f64,
    pub offset: f64,
    pub velocity: f64,
}

impl PendulumState {
    /// Settle at rest under the pivot.
    pub fn reset(&mut self, center_point: f64) {
        self.center_point = center_point;
        self.offset = 0.0;
        self.velocity = 0.0;
    }

    /// Apply one force impulse with damping; returns the clamped offset.
    pub fn integrate(&mut self, force: f64, config: &PhysicsConfig) -> f64 {
        self.velocity = (self.velocity + force) * config.damping;
        self.offset = (self.offset + self.velocity).clamp(-config.max_swing, config.max_swing);
        self.offset
    }

    /// One swing step driven by `driver`'s poles.
    ///
    /// `position` and `width` describe the hanging magnet, `own` its poles
    /// before the step. Returns the new top-left position; y is unchanged.
    pub fn step(
        &mut self,
        position: Point,
        width: f64,
        own: Poles,
        pivot: Point,
        driver: Poles,
        config: &PhysicsConfig,
    ) -> Point {
        self.center_point = rest_x(pivot.x, width);
        let force = net_force(own, driver, config.strength_multiplier, config.min_distance);
        let offset = self.integrate(force, config);
        log::trace!(
            "pendulum force={force:.4} velocity={:.4} offset={offset:.2}",
            self.velocity
        );
        Point::new(self.center_point + offset, position.y)
    }
}
