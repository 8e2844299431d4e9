//! Compass bearing.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Bearing from `center` to `target` in degrees, normalised into `[0, 360)`.
///
/// The −90° correction lines the needle graphic's "north" up with the
/// mathematical angle 0 (pointing right).
pub fn bearing(center: Point, target: Point) -> f64 {
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    let degrees = dy.atan2(dx).to_degrees() - 90.0;
    let normalised = degrees.rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360.
    if normalised >= 360.0 { 0.0 } else { normalised }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompassState {
    pub current_angle: f64,
}

impl CompassState {
    /// Snap the needle to `target`; rotation is about `center`.
    pub fn point_to(&mut self, center: Point, target: Point) -> f64 {
        self.current_angle = bearing(center, target);
        log::trace!("compass bearing {:.1}°", self.current_angle);
        self.current_angle
    }

    pub fn reset(&mut self) {
        self.current_angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Point = Point::new(30.0, 30.0);

    fn assert_angle(actual: f64, expected: f64) {
        let diff = (actual - expected).rem_euclid(360.0);
        assert!(diff.min(360.0 - diff) < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn east_target_wraps_to_270() {
        // atan2 gives 0°, minus 90° wraps to 270°.
        assert_angle(bearing(CENTER, Point::new(100.0, 30.0)), 270.0);
    }

    #[test]
    fn north_target_wraps_to_180() {
        // Screen north is −y: atan2 gives −90°, minus 90° is −180°.
        assert_angle(bearing(CENTER, Point::new(30.0, -100.0)), 180.0);
    }

    #[test]
    fn south_target_is_zero() {
        assert_angle(bearing(CENTER, Point::new(30.0, 200.0)), 0.0);
    }

    #[test]
    fn angle_is_always_normalised() {
        for (x, y) in [(-5.0, -5.0), (60.0, 0.0), (0.0, 60.0), (31.0, 29.0)] {
            let angle = bearing(CENTER, Point::new(x, y));
            assert!((0.0..360.0).contains(&angle), "{angle}");
        }
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut state = CompassState::default();
        state.point_to(CENTER, Point::new(0.0, 0.0));
        assert!(state.current_angle > 0.0);
        state.reset();
        assert_eq!(state.current_angle, 0.0);
    }
}
