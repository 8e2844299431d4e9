//! Drag speed sampling.
//!
//! Speed is a plain finite difference between consecutive drag-move samples,
//! signed by the horizontal direction of travel. No smoothing.

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    position: Point,
    time_ms: f64,
}

/// Tracks the previous drag sample of one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpeedTracker {
    last: Option<Sample>,
}

impl SpeedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the drag origin.
    pub fn begin(&mut self, position: Point, time_ms: f64) {
        self.last = Some(Sample { position, time_ms });
    }

    /// Forget the drag.
    pub fn end(&mut self) {
        self.last = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.last.is_some()
    }

    /// Feed a drag-move sample and return the signed speed in px/s.
    ///
    /// Returns `None` outside a drag or when the clock did not advance;
    /// in the latter case the previous sample is kept.
    pub fn sample(&mut self, position: Point, time_ms: f64) -> Option<f64> {
        let last = self.last?;
        let dt = (time_ms - last.time_ms) / 1000.0;
        if dt <= 0.0 {
            return None;
        }
        let dx = position.x - last.position.x;
        let dy = position.y - last.position.y;
        let distance = if dx == 0.0 {
            0.0
        } else {
            dx.hypot(dy).copysign(dx)
        };
        self.last = Some(Sample { position, time_ms });
        Some(distance / dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_speed_outside_drag() {
        let mut tracker = SpeedTracker::new();
        assert_eq!(tracker.sample(Point::new(10.0, 0.0), 100.0), None);
    }

    #[test]
    fn rightward_drag_is_positive() {
        let mut tracker = SpeedTracker::new();
        tracker.begin(Point::new(0.0, 0.0), 0.0);
        let speed = tracker.sample(Point::new(30.0, 40.0), 500.0).unwrap();
        assert!((speed - 100.0).abs() < 1e-9);
    }

    #[test]
    fn leftward_drag_is_negative() {
        let mut tracker = SpeedTracker::new();
        tracker.begin(Point::new(100.0, 0.0), 0.0);
        let speed = tracker.sample(Point::new(50.0, 0.0), 250.0).unwrap();
        assert!((speed + 200.0).abs() < 1e-9);
    }

    #[test]
    fn vertical_drag_has_zero_speed() {
        let mut tracker = SpeedTracker::new();
        tracker.begin(Point::new(0.0, 0.0), 0.0);
        assert_eq!(tracker.sample(Point::new(0.0, 80.0), 100.0), Some(0.0));
    }

    #[test]
    fn stalled_clock_keeps_previous_sample() {
        let mut tracker = SpeedTracker::new();
        tracker.begin(Point::new(0.0, 0.0), 1000.0);
        assert_eq!(tracker.sample(Point::new(10.0, 0.0), 1000.0), None);
        let speed = tracker.sample(Point::new(10.0, 0.0), 1100.0).unwrap();
        assert!((speed - 100.0).abs() < 1e-9);
    }

    #[test]
    fn end_stops_tracking() {
        let mut tracker = SpeedTracker::new();
        tracker.begin(Point::new(0.0, 0.0), 0.0);
        tracker.end();
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.sample(Point::new(5.0, 0.0), 10.0), None);
    }
}
