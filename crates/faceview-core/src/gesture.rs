//! Gesture state carried between pointer events.
//!
//! ```text
//! Idle ──first down──▶ Dragging ──second down──▶ Pinching
//!   ▲                     │                         │
//!   └───────── up ────────┴────────── up ───────────┘
//! ```
//!
//! Every gesture remembers the transform it started from. Moves are applied
//! to that saved transform rather than compounded onto the previous frame, so
//! rounding errors do not accumulate over a long drag or pinch.

use crate::geometry::Point;
use crate::transform::Transform2D;

/// Anchor of a two-finger pinch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchAnchor {
    /// Transform when the pinch anchor was recorded.
    pub saved: Transform2D,
    /// Screen-space pivot for scaling.
    pub midpoint: Point,
    /// Finger separation when the anchor was recorded; always positive.
    pub initial_distance: f64,
}

impl PinchAnchor {
    /// Anchor for two touch points, or `None` if they coincide.
    pub fn new(saved: Transform2D, p0: Point, p1: Point) -> Option<Self> {
        let initial_distance = p0.distance(p1);
        if initial_distance > 0.0 && initial_distance.is_finite() {
            Some(Self {
                saved,
                midpoint: p0.midpoint(p1),
                initial_distance,
            })
        } else {
            None
        }
    }

    /// Transform for the current finger separation `distance`, or `None` if
    /// the fingers have closed to a single point.
    pub fn scaled(&self, distance: f64) -> Option<Transform2D> {
        let factor = distance / self.initial_distance;
        (factor > 0.0 && factor.is_finite())
            .then(|| self.saved.post_scale(factor, self.midpoint))
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        saved: Transform2D,
        origin: Point,
        moved: bool,
    },
    Pinching {
        /// `None` while the fingers coincide and the pinch start is deferred.
        anchor: Option<PinchAnchor>,
        /// Scale to apply on release to bring the zoom back into range.
        correction: Option<f64>,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Dragging { .. } => "dragging",
            GestureState::Pinching { .. } => "pinching",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_rejects_coincident_points() {
        let p = Point::new(10.0, 10.0);
        assert!(PinchAnchor::new(Transform2D::IDENTITY, p, p).is_none());
    }

    #[test]
    fn test_anchor_midpoint_and_distance() {
        let anchor =
            PinchAnchor::new(Transform2D::IDENTITY, Point::new(0.0, 0.0), Point::new(60.0, 80.0))
                .unwrap();
        assert_eq!(anchor.initial_distance, 100.0);
        assert_eq!(anchor.midpoint, Point::new(30.0, 40.0));
    }

    #[test]
    fn test_anchor_scaled() {
        let anchor = PinchAnchor::new(
            Transform2D::IDENTITY,
            Point::new(450.0, 500.0),
            Point::new(550.0, 500.0),
        )
        .unwrap();

        let t = anchor.scaled(150.0).unwrap();
        assert_eq!(t.scale_x, 1.5);
        // Pivot (500, 500) stays put
        assert_eq!(t.map_point(Point::new(500.0, 500.0)), Point::new(500.0, 500.0));
    }

    #[test]
    fn test_scaled_rejects_closed_fingers() {
        let anchor =
            PinchAnchor::new(Transform2D::IDENTITY, Point::new(0.0, 0.0), Point::new(10.0, 0.0))
                .unwrap();
        assert!(anchor.scaled(0.0).is_none());
        assert!(anchor.scaled(f64::NAN).is_none());
        assert!(anchor.scaled(f64::INFINITY).is_none());
    }

    #[test]
    fn test_default_is_idle() {
        assert!(GestureState::default().is_idle());
        assert_eq!(GestureState::default().name(), "idle");
    }
}
