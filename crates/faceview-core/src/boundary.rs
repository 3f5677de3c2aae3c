//! Boundary correction: centering, edge snapping and the snap-back animation.
//!
//! After a gesture ends the image must cover the viewport without exposing a
//! gap on any axis where it is larger than the viewport, and must be centered
//! on any axis where it is smaller. A pinch release is corrected instantly
//! with [`center`]; a drag release starts a [`SnapAnimation`] computed by
//! [`edge_snap`].
//!
//! The animation is driven by explicit ticks. [`SnapAnimation::advance`] is a
//! pure function of the animation state and the elapsed fraction of its
//! duration, so any scheduler (timer, frame clock, or a test loop) can drive it.

use std::time::Duration;

use crate::geometry::{Rect, Size, Vector};
use crate::transform::Transform2D;

/// Offsets smaller than this are treated as already settled.
const SETTLE_EPSILON: f64 = 1e-6;

/// Default snap-back duration.
pub const DEFAULT_SNAP_DURATION: Duration = Duration::from_millis(200);

/// Offset that settles one axis spanning `near..far` inside `0..viewport`.
fn axis_offset(near: f64, far: f64, viewport: f64) -> f64 {
    let extent = far - near;
    let offset = if extent < viewport {
        (viewport - extent) / 2.0 - near
    } else if near > 0.0 {
        -near
    } else if far < viewport {
        viewport - far
    } else {
        0.0
    };

    if offset.abs() < SETTLE_EPSILON {
        0.0
    } else {
        offset
    }
}

/// Translation that settles `rect` inside a viewport of `viewport` size.
///
/// Each axis is handled independently:
/// - smaller than the viewport: centered with equal margins
/// - near edge inside the viewport: moved flush with the near boundary
/// - far edge inside the viewport: moved flush with the far boundary
/// - otherwise: left alone
pub fn correction_offset(rect: &Rect, viewport: Size) -> Vector {
    Vector::new(
        axis_offset(rect.left, rect.right, viewport.width),
        axis_offset(rect.top, rect.bottom, viewport.height),
    )
}

/// Instantly settle an image of `extent` under `transform`.
///
/// Idempotent: centering an already centered transform returns it unchanged.
pub fn center(transform: &Transform2D, extent: Size, viewport: Size) -> Transform2D {
    let offset = correction_offset(&transform.image_rect(extent), viewport);
    if offset.is_zero() {
        *transform
    } else {
        transform.post_translate(offset)
    }
}

/// Snap-back animation needed to settle `transform`, if any.
pub fn edge_snap(
    transform: &Transform2D,
    extent: Size,
    viewport: Size,
    duration: Duration,
) -> Option<SnapAnimation> {
    let offset = correction_offset(&transform.image_rect(extent), viewport);
    if offset.is_zero() {
        None
    } else {
        Some(SnapAnimation::new(offset, duration))
    }
}

/// Decelerating easing curve: fast start, gentle landing.
pub fn decelerate(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// An in-flight boundary-correction animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimation {
    /// Total translation to apply over the animation.
    pub target: Vector,
    /// Translation applied so far.
    pub applied: Vector,
    pub duration: Duration,
}

/// Result of advancing a [`SnapAnimation`] by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapStep {
    /// Animation state after this tick.
    pub animation: SnapAnimation,
    /// Translation to apply for this tick only.
    pub delta: Vector,
    pub complete: bool,
}

impl SnapAnimation {
    pub fn new(target: Vector, duration: Duration) -> Self {
        Self {
            target,
            applied: Vector::ZERO,
            duration,
        }
    }

    /// Fraction of the duration covered by `elapsed`, clamped to `0..=1`.
    pub fn fraction(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Advance to `elapsed_fraction` (0 = start, 1 = end) of the animation.
    ///
    /// The delta is the eased target position minus what was already applied;
    /// the completing step returns exactly the remainder so the applied deltas
    /// sum to the target.
    pub fn advance(&self, elapsed_fraction: f64) -> SnapStep {
        let fraction = if elapsed_fraction.is_nan() {
            0.0
        } else {
            elapsed_fraction.clamp(0.0, 1.0)
        };
        let complete = fraction >= 1.0;

        let delta = if complete {
            self.target - self.applied
        } else {
            self.target * decelerate(fraction) - self.applied
        };

        let animation = SnapAnimation {
            applied: if complete {
                self.target
            } else {
                self.applied + delta
            },
            ..*self
        };

        SnapStep {
            animation,
            delta,
            complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1000.0, 1000.0);
    const EXTENT: Size = Size::new(2000.0, 2000.0);

    #[test]
    fn test_no_offset_when_covering() {
        let rect = Rect::new(-100.0, -50.0, 1100.0, 1200.0);
        assert_eq!(correction_offset(&rect, VIEWPORT), Vector::ZERO);
    }

    #[test]
    fn test_near_gap_closed() {
        let rect = Rect::new(40.0, 0.0, 1240.0, 1000.0);
        assert_eq!(correction_offset(&rect, VIEWPORT), Vector::new(-40.0, 0.0));
    }

    #[test]
    fn test_far_gap_closed() {
        let rect = Rect::new(-300.0, -500.0, 1200.0, 900.0);
        assert_eq!(correction_offset(&rect, VIEWPORT), Vector::new(0.0, 100.0));
    }

    #[test]
    fn test_smaller_axis_centered() {
        let rect = Rect::new(50.0, 0.0, 650.0, 1000.0);
        // 600 wide in 1000: margins of 200 each
        assert_eq!(correction_offset(&rect, VIEWPORT), Vector::new(150.0, 0.0));
    }

    #[test]
    fn test_center_is_idempotent() {
        let t = Transform2D::new(0.5, 123.0, -77.0);
        let once = center(&t, EXTENT, VIEWPORT);
        let twice = center(&once, EXTENT, VIEWPORT);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_edge_snap_none_when_settled() {
        let t = Transform2D::new(1.0, -500.0, -500.0);
        assert!(edge_snap(&t, EXTENT, VIEWPORT, DEFAULT_SNAP_DURATION).is_none());
    }

    #[test]
    fn test_edge_snap_targets_gap() {
        // Dragged 40px right past the left edge
        let t = Transform2D::new(1.0, 40.0, -500.0);
        let anim = edge_snap(&t, EXTENT, VIEWPORT, DEFAULT_SNAP_DURATION).unwrap();
        assert_eq!(anim.target, Vector::new(-40.0, 0.0));
        assert_eq!(anim.applied, Vector::ZERO);
    }

    #[test]
    fn test_decelerate_endpoints() {
        assert_eq!(decelerate(0.0), 0.0);
        assert_eq!(decelerate(1.0), 1.0);
        assert_eq!(decelerate(0.5), 0.75);
        assert_eq!(decelerate(2.0), 1.0);
    }

    #[test]
    fn test_advance_converges_monotonically() {
        let mut anim = SnapAnimation::new(Vector::new(40.0, 0.0), DEFAULT_SNAP_DURATION);
        let mut sum = Vector::ZERO;
        let mut last_step = f64::INFINITY;

        for tick in 1..=10 {
            let step = anim.advance(tick as f64 / 10.0);
            sum = sum + step.delta;
            anim = step.animation;

            assert!(step.delta.x > 0.0, "partial sums must move toward target");
            // Decelerating: each tick covers less ground than the previous
            assert!(step.delta.x < last_step);
            last_step = step.delta.x;
            assert_eq!(step.delta.y, 0.0);
            assert_eq!(step.complete, tick == 10);
        }

        assert_eq!(sum.x, 40.0);
        assert_eq!(sum.y, 0.0);
    }

    #[test]
    fn test_advance_single_final_tick() {
        let anim = SnapAnimation::new(Vector::new(-12.5, 30.0), DEFAULT_SNAP_DURATION);
        let step = anim.advance(1.0);
        assert!(step.complete);
        assert_eq!(step.delta, Vector::new(-12.5, 30.0));
        assert_eq!(step.animation.applied, step.animation.target);
    }

    #[test]
    fn test_advance_clamps_fraction() {
        let anim = SnapAnimation::new(Vector::new(10.0, 10.0), DEFAULT_SNAP_DURATION);
        assert_eq!(anim.advance(-1.0).delta, Vector::ZERO);
        assert!(anim.advance(3.0).complete);
        assert!(!anim.advance(f64::NAN).complete);
    }

    #[test]
    fn test_fraction_from_elapsed() {
        let anim = SnapAnimation::new(Vector::new(1.0, 0.0), Duration::from_millis(200));
        assert_eq!(anim.fraction(Duration::from_millis(50)), 0.25);
        assert_eq!(anim.fraction(Duration::from_millis(400)), 1.0);

        let instant = SnapAnimation::new(Vector::new(1.0, 0.0), Duration::ZERO);
        assert_eq!(instant.fraction(Duration::ZERO), 1.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
