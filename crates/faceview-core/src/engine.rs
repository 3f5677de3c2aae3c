//! The gesture transform engine.
//!
//! [`FaceViewer`] owns the current [`Transform2D`], the [`GestureState`], the
//! in-flight [`SnapAnimation`] and the face visibility flags. A host feeds it
//! pointer events and animation ticks; a renderer reads it.
//!
//! # Event ordering
//!
//! Every method completes its update before returning: the transform is
//! replaced, face flags are recomputed and a redraw is requested. There is no
//! partially applied state between calls.
//!
//! # Input lock
//!
//! While a snap-back animation runs, pointer events are ignored and reported
//! as [`EventOutcome::Ignored`]. The animation cannot be cancelled; input is
//! accepted again once [`FaceViewer::advance_animation`] reports it settled.

use std::time::Duration;

use crate::boundary::{self, SnapAnimation};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::faces::{FaceDescriptor, FaceVisibilityTracker};
use crate::geometry::{Point, Rect, Size};
use crate::gesture::{GestureState, PinchAnchor};
use crate::transform::{ImageBinding, Transform2D};

/// Whether a pointer event was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    /// Dropped because a snap-back animation is in flight or the event does
    /// not apply to the current gesture.
    Ignored,
}

/// Progress of the snap-back animation after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    /// No animation was running.
    Idle,
    Running,
    /// The animation finished on this tick; input is enabled again.
    Settled,
}

/// Pan/zoom engine for one image in a fixed viewport.
#[derive(Debug, Clone)]
pub struct FaceViewer {
    config: ViewerConfig,
    viewport: Size,
    binding: Option<ImageBinding>,
    transform: Transform2D,
    gesture: GestureState,
    snap: Option<SnapAnimation>,
    faces: FaceVisibilityTracker,
    redraw_requested: bool,
}

impl FaceViewer {
    /// Create a viewer for a viewport of `viewport` size.
    ///
    /// # Errors
    ///
    /// Returns `ViewerError::InvalidViewport` if the viewport is not positive
    /// and finite, or a configuration error if `config` does not validate.
    pub fn new(viewport: Size, config: ViewerConfig) -> Result<Self, ViewerError> {
        if !viewport.is_positive() {
            log::warn!(
                "rejecting viewport {}x{}",
                viewport.width,
                viewport.height
            );
            return Err(ViewerError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        config.validate()?;

        let faces = FaceVisibilityTracker::new(config.face_margins());
        Ok(Self {
            config,
            viewport,
            binding: None,
            transform: Transform2D::IDENTITY,
            gesture: GestureState::Idle,
            snap: None,
            faces,
            redraw_requested: true,
        })
    }

    /// Bind an image of intrinsic size `extent` and reset to the cover-fit
    /// transform.
    pub fn bind_image(&mut self, extent: Size) -> Result<(), ViewerError> {
        if !extent.is_positive() {
            log::warn!("rejecting image extent {}x{}", extent.width, extent.height);
            return Err(ViewerError::InvalidImageExtent {
                width: extent.width,
                height: extent.height,
            });
        }

        let binding = ImageBinding::new(extent, self.viewport);
        log::debug!(
            "bound {}x{} image: fit axis {:?}, cover scale {}",
            extent.width,
            extent.height,
            binding.fit_axis,
            binding.cover_scale
        );
        self.binding = Some(binding);
        self.gesture = GestureState::Idle;
        self.snap = None;
        self.set_transform(binding.initial);
        Ok(())
    }

    /// Supply the detector's face list. `None` entries are discarded faces.
    ///
    /// `adjust_scale` maps detector coordinates to the bound image's
    /// coordinates; use `1.0` when detection ran on the same bitmap.
    pub fn set_faces(
        &mut self,
        faces: Vec<Option<FaceDescriptor>>,
        adjust_scale: f64,
    ) -> Result<(), ViewerError> {
        if !adjust_scale.is_finite() || adjust_scale <= 0.0 {
            return Err(ViewerError::InvalidAdjustScale(adjust_scale));
        }
        self.faces.set_faces(faces, adjust_scale);
        self.refresh();
        Ok(())
    }

    /// Return to the initial cover-fit transform of the bound image.
    pub fn reset(&mut self) {
        self.gesture = GestureState::Idle;
        self.snap = None;
        let initial = self
            .binding
            .map(|b| b.initial)
            .unwrap_or(Transform2D::IDENTITY);
        self.set_transform(initial);
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn binding(&self) -> Option<&ImageBinding> {
        self.binding.as_ref()
    }

    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    /// On-screen rectangle of the bound image, if any.
    pub fn image_rect(&self) -> Option<Rect> {
        self.binding
            .map(|b| self.transform.image_rect(b.extent))
    }

    pub fn faces(&self) -> &FaceVisibilityTracker {
        &self.faces
    }

    /// Per-face "needs overlay" flags for the current transform.
    pub fn face_flags(&self) -> &[bool] {
        self.faces.flags()
    }

    /// True if at least one face is at risk of being cropped.
    pub fn needs_face_warning(&self) -> bool {
        self.faces.any_flagged()
    }

    pub fn is_animating(&self) -> bool {
        self.snap.is_some()
    }

    /// Clear and return the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// First finger touches down: start a drag.
    pub fn first_finger_down(&mut self, point: Point) -> EventOutcome {
        if self.is_animating() {
            return EventOutcome::Ignored;
        }
        self.gesture = GestureState::Dragging {
            saved: self.transform,
            origin: point,
            moved: false,
        };
        log::debug!("drag start at ({}, {})", point.x, point.y);
        EventOutcome::Handled
    }

    /// Second finger touches down: start a pinch.
    ///
    /// If the two points coincide the pinch start is deferred until a move
    /// reports a positive separation.
    pub fn second_finger_down(&mut self, p0: Point, p1: Point) -> EventOutcome {
        if self.is_animating() {
            return EventOutcome::Ignored;
        }
        let anchor = PinchAnchor::new(self.transform, p0, p1);
        if anchor.is_none() {
            log::debug!("pinch start deferred: touch points coincide");
        }
        self.gesture = GestureState::Pinching {
            anchor,
            correction: None,
        };
        EventOutcome::Handled
    }

    /// One or two active fingers moved.
    ///
    /// A drag uses the first point; a pinch needs at least two.
    pub fn pointer_move(&mut self, points: &[Point]) -> EventOutcome {
        if self.is_animating() {
            return EventOutcome::Ignored;
        }

        match self.gesture {
            GestureState::Dragging { saved, origin, .. } => {
                let Some(&current) = points.first() else {
                    return EventOutcome::Ignored;
                };
                self.gesture = GestureState::Dragging {
                    saved,
                    origin,
                    moved: true,
                };
                self.set_transform(saved.post_translate(current - origin));
                EventOutcome::Handled
            }
            GestureState::Pinching { anchor, .. } => {
                let [p0, p1, ..] = points else {
                    return EventOutcome::Ignored;
                };
                match anchor {
                    Some(anchor) => {
                        // Fingers closed to one point: hold the last transform
                        let Some(next) = anchor.scaled(p0.distance(*p1)) else {
                            return EventOutcome::Handled;
                        };
                        self.gesture = GestureState::Pinching {
                            anchor: Some(anchor),
                            correction: self.zoom_correction(&next),
                        };
                        self.set_transform(next);
                    }
                    None => {
                        // Deferred start: anchor on the first positive separation
                        self.gesture = GestureState::Pinching {
                            anchor: PinchAnchor::new(self.transform, *p0, *p1),
                            correction: None,
                        };
                    }
                }
                EventOutcome::Handled
            }
            GestureState::Idle => EventOutcome::Ignored,
        }
    }

    /// A finger lifted: end the gesture and settle the transform.
    pub fn finger_up(&mut self) -> EventOutcome {
        if self.is_animating() {
            return EventOutcome::Ignored;
        }

        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            GestureState::Pinching { anchor, correction } => {
                let mut next = self.transform;
                if let (Some(anchor), Some(factor)) = (anchor, correction) {
                    log::debug!("pinch release: correcting zoom by {factor}");
                    next = next.post_scale(factor, anchor.midpoint);
                }
                if let Some(binding) = self.binding {
                    next = boundary::center(&next, binding.extent, self.viewport);
                }
                self.set_transform(next);
                EventOutcome::Handled
            }
            GestureState::Dragging { moved: true, .. } => {
                if let Some(binding) = self.binding {
                    self.snap = boundary::edge_snap(
                        &self.transform,
                        binding.extent,
                        self.viewport,
                        self.config.snap_duration(),
                    );
                }
                if let Some(snap) = &self.snap {
                    log::debug!(
                        "drag release: snapping back by ({}, {})",
                        snap.target.x,
                        snap.target.y
                    );
                }
                self.refresh();
                EventOutcome::Handled
            }
            GestureState::Dragging { moved: false, .. } => EventOutcome::Handled,
            GestureState::Idle => EventOutcome::Ignored,
        }
    }

    /// Advance the snap-back animation to `elapsed` since it started.
    pub fn advance_animation(&mut self, elapsed: Duration) -> AnimationStatus {
        let Some(snap) = self.snap else {
            return AnimationStatus::Idle;
        };

        let step = snap.advance(snap.fraction(elapsed));
        log::trace!("snap tick: delta ({}, {})", step.delta.x, step.delta.y);
        self.set_transform(self.transform.post_translate(step.delta));

        if step.complete {
            self.snap = None;
            self.refresh();
            log::debug!("snap-back settled");
            AnimationStatus::Settled
        } else {
            self.snap = Some(step.animation);
            AnimationStatus::Running
        }
    }

    /// Correction scale that brings `candidate` back into the zoom range, if
    /// it is outside.
    fn zoom_correction(&self, candidate: &Transform2D) -> Option<f64> {
        let binding = self.binding?;
        let ratio = binding.zoom_ratio(candidate, self.viewport);
        if !ratio.is_finite() || ratio <= 0.0 {
            return None;
        }
        if ratio > self.config.max_zoom {
            Some(self.config.max_zoom / ratio)
        } else if ratio < 1.0 {
            Some(1.0 / ratio)
        } else {
            None
        }
    }

    /// Replace the transform, then recompute flags and request a redraw.
    fn set_transform(&mut self, transform: Transform2D) {
        self.transform = transform;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.faces.recompute(&self.transform, self.viewport);
        self.redraw_requested = true;
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
