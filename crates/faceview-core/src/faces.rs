//! Face descriptors and the visibility tracker.
//!
//! Face descriptors come from an external detector in the detector's image
//! coordinates. The list may contain `None` entries for detections that were
//! discarded; those are inert: never flagged and never drawn.
//!
//! A face is described by the midpoint between the eyes and the distance
//! between the eyes. Its safety box extends one eye distance to each side and
//! [`FACE_VERTICAL`] eye distances above and below the midpoint, since a face
//! reaches further below the eye line than beside it.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size};
use crate::transform::Transform2D;

/// Horizontal safety margin in eye distances on each side of the midpoint.
pub const FACE_HORIZONTAL: f64 = 1.0;

/// Vertical safety margin in eye distances above and below the midpoint.
pub const FACE_VERTICAL: f64 = 2.0;

/// Vertical margin used when discarding detections that were already cut off
/// by the source image.
pub const DETECTION_VERTICAL: f64 = 1.8;

/// A detected face in detector image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceDescriptor {
    /// Point halfway between the eyes.
    pub midpoint: Point,
    /// Distance between the eyes in pixels.
    pub eye_distance: f64,
}

impl FaceDescriptor {
    pub fn new(midpoint_x: f64, midpoint_y: f64, eye_distance: f64) -> Self {
        Self {
            midpoint: Point::new(midpoint_x, midpoint_y),
            eye_distance,
        }
    }

    /// Safety box in render image coordinates.
    ///
    /// `adjust_scale` converts detector coordinates into the coordinate space
    /// of the rendered image.
    pub fn image_box(&self, adjust_scale: f64, margins: FaceMargins) -> Rect {
        let eye = self.eye_distance * adjust_scale;
        Rect::around(
            self.midpoint.scale(adjust_scale),
            eye * margins.horizontal,
            eye * margins.vertical,
        )
    }

    /// Safety box in viewport coordinates under `transform`.
    pub fn screen_box(
        &self,
        transform: &Transform2D,
        adjust_scale: f64,
        margins: FaceMargins,
    ) -> Rect {
        let mid = transform.map_point(self.midpoint.scale(adjust_scale));
        let eye = self.eye_distance * adjust_scale * transform.scale_x;
        Rect::around(mid, eye * margins.horizontal, eye * margins.vertical)
    }
}

/// Safety margins around a face midpoint, in eye distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMargins {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Default for FaceMargins {
    fn default() -> Self {
        Self {
            horizontal: FACE_HORIZONTAL,
            vertical: FACE_VERTICAL,
        }
    }
}

/// Drop detections whose face was already cut off by the source image.
///
/// A detection is kept only if one eye distance fits on each side of the
/// midpoint and [`DETECTION_VERTICAL`] eye distances fit above and below it.
pub fn discard_incomplete(
    faces: Vec<Option<FaceDescriptor>>,
    image_size: Size,
) -> Vec<Option<FaceDescriptor>> {
    faces
        .into_iter()
        .map(|face| {
            face.filter(|f| {
                let eye = f.eye_distance;
                let mid = f.midpoint;
                mid.x >= eye
                    && mid.y >= eye * DETECTION_VERTICAL
                    && image_size.width - mid.x >= eye
                    && image_size.height - mid.y >= eye * DETECTION_VERTICAL
            })
        })
        .collect()
}

/// Per-face "needs overlay" flags for the current transform.
#[derive(Debug, Clone, Default)]
pub struct FaceVisibilityTracker {
    faces: Vec<Option<FaceDescriptor>>,
    adjust_scale: f64,
    margins: FaceMargins,
    flags: Vec<bool>,
}

impl FaceVisibilityTracker {
    pub fn new(margins: FaceMargins) -> Self {
        Self {
            faces: Vec::new(),
            adjust_scale: 1.0,
            margins,
            flags: Vec::new(),
        }
    }

    /// Replace the face list. Flags are cleared until the next recompute.
    pub fn set_faces(&mut self, faces: Vec<Option<FaceDescriptor>>, adjust_scale: f64) {
        self.flags = vec![false; faces.len()];
        self.faces = faces;
        self.adjust_scale = adjust_scale;
    }

    pub fn faces(&self) -> &[Option<FaceDescriptor>] {
        &self.faces
    }

    pub fn adjust_scale(&self) -> f64 {
        self.adjust_scale
    }

    pub fn margins(&self) -> FaceMargins {
        self.margins
    }

    /// One flag per face list entry; `None` entries are always `false`.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// True if at least one face needs a crop warning.
    pub fn any_flagged(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }

    /// Recompute every flag against `viewport` under `transform`.
    pub fn recompute(&mut self, transform: &Transform2D, viewport: Size) {
        let bounds = viewport.to_rect();
        let (adjust, margins) = (self.adjust_scale, self.margins);
        self.flags = self
            .faces
            .iter()
            .map(|face| match face {
                Some(face) => face.screen_box(transform, adjust, margins).exceeds(&bounds),
                None => false,
            })
            .collect();
    }

    /// Flagged faces with their safety boxes in render image coordinates.
    pub fn flagged_boxes(&self) -> impl Iterator<Item = Rect> + '_ {
        self.faces
            .iter()
            .zip(self.flags.iter())
            .filter_map(move |(face, &flagged)| match face {
                Some(face) if flagged => Some(face.image_box(self.adjust_scale, self.margins)),
                _ => None,
            })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
