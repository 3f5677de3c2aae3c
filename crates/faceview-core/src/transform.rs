//! Scale + translate affine transform from image space to viewport space.
//!
//! A [`Transform2D`] is an immutable value. Every operation returns a new
//! transform; the engine replaces its current transform wholesale on each
//! update instead of mutating matrix fields in place.
//!
//! The matrix has the form
//!
//! ```text
//! | scale_x    0      translate_x |
//! |   0     scale_y   translate_y |
//! ```
//!
//! "Post" operations are applied after the existing mapping, in viewport
//! space, which is what gestures need: a drag moves the already-mapped image
//! and a pinch scales it about a screen-space pivot.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, Size, Vector};

/// Scale + translate mapping from image coordinates to viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Uniform scale followed by a translation.
    pub const fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            translate_x,
            translate_y,
        }
    }

    /// Translation component as a vector.
    pub fn translation(&self) -> Vector {
        Vector::new(self.translate_x, self.translate_y)
    }

    /// Apply a translation after this transform.
    pub fn post_translate(&self, delta: Vector) -> Self {
        Self {
            translate_x: self.translate_x + delta.x,
            translate_y: self.translate_y + delta.y,
            ..*self
        }
    }

    /// Apply a uniform scale about `pivot` (in viewport space) after this
    /// transform.
    pub fn post_scale(&self, factor: f64, pivot: Point) -> Self {
        Self {
            scale_x: self.scale_x * factor,
            scale_y: self.scale_y * factor,
            translate_x: factor * (self.translate_x - pivot.x) + pivot.x,
            translate_y: factor * (self.translate_y - pivot.y) + pivot.y,
        }
    }

    /// Compose so that `other` is applied first, then `self`.
    ///
    /// This is the drawing-context `concat` operation: the current matrix is
    /// pre-multiplied by the incoming one.
    pub fn concat(&self, other: &Transform2D) -> Self {
        Self {
            scale_x: self.scale_x * other.scale_x,
            scale_y: self.scale_y * other.scale_y,
            translate_x: self.scale_x * other.translate_x + self.translate_x,
            translate_y: self.scale_y * other.translate_y + self.translate_y,
        }
    }

    /// Inverse mapping, or `None` if either scale is zero or not finite.
    pub fn invert(&self) -> Option<Self> {
        if self.scale_x == 0.0
            || self.scale_y == 0.0
            || !self.scale_x.is_finite()
            || !self.scale_y.is_finite()
        {
            return None;
        }
        Some(Self {
            scale_x: 1.0 / self.scale_x,
            scale_y: 1.0 / self.scale_y,
            translate_x: -self.translate_x / self.scale_x,
            translate_y: -self.translate_y / self.scale_y,
        })
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale_x + self.translate_x,
            p.y * self.scale_y + self.translate_y,
        )
    }

    /// Map a rectangle, keeping `left <= right` and `top <= bottom`.
    pub fn map_rect(&self, r: &Rect) -> Rect {
        let a = self.map_point(Point::new(r.left, r.top));
        let b = self.map_point(Point::new(r.right, r.bottom));
        Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// On-screen rectangle covered by an image of `extent`.
    pub fn image_rect(&self, extent: Size) -> Rect {
        self.map_rect(&extent.to_rect())
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Transform2D, epsilon: f64) -> bool {
        (self.scale_x - other.scale_x).abs() <= epsilon
            && (self.scale_y - other.scale_y).abs() <= epsilon
            && (self.translate_x - other.translate_x).abs() <= epsilon
            && (self.translate_y - other.translate_y).abs() <= epsilon
    }
}

/// Axis along which the image exactly covers the viewport at the minimum zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitAxis {
    /// Image width matches the viewport width; height overflows.
    Horizontal,
    /// Image height matches the viewport height; width overflows.
    Vertical,
}

impl FitAxis {
    /// Fit axis of an image of `extent` cover-scaled into `viewport`.
    ///
    /// A relatively wider image (`iw / ih > vw / vh`) is scaled to the viewport
    /// height and overflows horizontally.
    pub fn for_cover(extent: Size, viewport: Size) -> Self {
        if extent.width * viewport.height > viewport.width * extent.height {
            FitAxis::Vertical
        } else {
            FitAxis::Horizontal
        }
    }

    /// Extent of `rect` along this axis.
    pub fn extent_of(self, rect: &Rect) -> f64 {
        match self {
            FitAxis::Horizontal => rect.width(),
            FitAxis::Vertical => rect.height(),
        }
    }

    /// Dimension of `size` along this axis.
    pub fn dimension_of(self, size: Size) -> f64 {
        match self {
            FitAxis::Horizontal => size.width,
            FitAxis::Vertical => size.height,
        }
    }
}

/// Values derived once when an image is bound to a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBinding {
    /// Intrinsic size of the bound image.
    pub extent: Size,
    pub fit_axis: FitAxis,
    /// Uniform scale at which the image covers the viewport ("center crop").
    pub cover_scale: f64,
    /// Cover-scaled, centered transform the image starts with.
    pub initial: Transform2D,
}

impl ImageBinding {
    /// Derive the binding for an image of `extent` shown in `viewport`.
    ///
    /// Both sizes must be positive; callers validate them first.
    pub fn new(extent: Size, viewport: Size) -> Self {
        let fit_axis = FitAxis::for_cover(extent, viewport);
        let (cover_scale, dx, dy) = match fit_axis {
            FitAxis::Vertical => {
                let scale = viewport.height / extent.height;
                (scale, (viewport.width - extent.width * scale) * 0.5, 0.0)
            }
            FitAxis::Horizontal => {
                let scale = viewport.width / extent.width;
                (scale, 0.0, (viewport.height - extent.height * scale) * 0.5)
            }
        };

        Self {
            extent,
            fit_axis,
            cover_scale,
            // Whole-pixel offset keeps the first frame crisp
            initial: Transform2D::new(cover_scale, dx.round(), dy.round()),
        }
    }

    /// On-screen fit-axis extent of the image relative to the viewport.
    ///
    /// `1.0` at the cover-fit scale, `max_zoom` at the upper zoom bound.
    pub fn zoom_ratio(&self, transform: &Transform2D, viewport: Size) -> f64 {
        let rect = transform.image_rect(self.extent);
        self.fit_axis.extent_of(&rect) / self.fit_axis.dimension_of(viewport)
    }
}
