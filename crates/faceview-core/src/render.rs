//! Read-side rendering of a [`FaceViewer`].
//!
//! [`Renderer`] draws through the [`Canvas`] trait so hosts can plug in any
//! drawing surface. [`RasterCanvas`] is a software implementation backed by
//! an `image::RgbaImage`, used by the WASM bindings and by tests.
//!
//! Drawing happens between `save` and `restore`, so the viewer transform
//! concatenated for the image and overlays never leaks into later draws.

use image::{Rgba, RgbaImage};

use crate::config::OverlayStyle;
use crate::engine::FaceViewer;
use crate::geometry::{Point, Rect};
use crate::load::DecodedImage;
use crate::transform::Transform2D;

/// A drawing surface with a transform stack.
pub trait Canvas {
    /// Push the current drawing state.
    fn save(&mut self);
    /// Pop the most recently saved drawing state.
    fn restore(&mut self);
    /// Pre-multiply the current transform by `transform`.
    fn concat(&mut self, transform: &Transform2D);
    /// Draw `image` with its top-left pixel at the current origin.
    fn draw_image(&mut self, image: &DecodedImage);
    /// Stroke the outline of `rect` (in current coordinates).
    fn stroke_rect(&mut self, rect: &Rect, style: &OverlayStyle);
}

/// Draws the bound image and the overlays of flagged faces.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    style: OverlayStyle,
}

impl Renderer {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Renderer using the overlay style from the viewer's configuration.
    pub fn for_viewer(viewer: &FaceViewer) -> Self {
        Self::new(viewer.config().overlay)
    }

    /// Render one frame. Does nothing when no image is available.
    pub fn render<C: Canvas>(
        &self,
        canvas: &mut C,
        image: Option<&DecodedImage>,
        viewer: &FaceViewer,
    ) {
        let Some(image) = image else {
            return;
        };

        canvas.save();
        canvas.concat(&viewer.transform());
        canvas.draw_image(image);
        for face_box in viewer.faces().flagged_boxes() {
            canvas.stroke_rect(&face_box, &self.style);
        }
        canvas.restore();
    }
}

/// Software canvas drawing into an RGBA frame.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    frame: RgbaImage,
    background: Rgba<u8>,
    matrix: Transform2D,
    stack: Vec<Transform2D>,
}

impl RasterCanvas {
    /// Canvas of `width` x `height` device pixels, cleared to opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, [0, 0, 0, 255])
    }

    pub fn with_background(width: u32, height: u32, background: [u8; 4]) -> Self {
        let background = Rgba(background);
        Self {
            frame: RgbaImage::from_pixel(width, height, background),
            background,
            matrix: Transform2D::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Reset the frame to the background and drop any saved state.
    pub fn clear(&mut self) {
        let background = self.background;
        self.frame.pixels_mut().for_each(|p| *p = background);
        self.matrix = Transform2D::IDENTITY;
        self.stack.clear();
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn into_frame(self) -> RgbaImage {
        self.frame
    }

    /// Current transform from drawing coordinates to device pixels.
    pub fn matrix(&self) -> Transform2D {
        self.matrix
    }

    /// Clip a device-space rectangle to whole pixel bounds of the frame.
    fn pixel_bounds(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = (self.frame.width() as f64, self.frame.height() as f64);
        let x0 = rect.left.floor().clamp(0.0, w);
        let y0 = rect.top.floor().clamp(0.0, h);
        let x1 = rect.right.ceil().clamp(0.0, w);
        let y1 = rect.bottom.ceil().clamp(0.0, h);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    fn fill_device_rect(&mut self, rect: &Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.frame.put_pixel(x, y, color);
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn save(&mut self) {
        self.stack.push(self.matrix);
    }

    fn restore(&mut self) {
        if let Some(matrix) = self.stack.pop() {
            self.matrix = matrix;
        }
    }

    fn concat(&mut self, transform: &Transform2D) {
        self.matrix = self.matrix.concat(transform);
    }

    fn draw_image(&mut self, image: &DecodedImage) {
        if image.is_empty() {
            return;
        }
        let Some(inverse) = self.matrix.invert() else {
            return;
        };
        let target = self
            .matrix
            .map_rect(&Rect::new(0.0, 0.0, image.width as f64, image.height as f64));
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(&target) else {
            return;
        };

        // Nearest-neighbour: sample the source pixel under each device pixel center
        for y in y0..y1 {
            for x in x0..x1 {
                let src = inverse.map_point(Point::new(x as f64 + 0.5, y as f64 + 0.5));
                if src.x < 0.0 || src.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (src.x as u32, src.y as u32);
                if let Some([r, g, b]) = image.rgb_at(sx, sy) {
                    self.frame.put_pixel(x, y, Rgba([r, g, b, 255]));
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: &Rect, style: &OverlayStyle) {
        let device = self.matrix.map_rect(rect);
        let half = style.stroke_width / 2.0;
        let color = Rgba(style.color);

        let (outer_left, outer_right) = (device.left - half, device.right + half);
        let (outer_top, outer_bottom) = (device.top - half, device.bottom + half);
        let edges = [
            Rect::new(outer_left, outer_top, outer_right, device.top + half),
            Rect::new(outer_left, device.bottom - half, outer_right, outer_bottom),
            Rect::new(outer_left, outer_top, device.left + half, outer_bottom),
            Rect::new(device.right - half, outer_top, outer_right, outer_bottom),
        ];
        for edge in &edges {
            self.fill_device_rect(edge, color);
        }
    }
}
