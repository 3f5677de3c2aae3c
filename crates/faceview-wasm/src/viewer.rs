//! Viewer bindings.
//!
//! [`JsFaceViewer`] owns the core engine, the bound image and a software
//! canvas. The host forwards pointer events and frame ticks, then blits the
//! RGBA frame from `render()` when `take_redraw_request()` reports a change.
//!
//! # Example
//!
//! ```typescript
//! const viewer = new JsFaceViewer(canvas.width, canvas.height, { snap_duration_ms: 250 });
//! viewer.bind_image(load_image(bytes, 1000, 1000));
//! viewer.set_faces(faces, 1.0);
//!
//! canvas.onpointermove = (e) => viewer.pointer_move(activePoints(e));
//! requestAnimationFrame(function frame(now) {
//!   viewer.tick(now - snapStart);
//!   if (viewer.take_redraw_request()) {
//!     ctx.putImageData(new ImageData(new Uint8ClampedArray(viewer.render()), w, h), 0, 0);
//!   }
//!   requestAnimationFrame(frame);
//! });
//! ```

use std::time::Duration;

use faceview_core::{
    AnimationStatus, DecodedImage, EventOutcome, FaceViewer, Point, RasterCanvas,
    Renderer, Size, ViewerConfig, ViewerError,
};
use wasm_bindgen::prelude::*;

use crate::types::{faces_from_js, FaceJs, JsDecodedImage};

/// Snap-back progress reported by [`JsFaceViewer::tick`].
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsAnimationStatus {
    Idle = 0,
    Running = 1,
    Settled = 2,
}

impl From<AnimationStatus> for JsAnimationStatus {
    fn from(status: AnimationStatus) -> Self {
        match status {
            AnimationStatus::Idle => JsAnimationStatus::Idle,
            AnimationStatus::Running => JsAnimationStatus::Running,
            AnimationStatus::Settled => JsAnimationStatus::Settled,
        }
    }
}

/// Gesture-driven viewer for one image.
#[wasm_bindgen]
pub struct JsFaceViewer {
    viewer: FaceViewer,
    image: Option<DecodedImage>,
    canvas: RasterCanvas,
    renderer: Renderer,
}

#[wasm_bindgen]
impl JsFaceViewer {
    /// Create a viewer for a `width` x `height` viewport.
    ///
    /// `config` is an optional object with any of the `ViewerConfig` fields;
    /// missing fields take their defaults.
    ///
    /// # Errors
    /// Returns error if the viewport is empty or the configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, config: JsValue) -> Result<JsFaceViewer, JsValue> {
        let config: ViewerConfig = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid viewer config: {}", e)))?
        };
        Self::create(width, height, config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Create a viewer with configuration given as a JSON document.
    pub fn from_json(width: u32, height: u32, config: &str) -> Result<JsFaceViewer, JsValue> {
        ViewerConfig::from_json(config)
            .and_then(|config| Self::create(width, height, config))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Bind an image and reset to its cover-fit view. The pixels are copied.
    pub fn bind_image(&mut self, image: &JsDecodedImage) -> Result<(), JsValue> {
        self.bind(image.to_decoded())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Supply the face list: an array of `{ x, y, eye_distance }` or `null`.
    ///
    /// `adjust_scale` maps detector coordinates to bound-image coordinates.
    pub fn set_faces(&mut self, faces: JsValue, adjust_scale: f64) -> Result<(), JsValue> {
        let faces: Vec<Option<FaceJs>> = serde_wasm_bindgen::from_value(faces)
            .map_err(|e| JsValue::from_str(&format!("Invalid face list: {}", e)))?;
        self.viewer
            .set_faces(faces_from_js(faces), adjust_scale)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Return to the cover-fit view.
    pub fn reset(&mut self) {
        self.viewer.reset();
    }

    /// First pointer down. Returns false if ignored.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        handled(self.viewer.first_finger_down(Point::new(x, y)))
    }

    /// Second pointer down with both active positions. Returns false if ignored.
    pub fn second_pointer_down(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
        handled(
            self.viewer
                .second_finger_down(Point::new(x0, y0), Point::new(x1, y1)),
        )
    }

    /// Active pointer positions as flat `[x0, y0, x1, y1, ...]` pairs.
    pub fn pointer_move(&mut self, coords: &[f64]) -> bool {
        let points: Vec<Point> = coords
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        handled(self.viewer.pointer_move(&points))
    }

    /// Any pointer up. Returns false if ignored.
    pub fn pointer_up(&mut self) -> bool {
        handled(self.viewer.finger_up())
    }

    /// Advance the snap-back animation to `elapsed_ms` since it started.
    pub fn tick(&mut self, elapsed_ms: f64) -> JsAnimationStatus {
        self.viewer.advance_animation(elapsed(elapsed_ms)).into()
    }

    #[wasm_bindgen(getter)]
    pub fn is_animating(&self) -> bool {
        self.viewer.is_animating()
    }

    /// True once after every change that needs a redraw.
    pub fn take_redraw_request(&mut self) -> bool {
        self.viewer.take_redraw_request()
    }

    /// True if any face is too close to the viewport edge.
    #[wasm_bindgen(getter)]
    pub fn needs_face_warning(&self) -> bool {
        self.viewer.needs_face_warning()
    }

    /// Per-face flags (1 = flagged), in face list order.
    pub fn face_flags(&self) -> Vec<u8> {
        self.viewer.face_flags().iter().map(|&f| u8::from(f)).collect()
    }

    /// Current transform as `[scale_x, scale_y, translate_x, translate_y]`.
    pub fn transform(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(&self.transform_values()[..])
    }

    /// Render the current frame as RGBA bytes (viewport width * height * 4).
    pub fn render(&mut self) -> Vec<u8> {
        self.draw();
        self.canvas.frame().as_raw().clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsFaceViewer {
    fn create(width: u32, height: u32, config: ViewerConfig) -> Result<Self, ViewerError> {
        let viewer = FaceViewer::new(Size::new(width as f64, height as f64), config)?;
        let renderer = Renderer::for_viewer(&viewer);
        Ok(Self {
            viewer,
            image: None,
            canvas: RasterCanvas::new(width, height),
            renderer,
        })
    }

    fn bind(&mut self, image: DecodedImage) -> Result<(), ViewerError> {
        self.viewer.bind_image(image.extent())?;
        self.image = Some(image);
        Ok(())
    }

    fn transform_values(&self) -> [f64; 4] {
        let t = self.viewer.transform();
        [t.scale_x, t.scale_y, t.translate_x, t.translate_y]
    }

    fn draw(&mut self) {
        self.canvas.clear();
        self.renderer
            .render(&mut self.canvas, self.image.as_ref(), &self.viewer);
    }
}

fn handled(outcome: EventOutcome) -> bool {
    outcome == EventOutcome::Handled
}

/// Milliseconds from the host clock; negative and NaN clamp to zero,
/// infinity completes the animation.
fn elapsed(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> JsFaceViewer {
        let mut v = JsFaceViewer::create(4, 4, ViewerConfig::default()).unwrap();
        // 8x4 image: left half red, right half green
        let mut pixels: Vec<u8> = Vec::new();
        for _y in 0..4 {
            for x in 0..8 {
                pixels.extend_from_slice(if x < 4 { &[255, 0, 0] } else { &[0, 255, 0] });
            }
        }
        v.bind(DecodedImage::new(8, 4, pixels)).unwrap();
        v
    }

    #[test]
    fn test_create_rejects_empty_viewport() {
        assert!(JsFaceViewer::create(0, 4, ViewerConfig::default()).is_err());
    }

    #[test]
    fn test_render_centers_image() {
        let mut v = viewer();
        // Cover scale 1, image centered: device x 0..2 red, 2..4 green
        assert_eq!(v.transform_values(), [1.0, 1.0, -2.0, 0.0]);
        let frame = v.render();
        assert_eq!(frame.len(), 4 * 4 * 4);
        assert_eq!(&frame[0..4], &[255, 0, 0, 255]);
        assert_eq!(&frame[12..16], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_render_without_image_is_background() {
        let mut v = JsFaceViewer::create(2, 2, ViewerConfig::default()).unwrap();
        assert!(v.render().chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_drag_and_snap_back() {
        let mut v = viewer();
        assert!(v.pointer_down(1.0, 1.0));
        assert!(v.pointer_move(&[4.0, 1.0]));
        assert_eq!(v.transform_values()[2], 1.0);
        assert!(v.pointer_up());
        assert!(v.is_animating());

        // Input is locked while snapping back
        assert!(!v.pointer_down(1.0, 1.0));
        assert_eq!(v.tick(f64::INFINITY), JsAnimationStatus::Settled);
        assert_eq!(v.tick(0.0), JsAnimationStatus::Idle);
        assert!(v.transform_values()[2].abs() < 1e-9);
    }

    #[test]
    fn test_pointer_move_ignores_odd_coordinate() {
        let mut v = viewer();
        v.pointer_down(0.0, 0.0);
        assert!(!v.pointer_move(&[1.0]));
    }

    #[test]
    fn test_face_flags() {
        let mut v = viewer();
        v.viewer
            .set_faces(
                vec![
                    Some(faceview_core::FaceDescriptor::new(4.0, 2.0, 0.5)),
                    None,
                    Some(faceview_core::FaceDescriptor::new(7.0, 2.0, 0.5)),
                ],
                1.0,
            )
            .unwrap();
        // The face at x = 7 maps to device x = 5, outside the 4px viewport
        assert_eq!(v.face_flags(), vec![0, 0, 1]);
        assert!(v.needs_face_warning());
    }

    #[test]
    fn test_elapsed_clamps() {
        assert_eq!(elapsed(-5.0), Duration::ZERO);
        assert_eq!(elapsed(f64::NAN), Duration::ZERO);
        assert_eq!(elapsed(250.0), Duration::from_millis(250));
        assert_eq!(elapsed(f64::INFINITY), Duration::MAX);
    }
}
