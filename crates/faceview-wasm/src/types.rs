//! WASM-compatible wrapper types.
//!
//! These types wrap the core faceview types and handle the conversion between
//! Rust and JavaScript data representations.

use faceview_core::{DecodedImage, FaceDescriptor};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it to a
/// JavaScript `Uint8Array`. Binding the image to a viewer also copies it, so
/// the wrapper can be freed once bound.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGB pixel data
    /// (3 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer releases the memory otherwise.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Copy back into a core DecodedImage.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Face entry as exchanged with JavaScript: `{ x, y, eye_distance }` or
/// `null` for a discarded detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct FaceJs {
    x: f64,
    y: f64,
    eye_distance: f64,
}

impl From<FaceJs> for FaceDescriptor {
    fn from(face: FaceJs) -> Self {
        FaceDescriptor::new(face.x, face.y, face.eye_distance)
    }
}

impl From<FaceDescriptor> for FaceJs {
    fn from(face: FaceDescriptor) -> Self {
        Self {
            x: face.midpoint.x,
            y: face.midpoint.y,
            eye_distance: face.eye_distance,
        }
    }
}

pub(crate) fn faces_from_js(faces: Vec<Option<FaceJs>>) -> Vec<Option<FaceDescriptor>> {
    faces.into_iter().map(|f| f.map(FaceDescriptor::from)).collect()
}

pub(crate) fn faces_to_js(faces: Vec<Option<FaceDescriptor>>) -> Vec<Option<FaceJs>> {
    faces.into_iter().map(|f| f.map(FaceJs::from)).collect()
}
