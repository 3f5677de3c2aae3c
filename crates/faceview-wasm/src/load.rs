//! Image loading and face-list bindings.
//!
//! # Example
//!
//! ```typescript
//! import { load_image, discard_incomplete_faces } from '@faceview/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = load_image(bytes, 1000, 1000);
//! const faces = discard_incomplete_faces(detected, image.width, image.height);
//! ```

use faceview_core::load;
use faceview_core::{discard_incomplete, Size};
use wasm_bindgen::prelude::*;

use crate::types::{faces_from_js, faces_to_js, FaceJs, JsDecodedImage};

/// Decode an image, apply its EXIF orientation and downsample it to fit
/// within `max_width` x `max_height`. A zero bound disables downsampling.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are corrupted.
#[wasm_bindgen]
pub fn load_image(bytes: &[u8], max_width: u32, max_height: u32) -> Result<JsDecodedImage, JsValue> {
    load::load_image(bytes, max_width, max_height)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Drop the last column of an odd-width image, as some face detectors
/// require even widths.
#[wasm_bindgen]
pub fn trim_to_even_width(image: &JsDecodedImage) -> JsDecodedImage {
    JsDecodedImage::from_decoded(load::trim_to_even_width(image.to_decoded()))
}

/// Sample size for downsampling a `width` x `height` image.
///
/// Pass 0 for `min_side` or `max_pixels` to leave that bound unset.
#[wasm_bindgen]
pub fn compute_sample_size(width: u32, height: u32, min_side: u32, max_pixels: f64) -> u32 {
    let max_pixels = (max_pixels.is_finite() && max_pixels >= 1.0).then_some(max_pixels as u64);
    load::compute_sample_size(width, height, Some(min_side), max_pixels)
}

/// Replace detections already cut off by the detector image with `null`.
///
/// `faces` is an array of `{ x, y, eye_distance }` objects or `null`.
#[wasm_bindgen]
pub fn discard_incomplete_faces(faces: JsValue, width: f64, height: f64) -> Result<JsValue, JsValue> {
    let faces: Vec<Option<FaceJs>> = serde_wasm_bindgen::from_value(faces)
        .map_err(|e| JsValue::from_str(&format!("Invalid face list: {}", e)))?;
    let kept = discard_faces(faces, width, height);
    serde_wasm_bindgen::to_value(&kept).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn discard_faces(faces: Vec<Option<FaceJs>>, width: f64, height: f64) -> Vec<Option<FaceJs>> {
    faces_to_js(discard_incomplete(faces_from_js(faces), Size::new(width, height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_sample_size_unset_bounds() {
        assert_eq!(compute_sample_size(4000, 3000, 0, 0.0), 1);
        assert_eq!(compute_sample_size(4000, 3000, 0, 1_000_000.0), 4);
        assert_eq!(compute_sample_size(4000, 3000, 500, 0.0), 8);
    }

    #[test]
    fn test_trim_to_even_width() {
        let img = JsDecodedImage::new(3, 1, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let trimmed = trim_to_even_width(&img);
        assert_eq!(trimmed.width(), 2);
        assert_eq!(trimmed.pixels(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_discard_faces() {
        let faces: Vec<Option<FaceJs>> = faces_to_js(vec![
            Some(faceview_core::FaceDescriptor::new(50.0, 50.0, 10.0)),
            Some(faceview_core::FaceDescriptor::new(5.0, 50.0, 10.0)),
            None,
        ]);
        let kept = discard_faces(faces, 100.0, 100.0);
        assert!(kept[0].is_some());
        assert!(kept[1].is_none());
        assert!(kept[2].is_none());
    }
}

/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde::Serialize;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[derive(Serialize)]
    struct TestFace {
        x: f64,
        y: f64,
        eye_distance: f64,
    }

    #[wasm_bindgen_test]
    fn test_discard_incomplete_faces() {
        let faces = js_sys::Array::new();
        for x in [50.0, 5.0] {
            let face = TestFace {
                x,
                y: 50.0,
                eye_distance: 10.0,
            };
            faces.push(&serde_wasm_bindgen::to_value(&face).unwrap());
        }
        faces.push(&JsValue::NULL);

        let kept = discard_incomplete_faces(faces.into(), 100.0, 100.0).unwrap();
        let kept: Vec<Option<FaceJs>> = serde_wasm_bindgen::from_value(kept).unwrap();
        assert_eq!(kept.len(), 3);
        assert!(kept[0].is_some());
        assert!(kept[1].is_none());
        assert!(kept[2].is_none());
    }

    #[wasm_bindgen_test]
    fn test_discard_incomplete_faces_rejects_non_array() {
        assert!(discard_incomplete_faces(JsValue::from_str("faces"), 100.0, 100.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_load_image_rejects_garbage() {
        assert!(load_image(&[0x00, 0x01, 0x02, 0x03], 100, 100).is_err());
    }
}
