//! Faceview WASM - WebAssembly bindings for the faceview viewport engine
//!
//! This crate exposes faceview-core to JavaScript/TypeScript hosts.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image and face data
//! - `load` - Image loading and face-list filtering
//! - `viewer` - The gesture-driven viewer and its software renderer
//!
//! # Usage
//!
//! ```typescript
//! import init, { load_image, JsFaceViewer } from '@faceview/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = load_image(bytes, 1000, 1000);
//! const viewer = new JsFaceViewer(640, 480, undefined);
//! viewer.bind_image(image);
//! ```

use wasm_bindgen::prelude::*;

mod load;
mod types;
mod viewer;

pub use load::{compute_sample_size, discard_incomplete_faces, load_image, trim_to_even_width};
pub use types::JsDecodedImage;
pub use viewer::{JsAnimationStatus, JsFaceViewer};

/// Initialize the WASM module (called automatically on load).
///
/// Routes panics and `log` output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);
    log::debug!("faceview-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
