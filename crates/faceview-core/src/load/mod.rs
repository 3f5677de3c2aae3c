//! Image loading for the viewer.
//!
//! Turns encoded bytes into a `DecodedImage` ready to bind:
//! - Decoding JPEG and PNG through the `image` crate
//! - Applying the EXIF orientation tag
//! - Downsampling by an integer sample size to bound memory
//! - Trimming odd widths for face detectors that require even widths
//!
//! # Examples
//!
//! ```ignore
//! use faceview_core::load::load_image;
//!
//! let bytes = std::fs::read("group.jpg").unwrap();
//! let image = load_image(&bytes, 1000, 1000).unwrap();
//! viewer.bind_image(image.extent()).unwrap();
//! ```

mod decode;
mod sample;
mod types;

pub use decode::{decode_image, get_orientation};
pub use sample::{compute_sample_size, load_image, trim_to_even_width};
pub use types::{DecodeError, DecodedImage, Orientation};
