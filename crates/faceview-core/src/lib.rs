//! Faceview Core - Gesture-driven image viewport
//!
//! This crate provides the core of a single-image viewer that keeps detected
//! faces on screen: a pan/zoom transform driven by pointer gestures, boundary
//! correction with an animated snap-back, per-face visibility tracking, and a
//! renderer that outlines faces pushed too close to the viewport edge.
//!
//! # Architecture
//!
//! - [`FaceViewer`] is the write side. It consumes pointer events and
//!   animation ticks and owns all mutable state.
//! - [`Renderer`] is the read side. It draws a viewer through any [`Canvas`].
//! - [`load`] turns encoded bytes into a [`DecodedImage`] to bind.
//!
//! All operations are synchronous and single-threaded; the host calls
//! [`FaceViewer::advance_animation`] from its frame callback.

pub mod boundary;
pub mod config;
pub mod engine;
pub mod error;
pub mod faces;
pub mod geometry;
pub mod gesture;
pub mod load;
pub mod render;
pub mod transform;

pub use config::{OverlayStyle, ViewerConfig};
pub use engine::{AnimationStatus, EventOutcome, FaceViewer};
pub use error::ViewerError;
pub use faces::{discard_incomplete, FaceDescriptor, FaceVisibilityTracker};
pub use geometry::{Point, Rect, Size, Vector};
pub use load::{load_image, DecodeError, DecodedImage};
pub use render::{Canvas, RasterCanvas, Renderer};
pub use transform::{FitAxis, Transform2D};
