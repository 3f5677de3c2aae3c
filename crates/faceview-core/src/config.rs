//! Viewer configuration.
//!
//! Every field has a default, so a host only needs to supply the values it
//! wants to change:
//!
//! ```json
//! { "snap_duration_ms": 300, "overlay": { "color": [255, 0, 0, 255] } }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::faces::{FaceMargins, FACE_HORIZONTAL, FACE_VERTICAL};

/// Upper zoom bound as a multiple of the viewport on the fit axis.
pub const MAX_ZOOM: f64 = 3.0;

/// Snap-back animation length in milliseconds.
pub const SNAP_DURATION_MS: u64 = 200;

/// Stroke used for face overlay rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// RGBA stroke color.
    pub color: [u8; 4],
    /// Stroke width in viewport pixels.
    pub stroke_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [0, 0, 255, 255],
            stroke_width: 2.0,
        }
    }
}

/// Tunables for the gesture engine, face tracker and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Snap-back animation length in milliseconds.
    pub snap_duration_ms: u64,
    /// Maximum fit-axis extent as a multiple of the viewport.
    pub max_zoom: f64,
    /// Face box half-width in eye distances.
    pub face_horizontal_factor: f64,
    /// Face box half-height in eye distances.
    pub face_vertical_factor: f64,
    pub overlay: OverlayStyle,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            snap_duration_ms: SNAP_DURATION_MS,
            max_zoom: MAX_ZOOM,
            face_horizontal_factor: FACE_HORIZONTAL,
            face_vertical_factor: FACE_VERTICAL,
            overlay: OverlayStyle::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, ViewerError> {
        let config: ViewerConfig =
            serde_json::from_str(text).map_err(|e| ViewerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if !self.max_zoom.is_finite() || self.max_zoom < 1.0 {
            return Err(ViewerError::InvalidConfig(format!(
                "max_zoom must be at least 1, got {}",
                self.max_zoom
            )));
        }
        for (name, value) in [
            ("face_horizontal_factor", self.face_horizontal_factor),
            ("face_vertical_factor", self.face_vertical_factor),
            ("overlay.stroke_width", self.overlay.stroke_width),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ViewerError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }

    pub fn face_margins(&self) -> FaceMargins {
        FaceMargins {
            horizontal: self.face_horizontal_factor,
            vertical: self.face_vertical_factor,
        }
    }
}
