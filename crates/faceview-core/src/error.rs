//! Setup and configuration errors.
//!
//! These only surface while a viewer is being configured. Once running, the
//! interaction paths resolve every edge case to a no-op instead of failing.

use thiserror::Error;

/// Error types for viewer setup.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The viewport must be positive and finite on both axes.
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    /// The bound image must be positive and finite on both axes.
    #[error("Invalid image extent: {width}x{height}")]
    InvalidImageExtent { width: f64, height: f64 },

    /// The face coordinate adjustment must be positive and finite.
    #[error("Invalid face adjust scale: {0}")]
    InvalidAdjustScale(f64),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),
}
