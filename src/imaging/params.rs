//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which validates inputs and decides target dimensions) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock)
//! without changing operation logic.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Placement of a watermark relative to the image frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Default for Position {
    fn default() -> Self {
        Self::BottomRight
    }
}

/// Parameters for a format conversion (decode, re-encode as the output
/// extension's format).
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub quality: Quality,
}

/// Parameters for a resize to exact target dimensions.
///
/// Aspect-ratio handling happens before these are built; the backend resizes
/// to exactly `width` x `height`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Parameters for a rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Counter-clockwise rotation in degrees. Any value is accepted;
    /// multiples of 90 take a lossless fast path.
    pub degrees: f32,
    /// Grow the canvas to fit the rotated image instead of keeping the
    /// original frame and clipping the corners.
    pub expand: bool,
    pub quality: Quality,
}

/// Parameters for a text watermark.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub text: String,
    pub position: Position,
    /// Watermark opacity, 0 (invisible) to 100 (opaque).
    pub opacity: u32,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color as RGB.
    pub color: [u8; 3],
    /// Explicit font file; when `None` the system font paths are searched.
    pub font: Option<PathBuf>,
    /// Distance from the image edge in pixels for corner positions.
    pub margin: u32,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn position_default_is_bottom_right() {
        assert_eq!(Position::default(), Position::BottomRight);
    }

    #[test]
    fn position_deserializes_kebab_case() {
        let pos: Position = toml::Value::String("top-left".into()).try_into().unwrap();
        assert_eq!(pos, Position::TopLeft);
    }
}
