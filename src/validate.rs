//! Input validation shared by every operation.
//!
//! Validation happens in the operation wrappers, not just at the CLI parser,
//! so library callers get the same contract as the command line: bad paths,
//! unsupported extensions, and out-of-range numbers are rejected before any
//! pixel work starts.

use crate::imaging::params::Quality;
use crate::imaging::rust_backend::SUPPORTED_EXTENSIONS;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("File does not exist: {0}")]
    MissingFile(PathBuf),
    #[error("Path is not a file: {0}")]
    NotAFile(PathBuf),
    #[error("Unsupported {direction} format '{extension}'. Supported formats: jpg, jpeg, png, webp")]
    UnsupportedFormat {
        direction: &'static str,
        extension: String,
    },
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Quality must be between 1 and 100, got {0}")]
    QualityOutOfRange(u32),
    #[error("Opacity must be between 0 and 100, got {0}")]
    OpacityOutOfRange(u32),
    #[error("Font size must be greater than 0, got {0}")]
    FontSizeOutOfRange(f32),
    #[error("At least one of width or height must be specified")]
    NoDimensions,
    #[error("{0} must be positive")]
    ZeroDimension(&'static str),
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn check_extension(path: &Path, direction: &'static str) -> Result<(), ValidationError> {
    let ext = extension_of(path);
    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFormat {
            direction,
            extension: ext,
        })
    }
}

/// Validate a source image path: must exist, be a regular file, and carry a
/// supported extension.
pub fn input_path(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::MissingFile(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(ValidationError::NotAFile(path.to_path_buf()));
    }
    check_extension(path, "input")
}

/// Validate an output image path: supported extension, parent directory
/// created when missing.
pub fn output_path(path: &Path) -> Result<(), ValidationError> {
    check_extension(path, "output")?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| ValidationError::OutputDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Validate a quality value (1-100) into a [`Quality`].
pub fn quality(value: u32) -> Result<Quality, ValidationError> {
    if (1..=100).contains(&value) {
        Ok(Quality::new(value))
    } else {
        Err(ValidationError::QualityOutOfRange(value))
    }
}

/// Validate a watermark opacity (0-100).
pub fn opacity(value: u32) -> Result<u32, ValidationError> {
    if value <= 100 {
        Ok(value)
    } else {
        Err(ValidationError::OpacityOutOfRange(value))
    }
}

/// Validate a watermark font size (strictly positive).
pub fn font_size(value: f32) -> Result<f32, ValidationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::FontSizeOutOfRange(value))
    }
}

/// Validate requested resize dimensions: at least one given, none zero.
pub fn resize_dimensions(
    width: Option<u32>,
    height: Option<u32>,
) -> Result<(), ValidationError> {
    if width.is_none() && height.is_none() {
        return Err(ValidationError::NoDimensions);
    }
    if width == Some(0) {
        return Err(ValidationError::ZeroDimension("Width"));
    }
    if height == Some(0) {
        return Err(ValidationError::ZeroDimension("Height"));
    }
    Ok(())
}

/// Named CSS-style colors accepted for watermark text.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
];

/// Parse a color name or `#rrggbb` hex string.
pub fn parse_color(value: &str) -> Option<[u8; 3]> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some([r, g, b]);
    }

    let lower = value.to_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| *rgb)
}

/// Parse a color, falling back to white on unknown input.
///
/// Matches the CLI contract: a bad color is a warning, not a hard error.
pub fn color_or_white(value: &str) -> [u8; 3] {
    parse_color(value).unwrap_or_else(|| {
        warn!("Invalid color '{}', using white", value);
        [255, 255, 255]
    })
}
