//! Font loading and text measurement for watermarks.
//!
//! Fonts are loaded from disk at runtime: either an explicit file passed by
//! the caller, or the first hit in a list of well-known system font paths.
//! Measurement works on kerned glyph advances so the watermark anchor math
//! sees the same width the rasterizer will produce.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Cannot read font file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Not a usable font file: {0}")]
    Invalid(PathBuf),
    #[error("No system font found; pass an explicit font file with --font")]
    NotFound,
}

/// Well-known font locations, checked in order.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First existing path from the system font list.
pub fn find_system_font() -> Option<PathBuf> {
    FONT_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Load a font from `explicit` when given, otherwise from the system paths.
pub fn load_font(explicit: Option<&Path>) -> Result<FontVec, FontError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_system_font().ok_or(FontError::NotFound)?,
    };

    let data = std::fs::read(&path).map_err(|source| FontError::Read {
        path: path.clone(),
        source,
    })?;
    FontVec::try_from_vec(data).map_err(|_| FontError::Invalid(path))
}

/// Measure the pixel size of a single line of text at the given scale.
///
/// Width is the kerned sum of glyph advances; height spans ascent to descent.
pub fn measure_line(font: &impl Font, scale: PxScale, text: &str) -> (u32, u32) {
    let scaled = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;
    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled.ascent() - scaled.descent();
    (width.ceil() as u32, height.ceil() as u32)
}
