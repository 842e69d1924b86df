//! High-level image operations, one per subcommand.
//!
//! Each wrapper validates its inputs, computes parameters, and calls the
//! backend. No pixel work happens here.

use super::backend::{BackendError, ImageBackend};
use super::calculations;
use super::params::{ConvertParams, Position, ResizeParams, RotateParams, WatermarkParams};
use crate::validate::{self, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Convert an image from one format to another.
///
/// The target format is inferred from the output extension; `quality`
/// applies to lossy formats (JPEG, WebP) only.
pub fn convert_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    quality: u32,
) -> Result<()> {
    info!(source = %source.display(), output = %output.display(), "Starting conversion");

    validate::input_path(source)?;
    validate::output_path(output)?;
    let quality = validate::quality(quality)?;

    backend.convert(&ConvertParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        quality,
    })?;

    info!(output = %output.display(), "Conversion complete");
    Ok(())
}

/// Resize an image to the requested dimensions.
///
/// At least one of `width`/`height` must be given. With `preserve_aspect`,
/// a single dimension derives the other from the source ratio, and two
/// dimensions scale the image to fit within the requested box. Returns the
/// final dimensions.
pub fn resize_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    width: Option<u32>,
    height: Option<u32>,
    preserve_aspect: bool,
    quality: u32,
) -> Result<(u32, u32)> {
    info!(source = %source.display(), output = %output.display(), "Starting resize");

    validate::input_path(source)?;
    validate::output_path(output)?;
    validate::resize_dimensions(width, height)?;
    let quality = validate::quality(quality)?;

    let dims = backend.identify(source)?;
    let (target_w, target_h) = calculations::resize_dimensions(
        (dims.width, dims.height),
        width,
        height,
        preserve_aspect,
    );
    debug!(
        from_w = dims.width,
        from_h = dims.height,
        to_w = target_w,
        to_h = target_h,
        preserve_aspect,
        "Resolved target dimensions"
    );

    backend.resize(&ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width: target_w,
        height: target_h,
        quality,
    })?;

    info!(width = target_w, height = target_h, "Resize complete");
    Ok((target_w, target_h))
}

/// Rotate an image counter-clockwise by `degrees`.
///
/// With `expand` the canvas grows to contain the whole rotated image;
/// otherwise the frame keeps its size and corners are clipped.
pub fn rotate_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    degrees: f32,
    expand: bool,
    quality: u32,
) -> Result<()> {
    info!(source = %source.display(), degrees, expand, "Starting rotation");

    validate::input_path(source)?;
    validate::output_path(output)?;
    let quality = validate::quality(quality)?;

    backend.rotate(&RotateParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        degrees,
        expand,
        quality,
    })?;

    info!(output = %output.display(), "Rotation complete");
    Ok(())
}

/// Watermark text settings resolved from flags and config.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub text: String,
    pub position: Position,
    pub opacity: u32,
    pub font_size: f32,
    /// Color name or `#rrggbb`; unknown values fall back to white.
    pub color: String,
    pub font: Option<PathBuf>,
    pub margin: u32,
    pub quality: u32,
}

/// Composite a text watermark onto an image.
pub fn watermark_image(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    options: &WatermarkOptions,
) -> Result<()> {
    info!(source = %source.display(), text = %options.text, "Adding watermark");

    validate::input_path(source)?;
    validate::output_path(output)?;
    let quality = validate::quality(options.quality)?;
    let opacity = validate::opacity(options.opacity)?;
    let font_size = validate::font_size(options.font_size)?;
    let color = validate::color_or_white(&options.color);

    backend.watermark(&WatermarkParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        text: options.text.clone(),
        position: options.position,
        opacity,
        font_size,
        color,
        font: options.font.clone(),
        margin: options.margin,
        quality,
    })?;

    info!(output = %output.display(), "Watermark complete");
    Ok(())
}
