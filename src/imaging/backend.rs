//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the five operations every backend must
//! support: identify, convert, resize, rotate, and watermark.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust apart from
//! the libwebp encoder, everything statically linked into the binary.

use super::params::{ConvertParams, ResizeParams, RotateParams, WatermarkParams};
use super::text::FontError;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Every backend must implement all five operations so the rest of the
/// codebase is backend-agnostic. Operation wrappers validate inputs and
/// compute parameters; backends only execute them.
pub trait ImageBackend {
    /// Get image dimensions without decoding the full image.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the source and re-encode it as the output extension's format.
    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError>;

    /// Resize to exact target dimensions.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Rotate counter-clockwise by an arbitrary angle.
    fn rotate(&self, params: &RotateParams) -> Result<(), BackendError>;

    /// Composite a text watermark over the image.
    fn watermark(&self, params: &WatermarkParams) -> Result<(), BackendError>;
}
