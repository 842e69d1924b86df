//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, WebP) | `image` crate |
//! | Resize | `image::imageops::resize_exact` with `Lanczos3` filter |
//! | Rotate (multiples of 90) | `DynamicImage::rotate90/180/270` |
//! | Rotate (arbitrary angle) | `imageproc::geometric_transformations` |
//! | Watermark text | `ab_glyph` + `imageproc::drawing::draw_text_mut` |
//! | Watermark compositing | `image::imageops::overlay` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1-100) |
//! | Encode → WebP | `webp::Encoder` (lossy; the image crate only encodes lossless WebP) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{ConvertParams, ResizeParams, RotateParams, WatermarkParams};
use super::{calculations, text};
use ab_glyph::PxScale;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use std::path::Path;

/// Extensions whose decoders and encoders are compiled in.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Angles this close to a multiple of 90 take the lossless fast path.
const RIGHT_ANGLE_EPSILON: f32 = 0.01;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => save_png(img, path),
        "jpg" | "jpeg" => save_jpeg(img, path, quality),
        "webp" => save_webp(img, path, quality),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {}",
            other
        ))),
    }
}

fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    img.write_with_encoder(PngEncoder::new(writer))
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    // JPEG has no alpha channel; flatten before encoding
    let flattened;
    let img = if img.color().has_alpha() {
        flattened = DynamicImage::ImageRgb8(img.to_rgb8());
        &flattened
    } else {
        img
    };

    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(writer, quality as u8);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

/// Encode as lossy WebP via libwebp at the given quality.
fn save_webp(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    // libwebp only accepts RGB8/RGBA8 input
    let converted;
    let img = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        _ => {
            converted = DynamicImage::ImageRgba8(img.to_rgba8());
            &converted
        }
    };

    let encoder = webp::Encoder::from_image(img)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {}", e)))?;
    let encoded = encoder.encode(quality as f32);
    std::fs::write(path, &*encoded).map_err(BackendError::Io)
}

/// Rotate counter-clockwise by an arbitrary angle, optionally growing the
/// canvas to contain the whole rotated image. Revealed corners are
/// transparent black (plain black once flattened to JPEG).
fn rotate_image(img: &DynamicImage, degrees: f32, expand: bool) -> DynamicImage {
    let normalized = degrees.rem_euclid(360.0);

    // Lossless fast paths. The image crate rotates clockwise, so a
    // counter-clockwise quarter turn maps to rotate270 and vice versa.
    if normalized.abs() < RIGHT_ANGLE_EPSILON || (360.0 - normalized) < RIGHT_ANGLE_EPSILON {
        return img.clone();
    }
    if (normalized - 180.0).abs() < RIGHT_ANGLE_EPSILON {
        return img.rotate180();
    }
    if expand {
        if (normalized - 90.0).abs() < RIGHT_ANGLE_EPSILON {
            return img.rotate270();
        }
        if (normalized - 270.0).abs() < RIGHT_ANGLE_EPSILON {
            return img.rotate90();
        }
    }

    let rgba = img.to_rgba8();
    let fill = Rgba([0u8, 0, 0, 0]);

    let canvas = if expand {
        let (bounds_w, bounds_h) = calculations::rotated_bounds(rgba.width(), rgba.height(), degrees);
        let mut canvas = RgbaImage::from_pixel(bounds_w, bounds_h, fill);
        let x = (bounds_w.saturating_sub(rgba.width()) / 2) as i64;
        let y = (bounds_h.saturating_sub(rgba.height()) / 2) as i64;
        image::imageops::overlay(&mut canvas, &rgba, x, y);
        canvas
    } else {
        rgba
    };

    // imageproc rotates clockwise for positive theta
    let theta = -degrees.to_radians();
    let rotated = rotate_about_center(&canvas, theta, Interpolation::Bilinear, fill);
    DynamicImage::ImageRgba8(rotated)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn convert(&self, params: &ConvertParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        save_image(&img, &params.output, params.quality.value())
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_image(&resized, &params.output, params.quality.value())
    }

    fn rotate(&self, params: &RotateParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let rotated = rotate_image(&img, params.degrees, params.expand);
        save_image(&rotated, &params.output, params.quality.value())
    }

    fn watermark(&self, params: &WatermarkParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let font = text::load_font(params.font.as_deref())?;
        let scale = PxScale::from(params.font_size);

        let text_size = text::measure_line(&font, scale, &params.text);
        let (x, y) = calculations::watermark_anchor(
            params.position,
            (img.width(), img.height()),
            text_size,
            params.margin,
        );

        let alpha = (255.0 * params.opacity as f32 / 100.0).round() as u8;
        let [r, g, b] = params.color;

        // Draw on a transparent layer, then alpha-composite over the image so
        // opacity blends instead of replacing pixels.
        let mut layer = RgbaImage::from_pixel(img.width(), img.height(), Rgba([0, 0, 0, 0]));
        draw_text_mut(
            &mut layer,
            Rgba([r, g, b, alpha]),
            x,
            y,
            scale,
            &font,
            &params.text,
        );

        let mut base = img.to_rgba8();
        image::imageops::overlay(&mut base, &layer, 0, 0);

        save_image(
            &DynamicImage::ImageRgba8(base),
            &params.output,
            params.quality.value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::{Position, Quality};
    use image::{ImageEncoder, RgbImage};

    /// Create a small valid JPEG file with the given dimensions.
    fn create_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let file = std::fs::File::create(path).unwrap();
        let writer = std::io::BufWriter::new(file);
        image::codecs::jpeg::JpegEncoder::new(writer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    /// Create a small PNG with an alpha channel.
    fn create_test_rgba_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 255, 0, 128]));
        img.save(path).unwrap();
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn convert_jpeg_to_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 80);

        let output = tmp.path().join("output.png");
        let backend = RustBackend::new();
        backend
            .convert(&ConvertParams {
                source,
                output: output.clone(),
                quality: Quality::default(),
            })
            .unwrap();

        let img = image::open(&output).unwrap();
        assert_eq!((img.width(), img.height()), (100, 80));
    }

    #[test]
    fn convert_rgba_png_to_jpeg_flattens_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        create_test_rgba_png(&source, 60, 40);

        let output = tmp.path().join("output.jpg");
        let backend = RustBackend::new();
        backend
            .convert(&ConvertParams {
                source,
                output: output.clone(),
                quality: Quality::new(90),
            })
            .unwrap();

        let img = image::open(&output).unwrap();
        assert!(!img.color().has_alpha());
        assert_eq!((img.width(), img.height()), (60, 40));
    }

    #[test]
    fn convert_jpeg_to_lossy_webp() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 120, 90);

        let output = tmp.path().join("output.webp");
        let backend = RustBackend::new();
        backend
            .convert(&ConvertParams {
                source,
                output: output.clone(),
                quality: Quality::new(60),
            })
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (120, 90));
    }

    #[test]
    fn convert_quality_affects_jpeg_size() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let backend = RustBackend::new();
        let low = tmp.path().join("low.jpg");
        let high = tmp.path().join("high.jpg");
        for (output, quality) in [(&low, 20), (&high, 95)] {
            backend
                .convert(&ConvertParams {
                    source: source.clone(),
                    output: output.clone(),
                    quality: Quality::new(quality),
                })
                .unwrap();
        }

        let low_size = std::fs::metadata(&low).unwrap().len();
        let high_size = std::fs::metadata(&high).unwrap().len();
        assert!(low_size < high_size);
    }

    #[test]
    fn convert_unsupported_output_format_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 50, 50);

        let backend = RustBackend::new();
        let result = backend.convert(&ConvertParams {
            source,
            output: tmp.path().join("output.gif"),
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn resize_produces_exact_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 400, 300);

        let output = tmp.path().join("resized.png");
        let backend = RustBackend::new();
        backend
            .resize(&ResizeParams {
                source,
                output: output.clone(),
                width: 200,
                height: 150,
                quality: Quality::default(),
            })
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (200, 150));
    }

    #[test]
    fn rotate_quarter_turn_swaps_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 200, 100);

        let output = tmp.path().join("rotated.png");
        let backend = RustBackend::new();
        backend
            .rotate(&RotateParams {
                source,
                output: output.clone(),
                degrees: 90.0,
                expand: true,
                quality: Quality::default(),
            })
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (100, 200));
    }

    #[test]
    fn rotate_45_degrees_expands_canvas() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let output = tmp.path().join("rotated.png");
        let backend = RustBackend::new();
        backend
            .rotate(&RotateParams {
                source,
                output: output.clone(),
                degrees: 45.0,
                expand: true,
                quality: Quality::default(),
            })
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (141, 141));
    }

    #[test]
    fn rotate_without_expand_keeps_canvas() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 200, 100);

        let output = tmp.path().join("rotated.png");
        let backend = RustBackend::new();
        backend
            .rotate(&RotateParams {
                source,
                output: output.clone(),
                degrees: 30.0,
                expand: false,
                quality: Quality::default(),
            })
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (200, 100));
    }

    #[test]
    fn rotate_counter_clockwise_moves_top_left_down() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");

        // White image with a black top-left quadrant
        let img = RgbImage::from_fn(4, 4, |x, y| {
            if x < 2 && y < 2 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        img.save(&source).unwrap();

        let output = tmp.path().join("rotated.png");
        let backend = RustBackend::new();
        backend
            .rotate(&RotateParams {
                source,
                output: output.clone(),
                degrees: 90.0,
                expand: true,
                quality: Quality::default(),
            })
            .unwrap();

        // 90° counter-clockwise puts the top-left quadrant at the bottom-left
        let rotated = image::open(&output).unwrap().to_rgb8();
        assert_eq!(rotated.get_pixel(0, 3), &image::Rgb([0, 0, 0]));
        assert_eq!(rotated.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn rotate_full_turn_is_identity() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 20, image::Rgb([1, 2, 3])));
        let rotated = rotate_image(&img, 360.0, true);
        assert_eq!((rotated.width(), rotated.height()), (10, 20));
    }

    #[test]
    fn watermark_preserves_dimensions_and_marks_pixels() {
        let Some(_) = text::find_system_font() else {
            return; // no system font on this machine
        };

        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        let img = RgbImage::from_pixel(200, 100, image::Rgb([0, 0, 0]));
        img.save(&source).unwrap();

        let output = tmp.path().join("marked.png");
        let backend = RustBackend::new();
        backend
            .watermark(&WatermarkParams {
                source,
                output: output.clone(),
                text: "watermark".into(),
                position: Position::Center,
                opacity: 100,
                font_size: 24.0,
                color: [255, 255, 255],
                font: None,
                margin: 20,
                quality: Quality::default(),
            })
            .unwrap();

        let marked = image::open(&output).unwrap().to_rgb8();
        assert_eq!((marked.width(), marked.height()), (200, 100));

        // Some pixel must have turned non-black
        let touched = marked.pixels().any(|p| p.0 != [0, 0, 0]);
        assert!(touched);
    }

    #[test]
    fn watermark_zero_opacity_leaves_image_unchanged() {
        let Some(_) = text::find_system_font() else {
            return;
        };

        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.png");
        let img = RgbImage::from_pixel(100, 60, image::Rgb([10, 20, 30]));
        img.save(&source).unwrap();

        let output = tmp.path().join("marked.png");
        let backend = RustBackend::new();
        backend
            .watermark(&WatermarkParams {
                source,
                output: output.clone(),
                text: "ghost".into(),
                position: Position::BottomRight,
                opacity: 0,
                font_size: 24.0,
                color: [255, 255, 255],
                font: None,
                margin: 20,
                quality: Quality::default(),
            })
            .unwrap();

        let marked = image::open(&output).unwrap().to_rgb8();
        assert!(marked.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn watermark_with_missing_font_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        create_test_jpeg(&source, 100, 100);

        let backend = RustBackend::new();
        let result = backend.watermark(&WatermarkParams {
            source,
            output: tmp.path().join("marked.jpg"),
            text: "x".into(),
            position: Position::BottomRight,
            opacity: 50,
            font_size: 36.0,
            color: [255, 255, 255],
            font: Some("/nonexistent/font.ttf".into()),
            margin: 20,
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::Font(_))));
    }
}
