//! Pure calculation functions for image dimensions and placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Position;

/// Calculate target dimensions for a resize.
///
/// # Arguments
/// * `original` - Source image dimensions (width, height)
/// * `width` / `height` - Requested dimensions; at least one must be given
/// * `preserve_aspect` - Keep the source width-to-height proportion
///
/// With `preserve_aspect`:
/// - One dimension given: the other is derived from the source ratio.
/// - Both given: the image is scaled to fit *within* the requested box,
///   using whichever axis constrains more.
///
/// Without `preserve_aspect`, missing dimensions default to the original
/// and given ones are applied verbatim.
pub fn resize_dimensions(
    original: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    preserve_aspect: bool,
) -> (u32, u32) {
    let (orig_w, orig_h) = original;

    if !preserve_aspect {
        return (width.unwrap_or(orig_w), height.unwrap_or(orig_h));
    }

    match (width, height) {
        (Some(w), None) => {
            let h = (w as f64 * orig_h as f64 / orig_w as f64).round() as u32;
            (w, h.max(1))
        }
        (None, Some(h)) => {
            let w = (h as f64 * orig_w as f64 / orig_h as f64).round() as u32;
            (w.max(1), h)
        }
        (Some(w), Some(h)) => {
            let width_ratio = w as f64 / orig_w as f64;
            let height_ratio = h as f64 / orig_h as f64;
            if width_ratio < height_ratio {
                // Width constrains: scale height down to match
                let h = (orig_h as f64 * width_ratio).round() as u32;
                (w, h.max(1))
            } else {
                let w = (orig_w as f64 * height_ratio).round() as u32;
                (w.max(1), h)
            }
        }
        (None, None) => (orig_w, orig_h),
    }
}

/// Bounding box of a `width` x `height` canvas rotated by `degrees`.
///
/// Used when a rotation expands the output canvas to contain the whole
/// rotated image.
pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let radians = (degrees as f64).to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    let w = width as f64;
    let h = height as f64;

    let out_w = (w * cos + h * sin).round() as u32;
    let out_h = (w * sin + h * cos).round() as u32;
    (out_w.max(1), out_h.max(1))
}

/// Top-left anchor for watermark text of `text` pixels placed on an
/// `image`-sized canvas.
///
/// Corner positions keep `margin` pixels from the nearest edges; `Center`
/// ignores the margin. Coordinates can go negative when the text is larger
/// than the image; the drawing layer clips.
pub fn watermark_anchor(
    position: Position,
    image: (u32, u32),
    text: (u32, u32),
    margin: u32,
) -> (i32, i32) {
    let (img_w, img_h) = (image.0 as i64, image.1 as i64);
    let (text_w, text_h) = (text.0 as i64, text.1 as i64);
    let margin = margin as i64;

    let (x, y) = match position {
        Position::TopLeft => (margin, margin),
        Position::TopRight => (img_w - text_w - margin, margin),
        Position::BottomLeft => (margin, img_h - text_h - margin),
        Position::BottomRight => (img_w - text_w - margin, img_h - text_h - margin),
        Position::Center => ((img_w - text_w) / 2, (img_h - text_h) / 2),
    };

    (x as i32, y as i32)
}
