//! CLI output formatting.
//!
//! Each operation has a `format_*` function (pure, returns a `String`) and
//! the binary prints the result. Errors go to stderr via [`print_error`].

use std::path::Path;

/// Display form of a path: the file name when available, the full path
/// otherwise.
fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn format_convert(source: &Path, output: &Path) -> String {
    format!("Converted {} -> {}", name_of(source), name_of(output))
}

pub fn format_resize(source: &Path, output: &Path, dimensions: (u32, u32)) -> String {
    format!(
        "Resized {} -> {} ({}x{})",
        name_of(source),
        name_of(output),
        dimensions.0,
        dimensions.1
    )
}

pub fn format_rotate(source: &Path, output: &Path, degrees: f32) -> String {
    format!(
        "Rotated {} by {}\u{b0} -> {}",
        name_of(source),
        degrees,
        name_of(output)
    )
}

pub fn format_watermark(source: &Path, output: &Path) -> String {
    format!("Watermarked {} -> {}", name_of(source), name_of(output))
}

/// Print a failure to stderr in the `Error: ...` form the CLI promises.
pub fn print_error(error: &dyn std::error::Error) {
    eprintln!("Error: {}", error);
}
