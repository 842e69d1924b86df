//! # oneimage
//!
//! A command-line tool for image format conversion and manipulation:
//! convert between PNG/JPEG/WebP, resize, rotate, and add text watermarks.
//!
//! All pixel-level work is delegated to the `image` crate ecosystem. This
//! crate's own code is the glue around it: a CLI, input validation, thin
//! per-operation wrappers, and logging setup.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Operation wrappers, parameter types, dimension math, and the [`imaging::ImageBackend`] trait with its `image`-crate implementation |
//! | [`validate`] | Path, extension, and numeric-range checks shared by every operation |
//! | [`config`] | Optional `oneimage.toml` with defaults for quality, watermark appearance, and logging |
//! | [`logging`] | Rotating file sink + opt-in console output via `tracing` |
//! | [`output`] | CLI output formatting — pure `format_*` functions |
//!
//! # Design Decisions
//!
//! ## Backend Trait
//!
//! Operations talk to an [`imaging::ImageBackend`] rather than the `image`
//! crate directly. The production backend does the pixel work; tests swap in
//! a recording mock, so validation and dimension logic are exercised without
//! encoding a single image.
//!
//! ## Pure Calculation Layer
//!
//! Aspect-ratio resolution, rotation bounds, and watermark placement are
//! pure functions over integers. They carry the only non-trivial arithmetic
//! in the tool and are unit-tested exhaustively.
//!
//! ## Always-On File Log
//!
//! Every run appends to a daily-rotating log file; `--logging` additionally
//! mirrors records to stderr. Console output stays clean by default while
//! the file keeps a trail for debugging batch scripts.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod validate;
