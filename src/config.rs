//! Tool configuration module.
//!
//! Handles loading and validating an optional `oneimage.toml`. Defaults
//! cover everything; a config file only overrides the values it names.
//!
//! ## Config File Location
//!
//! Passed explicitly with `--config PATH`, or picked up from `oneimage.toml`
//! in the working directory when present.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! quality = 85              # Default quality for lossy formats (1-100)
//!
//! [watermark]
//! opacity = 50              # Default watermark opacity (0-100)
//! font_size = 36.0          # Font size in pixels
//! font_color = "white"      # Color name or "#rrggbb"
//! position = "bottom-right" # top-left, top-right, bottom-left, bottom-right, center
//! margin = 20               # Distance from the image edge in pixels
//!
//! [logging]
//! directory = "logs"        # Rotating log file location
//! level = "info"            # off, error, warn, info, debug, trace
//! ```
//!
//! Unknown keys are rejected to catch typos early. CLI flags override config
//! values; the `RUST_LOG` environment variable overrides the logging level.

use crate::imaging::Position;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config filename looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "oneimage.toml";

/// Tool configuration loaded from `oneimage.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Encoding defaults for lossy output formats.
    pub output: OutputConfig,
    /// Watermark appearance defaults.
    pub watermark: WatermarkConfig,
    /// Log sink settings.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the effective config.
    ///
    /// An explicit `--config` path must exist. Without one, `oneimage.toml`
    /// in the working directory is used when present, else built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.watermark.opacity > 100 {
            return Err(ConfigError::Validation(
                "watermark.opacity must be 0-100".into(),
            ));
        }
        if self.watermark.font_size <= 0.0 {
            return Err(ConfigError::Validation(
                "watermark.font_size must be positive".into(),
            ));
        }
        const LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of: {}",
                LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Encoding defaults for lossy output formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Quality used when no `--quality` flag is given (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

/// Watermark appearance defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    /// Opacity of watermark text, 0 (invisible) to 100 (opaque).
    pub opacity: u32,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color: a color name or `#rrggbb`.
    pub font_color: String,
    /// Default placement.
    pub position: Position,
    /// Distance from the image edge in pixels for corner positions.
    pub margin: u32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            opacity: 50,
            font_size: 36.0,
            font_color: "white".to_string(),
            position: Position::BottomRight,
            margin: 20,
        }
    }
}

/// Log sink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Directory for the rotating log file.
    pub directory: PathBuf,
    /// Level used when `RUST_LOG` is unset and no `--log-level` flag is given.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            level: "info".to_string(),
        }
    }
}

/// Returns a fully-commented stock `oneimage.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# oneimage Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as oneimage.toml in the directory you run from, or pass
# an explicit path with --config. Command-line flags override these values.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# Quality for lossy formats (JPEG, WebP) when no --quality flag is given
# (1 = worst, 100 = best). PNG output ignores quality.
quality = 85

# ---------------------------------------------------------------------------
# Watermark defaults
# ---------------------------------------------------------------------------
[watermark]
# Text opacity, 0 (invisible) to 100 (opaque).
opacity = 50

# Font size in pixels.
font_size = 36.0

# Text color: a color name (white, black, red, ...) or "#rrggbb".
font_color = "white"

# Placement: top-left, top-right, bottom-left, bottom-right, center.
position = "bottom-right"

# Distance from the image edge in pixels (corner positions only).
margin = 20

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# Directory for the daily-rotating log file.
directory = "logs"

# Level when RUST_LOG is unset and no --log-level flag is given:
# off, error, warn, info, debug, trace.
level = "info"
"##
}
