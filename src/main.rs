use clap::{Parser, Subcommand};
use oneimage::imaging::{self, Position, RustBackend};
use oneimage::{config, logging, output};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "oneimage")]
#[command(about = "Command-line tool for image format conversion and manipulation")]
#[command(long_about = "\
Command-line tool for image format conversion and manipulation

Supported formats: PNG, JPEG, WebP. The target format is inferred from the
output file extension. Quality (1-100) applies to lossy formats; PNG output
ignores it.

Every run logs to a daily-rotating file (logs/oneimage.log by default);
pass --logging to mirror log output to the console. Defaults for quality,
watermark appearance, and logging can be set in oneimage.toml — run
'oneimage gen-config' to print a documented template.")]
#[command(version)]
struct Cli {
    /// Enable console logging output
    #[arg(long, short = 'l', global = true)]
    logging: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Config file (defaults to oneimage.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an image from one format to another
    Convert {
        /// Path to the input image file
        input: PathBuf,
        /// Path where the converted image will be saved
        output: PathBuf,
        /// Output image quality (1-100)
        #[arg(long, short = 'q', value_parser = clap::value_parser!(u32).range(1..=100))]
        quality: Option<u32>,
    },
    /// Resize an image to specified dimensions
    #[command(long_about = "\
Resize an image to specified dimensions.

If only width or height is specified, the other dimension is calculated to
maintain aspect ratio. If both are specified, the image is resized to fit
within the requested box unless --no-aspect-ratio is passed.")]
    Resize {
        /// Path to the input image file
        input: PathBuf,
        /// Path where the resized image will be saved
        output: PathBuf,
        /// Target width in pixels
        #[arg(long, short = 'W')]
        width: Option<u32>,
        /// Target height in pixels
        #[arg(long, short = 'H')]
        height: Option<u32>,
        /// Stretch to the exact dimensions instead of keeping proportions
        #[arg(long)]
        no_aspect_ratio: bool,
        /// Output image quality (1-100)
        #[arg(long, short = 'q', value_parser = clap::value_parser!(u32).range(1..=100))]
        quality: Option<u32>,
    },
    /// Rotate an image by a specified angle
    Rotate {
        /// Path to the input image file
        input: PathBuf,
        /// Path where the rotated image will be saved
        output: PathBuf,
        /// Rotation angle in degrees (counter-clockwise)
        #[arg(long, short = 'a', default_value_t = 90.0, allow_negative_numbers = true)]
        angle: f32,
        /// Keep the original canvas instead of expanding to fit
        #[arg(long)]
        no_expand: bool,
        /// Output image quality (1-100)
        #[arg(long, short = 'q', value_parser = clap::value_parser!(u32).range(1..=100))]
        quality: Option<u32>,
    },
    /// Add a text watermark to an image
    Watermark {
        /// Path to the input image file
        input: PathBuf,
        /// Path where the watermarked image will be saved
        output: PathBuf,
        /// Text to use as watermark
        #[arg(long, short = 't')]
        text: String,
        /// Watermark position
        #[arg(long, value_enum)]
        position: Option<Position>,
        /// Watermark opacity (0-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
        opacity: Option<u32>,
        /// Font size for watermark text
        #[arg(long)]
        font_size: Option<f32>,
        /// Color of watermark text (name or #rrggbb)
        #[arg(long)]
        font_color: Option<String>,
        /// Font file to use instead of searching system fonts
        #[arg(long)]
        font: Option<PathBuf>,
        /// Output image quality (1-100)
        #[arg(long, short = 'q', value_parser = clap::value_parser!(u32).range(1..=100))]
        quality: Option<u32>,
    },
    /// Print a stock oneimage.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            output::print_error(error.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if matches!(cli.command, Command::GenConfig) {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::Config::load_or_default(cli.config.as_deref())?;
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(&config.logging.level)
        .to_string();
    let _guard = logging::init(&config.logging.directory, &level, cli.logging)?;

    let backend = RustBackend::new();
    let result = dispatch(cli.command, &config, &backend);
    if let Err(error) = &result {
        tracing::error!("{error}");
    }
    result.map_err(Into::into)
}

fn dispatch(
    command: Command,
    config: &config::Config,
    backend: &RustBackend,
) -> Result<(), imaging::OperationError> {
    match command {
        Command::Convert {
            input,
            output,
            quality,
        } => {
            let quality = quality.unwrap_or(config.output.quality);
            imaging::convert_image(backend, &input, &output, quality)?;
            println!("{}", output::format_convert(&input, &output));
        }
        Command::Resize {
            input,
            output,
            width,
            height,
            no_aspect_ratio,
            quality,
        } => {
            let quality = quality.unwrap_or(config.output.quality);
            let dims = imaging::resize_image(
                backend,
                &input,
                &output,
                width,
                height,
                !no_aspect_ratio,
                quality,
            )?;
            println!("{}", output::format_resize(&input, &output, dims));
        }
        Command::Rotate {
            input,
            output,
            angle,
            no_expand,
            quality,
        } => {
            let quality = quality.unwrap_or(config.output.quality);
            imaging::rotate_image(backend, &input, &output, angle, !no_expand, quality)?;
            println!("{}", output::format_rotate(&input, &output, angle));
        }
        Command::Watermark {
            input,
            output,
            text,
            position,
            opacity,
            font_size,
            font_color,
            font,
            quality,
        } => {
            let options = imaging::WatermarkOptions {
                text,
                position: position.unwrap_or(config.watermark.position),
                opacity: opacity.unwrap_or(config.watermark.opacity),
                font_size: font_size.unwrap_or(config.watermark.font_size),
                color: font_color.unwrap_or_else(|| config.watermark.font_color.clone()),
                font,
                margin: config.watermark.margin,
                quality: quality.unwrap_or(config.output.quality),
            };
            imaging::watermark_image(backend, &input, &output, &options)?;
            println!("{}", output::format_watermark(&input, &output));
        }
        Command::GenConfig => unreachable!("handled before logging setup"),
    }

    Ok(())
}
