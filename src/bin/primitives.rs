use clap::Parser;
use image::DynamicImage;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use primitive_reader::{DetectorConfig, GeometricPrimitives, PrimitiveDetector};

#[derive(Parser, Debug)]
#[command(
    name = "primitives",
    about = "Extract lines, circles and arcs from an image file as JSON. \
             Decoding happens in this tool; the library only takes raw gray, BGR or BGRA buffers",
    version
)]
struct Cli {
    /// Input image
    image: PathBuf,

    /// JSON detector configuration; missing fields keep their defaults
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long = "pretty")]
    pretty: bool,

    /// Print only the number of primitives of each kind
    #[arg(long = "summary", short = 's')]
    summary: bool,
}

fn load_config(path: Option<&Path>) -> Result<DetectorConfig, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(DetectorConfig::default());
    };
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Keeps 8-bit gray as decoded and reorders colour into the BGR(A) layout the detector reads.
fn to_buffer(img: DynamicImage) -> (Vec<u8>, usize, usize, usize) {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let (mut pixels, channels) = match img {
        DynamicImage::ImageLuma8(gray) => return (gray.into_raw(), w, h, 1),
        DynamicImage::ImageRgba8(rgba) => (rgba.into_raw(), 4),
        other => (other.to_rgb8().into_raw(), 3),
    };
    for px in pixels.chunks_exact_mut(channels) {
        px.swap(0, 2);
    }
    (pixels, w, h, channels)
}

fn write_text_file(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn summary(primitives: &GeometricPrimitives) -> String {
    format!(
        "lines: {}\ncircles: {}\narcs: {}",
        primitives.lines.len(),
        primitives.circles.len(),
        primitives.arcs.len()
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let detector = PrimitiveDetector::new(config)?;

    let img = image::open(&cli.image)
        .map_err(|e| format!("Failed to open {}: {e}", cli.image.display()))?;
    let (pixels, width, height, channels) = to_buffer(img);
    log::info!(
        "processing {} ({width}x{height}, {channels} channels)",
        cli.image.display()
    );

    let primitives = detector.process_image(&pixels, width, height, channels)?;

    let text = if cli.summary {
        summary(&primitives)
    } else if cli.pretty {
        serde_json::to_string_pretty(&primitives)?
    } else {
        serde_json::to_string(&primitives)?
    };

    match cli.output {
        Some(path) => {
            write_text_file(&path, &text)?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}
