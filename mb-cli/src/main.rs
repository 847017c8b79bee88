//! Command-line Mandelbrot renderer.
//!
//! Renders the configured window as a PNG, written to `--out` or to
//! stdout when no path is given.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage};
use num::complex::Complex64;
use tracing_subscriber::EnvFilter;

use mb_core::escape::IterationParams;
use mb_core::viewport::Viewport;
use mb_core::{Coloring, Error, RenderRequest};
use mb_render::Renderer;

#[derive(Debug, Parser)]
#[command(about = "Render the Mandelbrot set as a PNG")]
struct Args {
    /// Horizontal resolution in pixels.
    #[arg(long, default_value_t = 300)]
    xres: usize,

    /// Vertical resolution in pixels.
    #[arg(long, default_value_t = 300)]
    yres: usize,

    /// Magnification; larger zooms in.
    #[arg(long, default_value_t = 0.75)]
    zoom: f64,

    /// Real part of the window center.
    #[arg(long, default_value_t = -0.5, allow_hyphen_values = true)]
    center_re: f64,

    /// Imaginary part of the window center.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_im: f64,

    /// Iteration budget per point.
    #[arg(long, default_value_t = 10000)]
    iters: u32,

    /// Use the smooth (continuous) iteration count.
    #[arg(long)]
    smooth: bool,

    #[arg(long, value_enum, default_value_t = ColorScheme::BlackWhite)]
    color: ColorScheme,

    /// Grayscale palette resolution (colors per half-cycle).
    #[arg(long, default_value_t = 16)]
    palette_resolution: usize,

    /// Grayscale palette midpoint luminosity, in [0, 1].
    #[arg(long, default_value_t = 0.0)]
    palette_midpoint: f64,

    /// Worker threads; defaults to the available compute units.
    #[arg(long)]
    threads: Option<usize>,

    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorScheme {
    BlackWhite,
    Grayscale,
}

impl Args {
    fn request(&self) -> Result<RenderRequest, Error> {
        let center = Complex64::new(self.center_re, self.center_im);
        let coloring = match self.color {
            ColorScheme::BlackWhite => Coloring::BlackWhite,
            ColorScheme::Grayscale => Coloring::Grayscale {
                resolution: self.palette_resolution,
                midpoint: self.palette_midpoint,
            },
        };
        Ok(RenderRequest {
            viewport: Viewport::new(self.xres, self.yres, self.zoom, center)?,
            params: IterationParams::new(self.iters, self.smooth)?,
            coloring,
        })
    }
}

fn export_png<W: Write>(image: &RgbaImage, writer: W) -> Result<(), Error> {
    let (width, height) = image.dimensions();
    PngEncoder::new(writer)
        .write_image(image.as_raw(), width, height, ColorType::Rgba8)
        .map_err(Error::from)
}

fn run(args: Args) -> Result<(), Error> {
    let request = args.request()?;

    let renderer = match args.threads {
        Some(threads) => Renderer::with_threads(threads)?,
        None => Renderer::new()?,
    };
    let image = renderer.render(&request)?;

    match &args.out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| Error::Encoding(format!("cannot create {}: {}", path.display(), e)))?;
            export_png(&image, BufWriter::new(file))
        }
        None => {
            let stdout = std::io::stdout();
            export_png(&image, stdout.lock())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
