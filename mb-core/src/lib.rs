//! Core library for the Mandelbrot renderer.
//!
//! The pipeline is: a [`viewport::Viewport`] maps the pixel grid onto the
//! complex plane, an [`escape::Algorithm`] turns each point into an
//! [`escape::IterationResult`], and a [`color::Colorer`] plus the
//! [`image::Assembler`] turn the results into a pixel buffer. Parallel
//! evaluation lives in the `mb-render` crate.

pub mod color;
pub mod escape;
pub mod image;
pub mod viewport;

use crate::color::{BlackWhite, Colorer, Palette, PaletteColorer};
use crate::escape::IterationParams;
use crate::viewport::Viewport;

/// A pair of integer (width, height) dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

/// Errors that can occur while rendering.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A configuration value failed validation. Raised once, before any
    /// per-point work starts.
    InvalidArgument(String),
    /// A result buffer's length disagrees with the image dimensions.
    DimensionMismatch(String),
    /// The encoder collaborator failed to serialize the pixel buffer.
    /// The computation itself already succeeded.
    Encoding(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::DimensionMismatch(msg) => write!(f, "dimension mismatch: {}", msg),
            Error::Encoding(msg) => write!(f, "encoding error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<::image::ImageError> for Error {
    fn from(err: ::image::ImageError) -> Self {
        Error::Encoding(err.to_string())
    }
}

/// Coloring scheme for a render, resolved to a concrete [`Colorer`]
/// before any pixels are painted.
#[derive(Clone, Debug, PartialEq)]
pub enum Coloring {
    /// In-set points black, everything else white.
    BlackWhite,
    /// Cyclic grayscale palette; see [`Palette::grayscale`].
    Grayscale { resolution: usize, midpoint: f64 },
}

impl Coloring {
    /// Construct the colorer for this scheme.
    pub fn colorer(&self) -> Result<Box<dyn Colorer>, Error> {
        match self {
            Coloring::BlackWhite => Ok(Box::new(BlackWhite)),
            Coloring::Grayscale {
                resolution,
                midpoint,
            } => {
                let palette = Palette::grayscale(*resolution, *midpoint)?;
                Ok(Box::new(PaletteColorer::new(palette)))
            }
        }
    }
}

/// A fully-validated description of one render: where to look, how long
/// to iterate, and how to paint the results.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    pub viewport: Viewport,
    pub params: IterationParams,
    pub coloring: Coloring,
}
