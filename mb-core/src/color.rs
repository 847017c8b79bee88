//! Coloring of iteration results: direct rules and cyclic palettes.

use image::Rgba;

use crate::escape::IterationResult;
use crate::Error;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, u8::MAX]);
pub const WHITE: Rgba<u8> = Rgba([u8::MAX, u8::MAX, u8::MAX, u8::MAX]);

/// Maps an iteration result to a pixel color.
///
/// Implementations are selected at configuration time and shared
/// read-only across the paint stage.
pub trait Colorer: Sync + std::fmt::Debug {
    fn color_of(&self, result: IterationResult) -> Rgba<u8>;
}

/// The simplest possible coloring rule: points in the Mandelbrot set
/// are black, points outside it are white.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlackWhite;

impl Colorer for BlackWhite {
    fn color_of(&self, result: IterationResult) -> Rgba<u8> {
        if result.is_member() {
            BLACK
        } else {
            WHITE
        }
    }
}

/// A non-empty, cyclic list of colors. Lookups wrap via modulo.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    pub fn new(colors: Vec<Rgba<u8>>) -> Result<Self, Error> {
        if colors.is_empty() {
            return Err(Error::InvalidArgument(
                "palette must contain at least one color".to_string(),
            ));
        }
        Ok(Palette { colors })
    }

    /// Generate a mirrored grayscale palette.
    ///
    /// `resolution + 1` luminosity steps descend linearly from full
    /// brightness to `midpoint` (a 0..=1 fraction of full brightness);
    /// the sequence is then mirrored without duplicating the darkest
    /// entry, for `2 * resolution + 1` colors total. The palette starts
    /// and ends at full brightness and is darkest at its center index.
    pub fn grayscale(resolution: usize, midpoint: f64) -> Result<Self, Error> {
        if resolution < 1 {
            return Err(Error::InvalidArgument(
                "grayscale resolution cannot be less than 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&midpoint) {
            return Err(Error::InvalidArgument(format!(
                "grayscale midpoint luminosity must be within [0, 1], got {}",
                midpoint
            )));
        }

        const STARTING_LUMINOSITY: f64 = 1.0;
        let delta = (STARTING_LUMINOSITY - midpoint) / resolution as f64;

        let mut luminosities: Vec<f64> = (0..=resolution)
            .map(|i| STARTING_LUMINOSITY - i as f64 * delta)
            .collect();
        // Mirror, excluding the duplicate midpoint entry.
        for i in (0..resolution).rev() {
            luminosities.push(luminosities[i]);
        }

        let colors = luminosities
            .into_iter()
            .map(|lum| {
                let gray = (lum * f64::from(u8::MAX)) as u8;
                Rgba([gray, gray, gray, u8::MAX])
            })
            .collect();
        Ok(Palette { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Cyclic lookup: `index` wraps modulo the palette length.
    pub fn color(&self, index: usize) -> Rgba<u8> {
        self.colors[index % self.colors.len()]
    }
}

/// Colors escape counts by cyclic palette lookup, linearly
/// interpolating toward the next palette entry when a fractional
/// (smoothed) component is present. Members of the set are painted a
/// fixed black regardless of palette contents.
#[derive(Clone, Debug)]
pub struct PaletteColorer {
    palette: Palette,
}

impl PaletteColorer {
    pub fn new(palette: Palette) -> Self {
        PaletteColorer { palette }
    }
}

impl Colorer for PaletteColorer {
    fn color_of(&self, result: IterationResult) -> Rgba<u8> {
        if result.is_member() {
            return BLACK;
        }

        let index = result.count as usize;
        let base = self.palette.color(index);
        if result.frac > 0.0 {
            let next = self.palette.color(index + 1);
            lerp(base, next, result.frac)
        } else {
            base
        }
    }
}

/// Per-channel linear interpolation; alpha stays fully opaque.
fn lerp(from: Rgba<u8>, to: Rgba<u8>, weight: f64) -> Rgba<u8> {
    let mut channels = [0u8; 4];
    for (i, channel) in channels.iter_mut().enumerate().take(3) {
        let a = f64::from(from.0[i]);
        let b = f64::from(to.0[i]);
        *channel = (a + (b - a) * weight) as u8;
    }
    channels[3] = u8::MAX;
    Rgba(channels)
}
