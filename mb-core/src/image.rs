//! Assembly of iteration results into a pixel buffer.

use image::RgbaImage;

use crate::color::Colorer;
use crate::escape::IterationResult;
use crate::{Error, Size};

/// Lays colored pixels into a 2D buffer for handoff to an encoder.
#[derive(Default)]
pub struct Assembler {}

impl Assembler {
    /// Paint a result buffer into a `width x height` image.
    ///
    /// Result index `i` maps to pixel `(i % width, i / width)`; every
    /// pixel is written exactly once. The buffer length must equal
    /// `width * height` exactly.
    pub fn assemble(
        &self,
        size: Size,
        results: &[IterationResult],
        colorer: &dyn Colorer,
    ) -> Result<RgbaImage, Error> {
        if results.len() != size.width * size.height {
            return Err(Error::DimensionMismatch(format!(
                "result buffer size != width * height: {} != {} * {}",
                results.len(),
                size.width,
                size.height
            )));
        }

        let mut img = RgbaImage::new(size.width as u32, size.height as u32);
        // ImageBuffer iterates pixels row-major from the top-left, the
        // same order as the result buffer.
        img.pixels_mut()
            .zip(results)
            .for_each(|(pixel, result)| *pixel = colorer.color_of(*result));

        Ok(img)
    }
}
