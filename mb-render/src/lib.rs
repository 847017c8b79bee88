//! Parallel evaluation for the Mandelbrot pipeline.
//!
//! The escape computation is CPU-bound and embarrassingly parallel, so
//! the renderer owns a fixed-size rayon thread pool and fans the point
//! sequence out across it. Each worker writes into disjoint indices of
//! a pre-sized result buffer, which keeps the output in input order no
//! matter which worker finishes first; the evaluate call blocks until
//! every point has been processed.

use image::RgbaImage;
use num::complex::Complex64;
use rayon::prelude::*;

use mb_core::escape::{Algorithm, EscapeTime, IterationResult};
use mb_core::image::Assembler;
use mb_core::{Error, RenderRequest};

/// A render driver with its own thread pool.
pub struct Renderer {
    pool: rayon::ThreadPool,
}

impl Renderer {
    /// A renderer sized to the available compute units.
    pub fn new() -> Result<Self, Error> {
        Self::with_threads(rayon::current_num_threads())
    }

    /// A renderer with an explicit worker count. A pool of size 1 is a
    /// valid sequential fallback; results are identical for any size.
    pub fn with_threads(threads: usize) -> Result<Self, Error> {
        if threads < 1 {
            return Err(Error::InvalidArgument(
                "must provide >=1 worker thread".to_string(),
            ));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::InvalidArgument(format!("error creating thread pool: {}", e)))?;
        Ok(Renderer { pool })
    }

    /// Apply the algorithm to every point, in parallel.
    ///
    /// The returned buffer has the same length and order as `points`.
    pub fn evaluate(&self, points: &[Complex64], algorithm: &dyn Algorithm) -> Vec<IterationResult> {
        let mut output = vec![IterationResult::MEMBER; points.len()];
        self.pool.install(|| {
            output
                .par_iter_mut()
                .zip(points.par_iter())
                .for_each(|(out, c)| {
                    *out = algorithm.escape(*c);
                });
        });
        output
    }

    /// Run the whole pipeline: viewport points, parallel escape
    /// evaluation, then assembly into a pixel buffer.
    pub fn render(&self, request: &RenderRequest) -> Result<RgbaImage, Error> {
        let span = tracing::info_span!("render-mandelbrot");
        let _guard = span.enter();

        let algorithm = EscapeTime::new(request.params);
        let colorer = request.coloring.colorer().map_err(|err| {
            tracing::error!("coloring error: for request {:?}: {}", request, err);
            err
        })?;

        let points = request.viewport.points();
        tracing::debug!(points = points.len(), "viewport-mapped");

        let results = self.evaluate(&points, &algorithm);
        tracing::debug!("mandelbrot-computed");

        let image = Assembler::default()
            .assemble(request.viewport.size(), &results, colorer.as_ref())
            .map_err(|err| {
                tracing::error!("assembly error: for request {:?}: {}", request, err);
                err
            })?;
        tracing::debug!("mandelbrot-assembled");

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_core::escape::IterationParams;
    use mb_core::viewport::Viewport;
    use mb_core::Coloring;

    fn sample_points() -> Vec<Complex64> {
        Viewport::new(32, 32, 0.75, Complex64::new(-0.5, 0.0))
            .unwrap()
            .points()
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(matches!(
            Renderer::with_threads(0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn evaluation_is_deterministic_across_pool_sizes() {
        let points = sample_points();
        let algorithm = EscapeTime::new(IterationParams::new(500, true).unwrap());

        let sequential = Renderer::with_threads(1)
            .unwrap()
            .evaluate(&points, &algorithm);
        assert_eq!(sequential.len(), points.len());

        for threads in [2, 4, 8] {
            let parallel = Renderer::with_threads(threads)
                .unwrap()
                .evaluate(&points, &algorithm);
            assert_eq!(sequential, parallel, "results differ with {} threads", threads);
        }

        // Repeated runs on the same pool are identical too.
        let renderer = Renderer::with_threads(4).unwrap();
        assert_eq!(
            renderer.evaluate(&points, &algorithm),
            renderer.evaluate(&points, &algorithm)
        );
    }

    #[test]
    fn evaluation_preserves_input_order() {
        // A point far outside the set next to a set member: the escapee
        // must land at its own index, not wherever a worker finished.
        let points = vec![
            Complex64::new(10.0, 10.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(10.0, 10.0),
        ];
        let algorithm = EscapeTime::new(IterationParams::new(100, false).unwrap());
        let results = Renderer::with_threads(2)
            .unwrap()
            .evaluate(&points, &algorithm);

        assert!(!results[0].is_member());
        assert!(results[1].is_member());
        assert!(!results[2].is_member());
    }

    #[test]
    fn full_pipeline_produces_expected_image() {
        let request = RenderRequest {
            viewport: Viewport::new(16, 16, 0.75, Complex64::new(-0.5, 0.0)).unwrap(),
            params: IterationParams::new(500, false).unwrap(),
            coloring: Coloring::BlackWhite,
        };
        let renderer = Renderer::new().unwrap();
        let image = renderer.render(&request).unwrap();

        assert_eq!(image.dimensions(), (16, 16));
        // The top-left corner maps well outside the set; the center of
        // the frame lands inside the main cardioid.
        assert_eq!(*image.get_pixel(0, 0), mb_core::color::WHITE);
        assert_eq!(*image.get_pixel(8, 8), mb_core::color::BLACK);
    }

    #[test]
    fn pipeline_reports_bad_coloring_config() {
        let request = RenderRequest {
            viewport: Viewport::new(4, 4, 1.0, Complex64::new(0.0, 0.0)).unwrap(),
            params: IterationParams::new(10, false).unwrap(),
            coloring: Coloring::Grayscale {
                resolution: 0,
                midpoint: 0.0,
            },
        };
        let renderer = Renderer::with_threads(1).unwrap();
        assert!(matches!(
            renderer.render(&request),
            Err(Error::InvalidArgument(_))
        ));
    }
}
