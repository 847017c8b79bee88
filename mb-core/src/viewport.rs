//! Mapping from a pixel grid onto a window of the complex plane.

use num::complex::Complex64;

use crate::{Error, Size};

/// A viewport: resolution, zoom, and center determining which region of
/// the complex plane is sampled, and at what density.
///
/// Immutable once constructed; [`Viewport::new`] validates the
/// configuration up front so point generation cannot fail mid-render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    width: usize,
    height: usize,
    zoom: f64,
    center: Complex64,
}

impl Viewport {
    /// Build a viewport. Returns `InvalidArgument` if either resolution
    /// is below 1 or the zoom is not strictly positive.
    pub fn new(width: usize, height: usize, zoom: f64, center: Complex64) -> Result<Self, Error> {
        if width < 1 || height < 1 {
            return Err(Error::InvalidArgument(format!(
                "viewport resolution must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        if zoom <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "viewport zoom must be positive, got {}",
                zoom
            )));
        }
        Ok(Viewport {
            width,
            height,
            zoom,
            center,
        })
    }

    /// The classic framing: the picture most people associate with the
    /// Mandelbrot set.
    pub fn classic() -> Self {
        Viewport {
            width: 500,
            height: 500,
            zoom: 0.75,
            center: Complex64::new(-0.5, 0.0),
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Generate one sample point per pixel, row-major from the top-left,
    /// scanning left to right and then top to bottom.
    ///
    /// The unzoomed reference frame spans `[-1, 1]` on the real axis; the
    /// longer screen dimension stretches its axis by the resolution
    /// ratio so pixels stay square. Zoom divides the per-pixel step
    /// (larger zoom, smaller step); the center is added after the origin
    /// term is scaled, so it is expressed in final coordinates.
    pub fn points(&self) -> Vec<Complex64> {
        let mut points = Vec::with_capacity(self.width * self.height);

        let mut top_left = Complex64::new(-1.0, 1.0);
        const REFERENCE_WIDTH: f64 = 2.0;

        let mut px_length = if self.width < self.height {
            // Tall image: stretch the imaginary axis.
            top_left.im *= self.height as f64 / self.width as f64;
            REFERENCE_WIDTH / self.width as f64
        } else if self.width > self.height {
            // Wide image: stretch the real axis.
            top_left.re *= self.width as f64 / self.height as f64;
            REFERENCE_WIDTH / self.height as f64
        } else {
            REFERENCE_WIDTH / self.width as f64
        };
        // Zoom magnifies: larger zoom, smaller step.
        px_length /= self.zoom;

        // Each sample sits at its cell's midpoint, half a pixel in from
        // the nominal top-left corner.
        let midpoint_shift = Complex64::new(px_length / 2.0, -px_length / 2.0);
        let start = top_left / self.zoom + self.center + midpoint_shift;

        for row in 0..self.height {
            let im = start.im - row as f64 * px_length;
            for col in 0..self.width {
                let re = start.re + col as f64 * px_length;
                points.push(Complex64::new(re, im));
            }
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-8;

    fn assert_rough_equality(expected: Complex64, found: Complex64) {
        assert!(
            (expected.re - found.re).abs() < EPSILON,
            "real values differ; expected {}, found {}",
            expected.re,
            found.re
        );
        assert!(
            (expected.im - found.im).abs() < EPSILON,
            "imaginary values differ; expected {}, found {}",
            expected.im,
            found.im
        );
    }

    struct PointCompTest {
        name: &'static str,
        expected: Vec<Complex64>,
        viewport: Viewport,
    }

    #[test]
    fn point_generation() {
        let c = Complex64::new;
        let tests = vec![
            PointCompTest {
                name: "square point generation",
                expected: vec![c(-0.5, 0.5), c(0.5, 0.5), c(-0.5, -0.5), c(0.5, -0.5)],
                viewport: Viewport::new(2, 2, 1.0, c(0.0, 0.0)).unwrap(),
            },
            PointCompTest {
                name: "square point shifted",
                expected: vec![c(9.5, 10.5), c(10.5, 10.5), c(9.5, 9.5), c(10.5, 9.5)],
                viewport: Viewport::new(2, 2, 1.0, c(10.0, 10.0)).unwrap(),
            },
            PointCompTest {
                name: "square shift and scale",
                expected: vec![
                    // Row 1
                    c(0.5, 3.5),
                    c(1.5, 3.5),
                    c(2.5, 3.5),
                    c(3.5, 3.5),
                    // Row 2
                    c(0.5, 2.5),
                    c(1.5, 2.5),
                    c(2.5, 2.5),
                    c(3.5, 2.5),
                    // Row 3
                    c(0.5, 1.5),
                    c(1.5, 1.5),
                    c(2.5, 1.5),
                    c(3.5, 1.5),
                    // Row 4
                    c(0.5, 0.5),
                    c(1.5, 0.5),
                    c(2.5, 0.5),
                    c(3.5, 0.5),
                ],
                viewport: Viewport::new(4, 4, 0.5, c(2.0, 2.0)).unwrap(),
            },
            PointCompTest {
                name: "wide viewport",
                expected: vec![
                    c(-1.5, 0.5),
                    c(-0.5, 0.5),
                    c(0.5, 0.5),
                    c(1.5, 0.5),
                    c(-1.5, -0.5),
                    c(-0.5, -0.5),
                    c(0.5, -0.5),
                    c(1.5, -0.5),
                ],
                viewport: Viewport::new(4, 2, 1.0, c(0.0, 0.0)).unwrap(),
            },
            PointCompTest {
                name: "tall viewport",
                expected: vec![
                    c(-0.5, 1.5),
                    c(0.5, 1.5),
                    c(-0.5, 0.5),
                    c(0.5, 0.5),
                    c(-0.5, -0.5),
                    c(0.5, -0.5),
                    c(-0.5, -1.5),
                    c(0.5, -1.5),
                ],
                viewport: Viewport::new(2, 4, 1.0, c(0.0, 0.0)).unwrap(),
            },
        ];

        for test in tests {
            let points = test.viewport.points();
            assert_eq!(
                points.len(),
                test.expected.len(),
                "wrong point count for {}",
                test.name
            );
            for (found, expected) in points.iter().zip(&test.expected) {
                assert_rough_equality(*expected, *found);
            }
        }
    }

    #[test]
    fn point_count_matches_resolution() {
        let vp = Viewport::new(7, 3, 0.75, Complex64::new(-0.5, 0.0)).unwrap();
        let points = vp.points();
        assert_eq!(points.len(), 21);
        // Row 0 runs left to right at a fixed imaginary coordinate; the
        // top-right sample is the (width-1)-th entry.
        let step = points[1].re - points[0].re;
        assert!(step > 0.0);
        for col in 0..7 {
            assert!((points[col].im - points[0].im).abs() < EPSILON);
            assert!((points[col].re - (points[0].re + col as f64 * step)).abs() < EPSILON);
        }
        // Row 1 starts back at the same real origin, one step down.
        assert!((points[7].re - points[0].re).abs() < EPSILON);
        assert!((points[7].im - (points[0].im - step)).abs() < EPSILON);
    }

    #[test]
    fn rejects_invalid_resolution() {
        let center = Complex64::new(0.0, 0.0);
        assert!(matches!(
            Viewport::new(0, 10, 1.0, center),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Viewport::new(10, 0, 1.0, center),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn rejects_invalid_zoom() {
        let center = Complex64::new(0.0, 0.0);
        assert!(matches!(
            Viewport::new(10, 10, 0.0, center),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Viewport::new(10, 10, -1.0, center),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn classic_framing() {
        let vp = Viewport::classic();
        assert_eq!(
            vp.size(),
            Size {
                width: 500,
                height: 500
            }
        );
        assert_eq!(vp.points().len(), 500 * 500);
    }
}
