//! The escape-time iteration kernel.

use num::complex::Complex64;

use crate::Error;

/// Bailout radius for plain integer escape counts.
const NORMAL_BAILOUT: f64 = 2.0;
/// Bailout radius when smoothing: a much larger escape radius reduces
/// the banding the fractional correction is meant to hide.
const SMOOTH_BAILOUT: f64 = 1e6;

/// Validated parameters for the escape-time iteration.
///
/// The bailout radius is selected by the smoothing mode; both values
/// are checked once here, never in the per-point hot path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationParams {
    max_iterations: u32,
    smooth: bool,
}

impl IterationParams {
    pub fn new(max_iterations: u32, smooth: bool) -> Result<Self, Error> {
        if max_iterations < 1 {
            return Err(Error::InvalidArgument(
                "max iterations cannot be less than 1".to_string(),
            ));
        }
        Ok(IterationParams {
            max_iterations,
            smooth,
        })
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn smooth(&self) -> bool {
        self.smooth
    }

    pub fn bailout(&self) -> f64 {
        if self.smooth {
            SMOOTH_BAILOUT
        } else {
            NORMAL_BAILOUT
        }
    }
}

/// Result of iterating a single point.
///
/// A negative `count` means the point never escaped within the
/// iteration budget and belongs to the set. `frac` is the smooth
/// (continuous) correction, clamped to `[0, 1)`; it is zero unless
/// smoothing was enabled and the point escaped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationResult {
    pub count: i64,
    pub frac: f64,
}

impl IterationResult {
    /// The result for a point that stayed bounded for the whole budget.
    pub const MEMBER: IterationResult = IterationResult {
        count: -1,
        frac: 0.0,
    };

    pub fn is_member(&self) -> bool {
        self.count < 0
    }
}

/// An escape-time algorithm: a pure function from a point on the
/// complex plane to an iteration result.
///
/// Implementations must be stateless with respect to individual points
/// so that many workers can evaluate concurrently without
/// synchronization.
pub trait Algorithm: Sync {
    fn escape(&self, c: Complex64) -> IterationResult;
}

/// The standard Mandelbrot escape-time iteration:
/// z0 = 0, z_{n+1} = z_n^2 + c, counting steps until |z| reaches the
/// bailout radius.
#[derive(Copy, Clone, Debug)]
pub struct EscapeTime {
    params: IterationParams,
    // |z|^2 compared against bailout^2 skips the square root per point.
    bailout_squared: f64,
}

impl EscapeTime {
    pub fn new(params: IterationParams) -> Self {
        let bailout = params.bailout();
        EscapeTime {
            params,
            bailout_squared: bailout * bailout,
        }
    }
}

impl Algorithm for EscapeTime {
    fn escape(&self, c: Complex64) -> IterationResult {
        let mut z = Complex64::new(0.0, 0.0);
        let mut i = 0;
        while i < self.params.max_iterations && z.norm_sqr() < self.bailout_squared {
            z = z * z + c;
            i += 1;
        }

        if i == self.params.max_iterations {
            return IterationResult::MEMBER;
        }

        let frac = if self.params.smooth {
            smooth_fraction(z.norm(), self.params.bailout())
        } else {
            0.0
        };

        IterationResult {
            count: i64::from(i),
            frac,
        }
    }
}

/// Continuous (normalized) iteration-count correction,
/// `log(log|z| / log bailout) / log 2`, clamped into `[0, 1)` so the
/// colorer always receives a valid blend weight even for extreme
/// inputs.
fn smooth_fraction(magnitude: f64, bailout: f64) -> f64 {
    let sn = (magnitude.ln() / bailout.ln()).ln() / std::f64::consts::LN_2;
    if sn.is_finite() {
        sn.clamp(0.0, 1.0 - f64::EPSILON)
    } else {
        0.0
    }
}
