//! Piecewise cubic interpolation with not-a-knot end conditions.
//!
//! One spline implementation serves both callers in the pipeline: the
//! resampler evaluates it at uniform grid points, and the peak refinement
//! reads segment coefficients directly to root-solve the local derivative.
//!
//! The spline is stored in slope (Hermite) form: the value and the first
//! derivative at every knot. Segment polynomials are reconstructed on
//! demand, which keeps fitting to one O(n) tridiagonal solve.

/// C² cubic spline through `(x, y)` knots with not-a-knot end conditions.
///
/// Degenerate knot counts fall back to the lowest-degree exact interpolant:
/// two knots give the straight line through them, three give the single
/// parabola. From four knots on, the not-a-knot conditions make the first
/// two and last two segments share one cubic each, which pins down the
/// remaining freedom of the C² system.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    slope: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through the given knots.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` differ in length, fewer than 2 knots are given,
    /// or `x` is not strictly increasing. Callers in this crate validate
    /// their inputs before fitting.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len(), "knot coordinate lengths differ");
        assert!(x.len() >= 2, "need at least 2 knots");
        assert!(
            x.windows(2).all(|w| w[1] > w[0]),
            "knot positions must strictly increase"
        );

        let slope = match x.len() {
            2 => {
                let s = (y[1] - y[0]) / (x[1] - x[0]);
                vec![s, s]
            }
            3 => parabola_slopes(x, y),
            _ => not_a_knot_slopes(x, y),
        };

        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            slope,
        }
    }

    /// Number of polynomial segments (knots minus one).
    pub fn segments(&self) -> usize {
        self.x.len() - 1
    }

    /// Local polynomial coefficients of segment `i`, highest degree first.
    ///
    /// Segment `i` covers `[x[i], x[i+1]]`. The returned `[a, b, c, d]`
    /// describe `a·u³ + b·u² + c·u + d` in the local coordinate
    /// `u = q - x[i]`, so `c` is the curve's derivative at the segment start
    /// and `d` its value there.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.segments()`.
    pub fn segment_coefficients(&self, i: usize) -> [f64; 4] {
        assert!(i < self.segments(), "segment index out of range");
        let h = self.x[i + 1] - self.x[i];
        let delta = (self.y[i + 1] - self.y[i]) / h;
        let s0 = self.slope[i];
        let s1 = self.slope[i + 1];
        let b = (3.0 * delta - 2.0 * s0 - s1) / h;
        let a = (s0 + s1 - 2.0 * delta) / (h * h);
        [a, b, s0, self.y[i]]
    }

    /// Evaluate the spline at `q`.
    ///
    /// Outside the knot range the nearest boundary segment's polynomial is
    /// evaluated (extrapolation); any clamping or fill policy belongs to the
    /// caller.
    pub fn evaluate(&self, q: f64) -> f64 {
        let i = self.segment_index(q);
        let [a, b, c, d] = self.segment_coefficients(i);
        let u = q - self.x[i];
        ((a * u + b) * u + c) * u + d
    }

    /// Segment whose span contains `q`, clamped to valid segments at the
    /// boundaries.
    fn segment_index(&self, q: f64) -> usize {
        // First knot strictly greater than q, minus one.
        let idx = self.x.partition_point(|&k| k <= q);
        idx.saturating_sub(1).min(self.x.len() - 2)
    }
}

/// Knot slopes of the unique parabola through three points, in Newton form.
fn parabola_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let d0 = (y[1] - y[0]) / (x[1] - x[0]);
    let d1 = (y[2] - y[1]) / (x[2] - x[1]);
    let c2 = (d1 - d0) / (x[2] - x[0]);
    x.iter()
        .map(|&xi| d0 + c2 * (2.0 * xi - x[0] - x[1]))
        .collect()
}

/// Knot slopes of the not-a-knot spline, n >= 4.
///
/// Interior rows are the usual C² continuity conditions scaled by
/// `h[i-1]·h[i]`. The end rows impose third-derivative continuity across the
/// first and last interior knots, pre-reduced so each row couples only two
/// unknowns and the system stays tridiagonal.
fn not_a_knot_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = y
        .windows(2)
        .zip(&h)
        .map(|(w, &hi)| (w[1] - w[0]) / hi)
        .collect();

    let mut sub = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut sup = vec![0.0; n];
    let mut rhs = vec![0.0; n];

    let d0 = x[2] - x[0];
    diag[0] = h[1];
    sup[0] = d0;
    rhs[0] = ((h[0] + 2.0 * d0) * h[1] * delta[0] + h[0] * h[0] * delta[1]) / d0;

    for i in 1..n - 1 {
        sub[i] = h[i];
        diag[i] = 2.0 * (h[i - 1] + h[i]);
        sup[i] = h[i - 1];
        rhs[i] = 3.0 * (h[i] * delta[i - 1] + h[i - 1] * delta[i]);
    }

    let dn = x[n - 1] - x[n - 3];
    sub[n - 1] = dn;
    diag[n - 1] = h[n - 3];
    rhs[n - 1] = (h[n - 2] * h[n - 2] * delta[n - 3]
        + (2.0 * dn + h[n - 2]) * h[n - 3] * delta[n - 2])
        / dn;

    solve_tridiagonal(&sub, &mut diag, &sup, &mut rhs);
    rhs
}

/// Thomas algorithm; `rhs` holds the solution afterwards.
fn solve_tridiagonal(sub: &[f64], diag: &mut [f64], sup: &[f64], rhs: &mut [f64]) {
    let n = diag.len();
    for i in 1..n {
        let w = sub[i] / diag[i - 1];
        diag[i] -= w * sup[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }
    rhs[n - 1] /= diag[n - 1];
    for i in (0..n - 1).rev() {
        rhs[i] = (rhs[i] - sup[i] * rhs[i + 1]) / diag[i];
    }
}
