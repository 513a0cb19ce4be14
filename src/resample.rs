//! Uniform-grid resampling of irregularly sampled signals.

use tracing::debug;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::signal::Signal;
use crate::spline::CubicSpline;

/// Two signals re-expressed on uniform grids sharing one sample interval.
///
/// Each grid starts at its own signal's first timestamp, so the two value
/// sequences may differ in length; `dt` is common to both. Computed once per
/// estimation call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleResult {
    /// Shared uniform sample interval in seconds.
    pub dt: f64,
    /// First signal's values on its own uniform grid.
    pub x1: Vec<f64>,
    /// Second signal's values on its own uniform grid.
    pub x2: Vec<f64>,
}

/// Resample both signals according to the configuration.
///
/// The shared interval is the smallest of the accuracy bound and each
/// signal's mean native interval. In pass-through mode
/// (`config.resample == false`) the value sequences are copied unchanged;
/// the interval is still selected so downstream results have a time scale.
///
/// # Errors
///
/// Returns [`SyncError::InvalidParameter`] when the accuracy bound is not a
/// positive finite number.
pub fn resample_pair(
    first: &Signal,
    second: &Signal,
    config: &SyncConfig,
) -> Result<ResampleResult, SyncError> {
    let dt = select_interval(first, second, config.accuracy)?;

    if !config.resample {
        debug!(dt, "resampling disabled, passing values through");
        return Ok(ResampleResult {
            dt,
            x1: first.values().to_vec(),
            x2: second.values().to_vec(),
        });
    }

    let (x1, x2) = rayon::join(
        || resample_onto_grid(first, dt),
        || resample_onto_grid(second, dt),
    );
    debug!(dt, n1 = x1.len(), n2 = x2.len(), "resampled onto uniform grids");
    Ok(ResampleResult { dt, x1, x2 })
}

/// Pick the shared sample interval for a pair of signals.
fn select_interval(first: &Signal, second: &Signal, accuracy: f64) -> Result<f64, SyncError> {
    if !accuracy.is_finite() || accuracy <= 0.0 {
        return Err(SyncError::invalid_parameter(format!(
            "accuracy must be a positive finite number of seconds, got {accuracy}"
        )));
    }
    Ok(accuracy
        .min(first.mean_interval())
        .min(second.mean_interval()))
}

/// Interpolate one signal onto its uniform grid with step `dt`.
///
/// The grid runs from the signal's first timestamp in steps of `dt` until it
/// covers the last; when the span is not an exact multiple of `dt`, the
/// final grid point overshoots the signal. Queries past the last original
/// timestamp fill with zero instead of extrapolating, which biases the
/// correlation near the edges of short overlaps.
fn resample_onto_grid(signal: &Signal, dt: f64) -> Vec<f64> {
    let start = signal.start();
    let end = signal.end();
    let count = (((end + dt) - start) / dt).ceil() as usize;
    let spline = CubicSpline::new(signal.times(), signal.values());

    (0..count)
        .map(|i| {
            let q = start + i as f64 * dt;
            if q > end {
                0.0
            } else {
                spline.evaluate(q)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_signal(n: usize, step: f64) -> Signal {
        let times: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
        let values: Vec<f64> = (0..n).map(|i| ((i * i) % 7) as f64 - 3.0).collect();
        Signal::new(times, values).expect("valid test signal")
    }

    #[test]
    fn interval_is_min_of_accuracy_and_native_rates() {
        let coarse = uniform_signal(10, 1.0);
        let fine = uniform_signal(10, 0.25);

        let config = SyncConfig {
            accuracy: 0.5,
            resample: true,
        };
        let result = resample_pair(&coarse, &fine, &config).expect("resample");
        assert!((result.dt - 0.25).abs() < 1e-12);

        let config = SyncConfig {
            accuracy: 0.1,
            resample: true,
        };
        let result = resample_pair(&coarse, &fine, &config).expect("resample");
        assert!((result.dt - 0.1).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_accuracy() {
        let signal = uniform_signal(5, 1.0);
        for accuracy in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SyncConfig {
                accuracy,
                resample: true,
            };
            let err = resample_pair(&signal, &signal, &config).unwrap_err();
            assert!(
                matches!(err, SyncError::InvalidParameter { .. }),
                "accuracy {accuracy} gave {err}"
            );
        }
    }

    #[test]
    fn idempotent_on_uniform_grid_at_native_rate() {
        let signal = uniform_signal(10, 1.0);
        let config = SyncConfig {
            accuracy: 1.0,
            resample: true,
        };
        let result = resample_pair(&signal, &signal, &config).expect("resample");
        assert!((result.dt - 1.0).abs() < 1e-12);
        assert_eq!(result.x1.len(), signal.len());
        for (resampled, original) in result.x1.iter().zip(signal.values()) {
            assert!(
                (resampled - original).abs() < 1e-9,
                "{resampled} vs {original}"
            );
        }
    }

    #[test]
    fn overshooting_grid_point_takes_zero_fill() {
        // Span 4.5 s, mean interval 1.125 s, accuracy 1.0 s: the grid is
        // [0, 1, 2, 3, 4, 5] and the final point lies past the signal.
        let signal = Signal::new(
            vec![0.0, 1.0, 2.0, 3.0, 4.5],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        )
        .expect("valid signal");
        let config = SyncConfig {
            accuracy: 1.0,
            resample: true,
        };
        let result = resample_pair(&signal, &signal, &config).expect("resample");
        assert_eq!(result.x1.len(), 6);
        assert_eq!(*result.x1.last().expect("non-empty"), 0.0);
        // In-range points interpolate the original data.
        assert!((result.x1[0] - 1.0).abs() < 1e-9);
        assert!((result.x1[3] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn pass_through_copies_values_and_still_selects_interval() {
        let first = uniform_signal(6, 0.5);
        let second = uniform_signal(8, 0.75);
        let config = SyncConfig {
            accuracy: 10.0,
            resample: false,
        };
        let result = resample_pair(&first, &second, &config).expect("resample");
        assert_eq!(result.x1, first.values());
        assert_eq!(result.x2, second.values());
        assert!((result.dt - 0.5).abs() < 1e-12);
    }

    #[test]
    fn two_sample_signals_resample_onto_short_grids() {
        // Degenerate but valid input: interpolation falls back to a line.
        let signal = Signal::new(vec![0.0, 1.0], vec![2.0, 4.0]).expect("valid signal");
        let config = SyncConfig {
            accuracy: 1.0,
            resample: true,
        };
        let result = resample_pair(&signal, &signal, &config).expect("resample");
        assert_eq!(result.x1.len(), 2);
        assert!((result.x1[0] - 2.0).abs() < 1e-12);
        assert!((result.x1[1] - 4.0).abs() < 1e-12);
    }
}
