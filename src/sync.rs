//! The synchronization pipeline: resample, correlate, refine.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::correlate::cross_correlate;
use crate::error::SyncError;
use crate::estimator::refine_peak;
use crate::resample::{resample_pair, ResampleResult};
use crate::signal::Signal;

/// Result of a delay estimation run.
///
/// `seconds` is the headline number: how much later (positive) or earlier
/// (negative) the second signal's events occur relative to the first, in the
/// input time units, at fractional-sample precision. The remaining fields
/// describe how the estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayEstimate {
    /// Estimated delay of the second signal relative to the first, seconds.
    pub seconds: f64,
    /// The same delay as a signed fractional sample lag on the shared grid.
    pub lag: f64,
    /// Uniform sample interval the estimate was computed on, seconds.
    pub dt: f64,
    /// Integer index of the correlation maximum before refinement.
    pub peak_index: usize,
    /// Whether refinement moved one segment left of the integer argmax.
    pub peak_corrected: bool,
}

impl DelayEstimate {
    /// Serialize to a compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which does not happen for
    /// this type.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to a pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, which does not happen for
    /// this type.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Two-phase delay estimation over a fixed pair of signals.
///
/// [`resample`](Self::resample) must run before
/// [`estimate_delay`](Self::estimate_delay); the one-shot
/// [`run`](Self::run) does both in order. A session owns its inputs, holds
/// no global state, and performs no I/O, so independent sessions may run
/// concurrently.
///
/// # Example
///
/// ```
/// use gyrosync::{Signal, Synchronizer};
///
/// # fn main() -> Result<(), gyrosync::SyncError> {
/// let times: Vec<f64> = (0..64).map(|i| i as f64 * 0.01).collect();
/// let values: Vec<f64> = times.iter().map(|t| (t * 9.0).sin()).collect();
/// let first = Signal::new(times.clone(), values.clone())?;
/// let second = Signal::new(times, values)?;
///
/// let estimate = Synchronizer::new(first, second).accuracy(0.01).run()?;
/// assert!(estimate.seconds.abs() <= estimate.dt);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Synchronizer {
    first: Signal,
    second: Signal,
    config: SyncConfig,
    resampled: Option<ResampleResult>,
}

impl Synchronizer {
    /// Create a session over two signals with the default configuration.
    pub fn new(first: Signal, second: Signal) -> Self {
        Self::with_config(first, second, SyncConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(first: Signal, second: Signal, config: SyncConfig) -> Self {
        Self {
            first,
            second,
            config,
            resampled: None,
        }
    }

    /// Set the accuracy bound (maximum sample interval, seconds).
    pub fn accuracy(mut self, accuracy: f64) -> Self {
        self.config.accuracy = accuracy;
        self
    }

    /// Enable or disable resampling (pass-through for uniform inputs).
    pub fn resample_enabled(mut self, enabled: bool) -> Self {
        self.config.resample = enabled;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Phase 1: resample both signals onto uniform grids.
    ///
    /// # Errors
    ///
    /// [`SyncError::InvalidParameter`] for a bad accuracy bound.
    pub fn resample(&mut self) -> Result<&ResampleResult, SyncError> {
        let result = resample_pair(&self.first, &self.second, &self.config)?;
        Ok(&*self.resampled.insert(result))
    }

    /// Phase 2: estimate the delay from the resampled pair.
    ///
    /// # Errors
    ///
    /// [`SyncError::ResampleNotPerformed`] when called before
    /// [`resample`](Self::resample); [`SyncError::InsufficientData`] and
    /// [`SyncError::DegenerateCorrelation`] as for
    /// [`estimate_from_resampled`].
    pub fn estimate_delay(&self) -> Result<DelayEstimate, SyncError> {
        let resampled = self
            .resampled
            .as_ref()
            .ok_or(SyncError::ResampleNotPerformed)?;
        estimate_from_resampled(resampled)
    }

    /// Run both phases and return the estimate.
    ///
    /// # Errors
    ///
    /// Any error either phase can produce.
    pub fn run(mut self) -> Result<DelayEstimate, SyncError> {
        self.resample()?;
        self.estimate_delay()
    }
}

/// Estimate the delay from an already-resampled pair of value sequences.
///
/// # Errors
///
/// [`SyncError::InsufficientData`] when the correlation is shorter than 4
/// points; [`SyncError::DegenerateCorrelation`] when the peak cannot be
/// refined.
pub fn estimate_from_resampled(resampled: &ResampleResult) -> Result<DelayEstimate, SyncError> {
    // Correlate the second sequence against the first; zero lag sits at
    // index len(x1) - 1 of the profile.
    let profile = cross_correlate(&resampled.x1, &resampled.x2);
    debug!(
        peak = profile.peak,
        len = profile.values.len(),
        "correlation peak located"
    );

    let refined = refine_peak(&profile)?;
    if refined.corrected {
        warn!(
            peak = profile.peak,
            "correlation entered the peak segment falling, moved one segment left"
        );
    }

    let lag = refined.interval as f64 + refined.frac - profile.zero_lag as f64;
    Ok(DelayEstimate {
        seconds: lag * resampled.dt,
        lag,
        dt: resampled.dt,
        peak_index: profile.peak,
        peak_corrected: refined.corrected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_signal() -> Signal {
        let times: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let values: Vec<f64> = times.iter().map(|&t| (t * 0.4).sin() + 0.01 * t).collect();
        Signal::new(times, values).expect("valid signal")
    }

    #[test]
    fn estimate_before_resample_is_rejected() {
        let session = Synchronizer::new(ramp_signal(), ramp_signal());
        let err = session.estimate_delay().unwrap_err();
        assert_eq!(err, SyncError::ResampleNotPerformed);
    }

    #[test]
    fn builder_setters_update_the_config() {
        let session = Synchronizer::new(ramp_signal(), ramp_signal())
            .accuracy(0.5)
            .resample_enabled(false);
        assert!((session.config().accuracy - 0.5).abs() < 1e-15);
        assert!(!session.config().resample);
    }

    #[test]
    fn identical_signals_have_near_zero_delay() {
        let estimate = Synchronizer::new(ramp_signal(), ramp_signal())
            .accuracy(1.0)
            .run()
            .expect("estimate");
        assert!(
            estimate.seconds.abs() <= estimate.dt,
            "delay {} s exceeds dt {}",
            estimate.seconds,
            estimate.dt
        );
        assert_eq!(estimate.peak_index, 31);
    }

    #[test]
    fn integer_shift_is_recovered_from_raw_sequences() {
        // Pass-through path: second holds the first's content 3 samples late.
        let x1: Vec<f64> = (0..24).map(|i| ((i * 5) % 11) as f64).collect();
        let mut x2 = vec![0.0; 24];
        x2[3..].copy_from_slice(&x1[..21]);
        let resampled = ResampleResult {
            dt: 0.5,
            x1,
            x2,
        };
        let estimate = estimate_from_resampled(&resampled).expect("estimate");
        assert!(
            (estimate.lag - 3.0).abs() < 0.5,
            "lag {} not near 3",
            estimate.lag
        );
        assert!((estimate.seconds - estimate.lag * 0.5).abs() < 1e-12);
    }

    #[test]
    fn estimate_serializes_to_json() {
        let estimate = DelayEstimate {
            seconds: 0.25,
            lag: 2.5,
            dt: 0.1,
            peak_index: 12,
            peak_corrected: false,
        };
        let json = estimate.to_json().expect("serialize");
        assert!(json.contains("\"seconds\""));
        assert!(json.contains("\"peak_corrected\""));
        let back: DelayEstimate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(estimate, back);
    }
}
