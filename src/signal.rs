//! Validated scalar traces.

use crate::error::SyncError;

/// One sensor's scalar trace over time: strictly increasing timestamps in
/// seconds paired with finite sample values.
///
/// Construction is the single validation point. Every `Signal` the rest of
/// the pipeline sees is well formed, so the numeric code never re-checks its
/// inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl Signal {
    /// Build a signal from timestamps (seconds) and sample values.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidSignal`] when the sequences differ in
    /// length, hold fewer than 2 samples, contain non-finite numbers, or the
    /// timestamps do not strictly increase.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> Result<Self, SyncError> {
        if times.len() != values.len() {
            return Err(SyncError::invalid_signal(format!(
                "{} timestamps but {} values",
                times.len(),
                values.len()
            )));
        }
        if times.len() < 2 {
            return Err(SyncError::invalid_signal(format!(
                "need at least 2 samples, got {}",
                times.len()
            )));
        }
        if let Some(i) = times.iter().position(|t| !t.is_finite()) {
            return Err(SyncError::invalid_signal(format!(
                "non-finite timestamp at index {i}"
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(SyncError::invalid_signal(format!(
                "non-finite value at index {i}"
            )));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SyncError::invalid_signal(format!(
                "timestamps not strictly increasing at index {}",
                i + 1
            )));
        }
        Ok(Self { times, values })
    }

    /// Timestamps in seconds.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of samples (at least 2).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; construction rejects signals shorter than 2 samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First timestamp.
    pub fn start(&self) -> f64 {
        self.times[0]
    }

    /// Last timestamp.
    pub fn end(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Mean interval between consecutive timestamps.
    ///
    /// The pairwise differences telescope, so this is the time span divided
    /// by the number of intervals. Always positive for a valid signal.
    pub fn mean_interval(&self) -> f64 {
        (self.end() - self.start()) / (self.times.len() - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_input() {
        let signal = Signal::new(vec![0.0, 0.5, 1.25, 2.0], vec![1.0, -1.0, 0.5, 0.0])
            .expect("valid signal");
        assert_eq!(signal.len(), 4);
        assert!((signal.start() - 0.0).abs() < 1e-15);
        assert!((signal.end() - 2.0).abs() < 1e-15);
        assert!((signal.mean_interval() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = Signal::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SyncError::InvalidSignal { .. }), "{err}");
    }

    #[test]
    fn rejects_too_short() {
        let err = Signal::new(vec![0.0], vec![1.0]).unwrap_err();
        assert!(err.to_string().contains("at least 2"), "{err}");
    }

    #[test]
    fn rejects_non_monotonic_timestamps() {
        let err = Signal::new(vec![0.0, 2.0, 1.0, 3.0], vec![0.0; 4]).unwrap_err();
        assert!(err.to_string().contains("index 2"), "{err}");

        // Repeated timestamps count as non-monotonic too.
        let err = Signal::new(vec![0.0, 1.0, 1.0, 3.0], vec![0.0; 4]).unwrap_err();
        assert!(matches!(err, SyncError::InvalidSignal { .. }), "{err}");
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let err = Signal::new(vec![0.0, f64::NAN, 2.0], vec![0.0; 3]).unwrap_err();
        assert!(err.to_string().contains("timestamp"), "{err}");

        let err = Signal::new(vec![0.0, 1.0, 2.0], vec![0.0, f64::INFINITY, 0.0]).unwrap_err();
        assert!(err.to_string().contains("value"), "{err}");
    }
}
