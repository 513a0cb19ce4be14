//! Configuration for delay estimation.

use serde::{Deserialize, Serialize};

/// Configuration options for [`Synchronizer`](crate::Synchronizer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum acceptable sample interval in seconds (default: 1e-3).
    ///
    /// The shared resampling interval is the smallest of this bound and the
    /// mean native interval of either input signal, so the uniform grids are
    /// never coarser than requested and never coarser than the finer of the
    /// two native rates.
    pub accuracy: f64,

    /// Whether to resample onto uniform grids (default: true).
    ///
    /// Disable only for inputs that are already uniformly sampled at equal
    /// rates; the estimator then consumes the value sequences as-is, with
    /// the interval above still selected to give the result a time scale.
    pub resample: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            accuracy: 1e-3,
            resample: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert!((config.accuracy - 1e-3).abs() < 1e-15);
        assert!(config.resample);
    }

    #[test]
    fn round_trips_through_json() {
        let config = SyncConfig {
            accuracy: 0.25,
            resample: false,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: SyncConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }
}
