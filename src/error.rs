//! Error taxonomy for signal validation, resampling, and delay estimation.

use thiserror::Error;

/// Errors produced by the synchronization pipeline.
///
/// Every variant is raised synchronously by the call that detects it. The
/// pipeline is deterministic, so nothing is retried internally; a retry with
/// unchanged inputs reproduces the same failure. No partial results
/// accompany an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Input signal is malformed: mismatched sequence lengths, fewer than 2
    /// samples, non-finite numbers, or timestamps that do not strictly
    /// increase.
    #[error("invalid signal: {reason}")]
    InvalidSignal {
        /// What exactly was wrong with the input.
        reason: String,
    },

    /// The accuracy bound is not a positive finite number.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// What exactly was wrong with the parameter.
        reason: String,
    },

    /// Delay estimation was requested before resampling was performed.
    #[error("resample not yet performed")]
    ResampleNotPerformed,

    /// The correlation sequence is too short to fit a cubic segment.
    #[error("correlation of length {len} is too short to refine, need at least 4 points")]
    InsufficientData {
        /// Length of the correlation sequence.
        len: usize,
    },

    /// The correlation around the peak has no real critical-point pair, so a
    /// sub-sample maximum cannot be located. Typical cause: flat or
    /// near-constant input signals.
    #[error("degenerate correlation near peak index {peak}")]
    DegenerateCorrelation {
        /// Integer index of the correlation maximum that could not be refined.
        peak: usize,
    },
}

impl SyncError {
    /// Build an [`SyncError::InvalidSignal`] from any printable reason.
    pub fn invalid_signal(reason: impl Into<String>) -> Self {
        Self::InvalidSignal {
            reason: reason.into(),
        }
    }

    /// Build an [`SyncError::InvalidParameter`] from any printable reason.
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}
