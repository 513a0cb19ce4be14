//! # gyrosync
//!
//! Estimate the time delay between two irregularly-sampled recordings of the
//! same motion, to sub-sample precision.
//!
//! Two devices watching the same scene stamp their samples with independent
//! clocks. Given one scalar trace per device (typically gyroscope magnitude),
//! this crate recovers how much later or earlier the second trace runs:
//! - both traces are resampled onto uniform grids sharing one interval,
//! - the grids are cross-correlated over every possible alignment,
//! - a cubic spline refines the correlation peak to a fractional lag.
//!
//! The result converts a timestamp from one device's clock into the other's,
//! limited only by how well the two traces actually overlap.
//!
//! ## Quick Start
//!
//! ```
//! use gyrosync::{synchronize, Signal, SyncConfig};
//!
//! # fn main() -> Result<(), gyrosync::SyncError> {
//! let times: Vec<f64> = (0..200).map(|i| i as f64 * 0.01).collect();
//! let values: Vec<f64> = times.iter().map(|t| (t * 7.0).sin()).collect();
//! let first = Signal::new(times.clone(), values.clone())?;
//! let second = Signal::new(times, values)?;
//!
//! let estimate = synchronize(&first, &second, SyncConfig::default())?;
//! assert!(estimate.seconds.abs() <= estimate.dt);
//! # Ok(())
//! # }
//! ```
//!
//! For streaming gyroscope uploads over TCP, see the [`server`] module and
//! the `gyrosyncd` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;
mod signal;
mod spline;

// Pipeline stages
mod correlate;
mod estimator;
mod resample;
mod sync;

// Service layer
pub mod ingest;
pub mod server;

// Re-exports for public API
pub use config::SyncConfig;
pub use correlate::{cross_correlate, CorrelationProfile};
pub use error::SyncError;
pub use resample::{resample_pair, ResampleResult};
pub use signal::Signal;
pub use spline::CubicSpline;
pub use sync::{estimate_from_resampled, DelayEstimate, Synchronizer};

/// Run the whole pipeline over two signals with an explicit configuration.
///
/// Convenience wrapper around [`Synchronizer`] for callers that do not need
/// the two-phase API.
///
/// # Errors
///
/// Any error the pipeline can produce; see [`SyncError`].
pub fn synchronize(
    first: &Signal,
    second: &Signal,
    config: SyncConfig,
) -> Result<DelayEstimate, SyncError> {
    Synchronizer::with_config(first.clone(), second.clone(), config).run()
}
