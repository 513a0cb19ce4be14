//! Parsing and preprocessing of raw gyroscope uploads.
//!
//! The storage format is 4-column CSV (`x,y,z,t`) with no header and `t` in
//! nanoseconds. Before the core runs, per-row angular rates are reduced to
//! Euclidean magnitudes and the pair of traces is truncated to a common
//! length, which keeps the coarse timestamp offset well defined.

use crate::error::SyncError;
use crate::signal::Signal;

pub(crate) const NANOS_PER_SEC: f64 = 1e9;

/// One parsed gyroscope recording.
#[derive(Debug, Clone, PartialEq)]
pub struct GyroTrace {
    /// Sample timestamps, seconds.
    pub times: Vec<f64>,
    /// Angular rate per axis, in the order the rows carry them.
    pub rates: Vec<[f64; 3]>,
}

impl GyroTrace {
    /// Per-sample Euclidean magnitude of the angular rate.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.rates
            .iter()
            .map(|[x, y, z]| (x * x + y * y + z * z).sqrt())
            .collect()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the trace holds no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Drop samples past `len`.
    pub fn truncate(&mut self, len: usize) {
        self.times.truncate(len);
        self.rates.truncate(len);
    }
}

/// Parse a raw upload: one `x,y,z,t` row per line, `t` in nanoseconds.
///
/// Blank lines are skipped (uploads commonly end with a trailing newline);
/// anything else malformed fails the whole parse.
///
/// # Errors
///
/// [`SyncError::InvalidSignal`] naming the first offending line.
pub fn parse_gyro_csv(bytes: &[u8]) -> Result<GyroTrace, SyncError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| SyncError::invalid_signal("upload is not valid UTF-8"))?;

    let mut times = Vec::new();
    let mut rates = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 4 {
            return Err(SyncError::invalid_signal(format!(
                "line {}: expected 4 comma-separated columns, got {}",
                lineno + 1,
                fields.len()
            )));
        }
        let mut row = [0.0f64; 4];
        for (slot, raw) in row.iter_mut().zip(&fields) {
            *slot = raw.trim().parse().map_err(|_| {
                SyncError::invalid_signal(format!(
                    "line {}: unparsable number {:?}",
                    lineno + 1,
                    raw.trim()
                ))
            })?;
        }
        let [x, y, z, t] = row;
        times.push(t / NANOS_PER_SEC);
        rates.push([x, y, z]);
    }

    Ok(GyroTrace { times, rates })
}

/// Truncate both traces to their common length.
pub fn align(mut a: GyroTrace, mut b: GyroTrace) -> (GyroTrace, GyroTrace) {
    let len = a.len().min(b.len());
    a.truncate(len);
    b.truncate(len);
    (a, b)
}

/// Reduce a trace to the scalar signal the estimator consumes.
///
/// # Errors
///
/// [`SyncError::InvalidSignal`] when the trace is too short or its
/// timestamps do not strictly increase.
pub fn to_signal(trace: &GyroTrace) -> Result<Signal, SyncError> {
    Signal::new(trace.times.clone(), trace.magnitudes())
}

/// Mean timestamp difference `mean(t2 - t1)` in seconds.
///
/// This is the coarse part of the clock offset; the estimator's fine delay
/// is added on top of it.
///
/// # Panics
///
/// Panics if the slices differ in length or are empty; callers align the
/// traces first.
pub fn coarse_offset(t1: &[f64], t2: &[f64]) -> f64 {
    assert_eq!(t1.len(), t2.len(), "coarse offset needs aligned traces");
    assert!(!t1.is_empty(), "coarse offset of empty traces");
    let sum: f64 = t2.iter().zip(t1).map(|(b, a)| b - a).sum();
    sum / t1.len() as f64
}
