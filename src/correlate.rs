//! Discrete cross-correlation of resampled value sequences.

use rayon::prelude::*;

/// Full cross-correlation of one sequence against another, plus its peak.
///
/// Entry `k` of `values` pairs the second sequence with the first shifted by
/// `k - zero_lag` samples; `zero_lag` is `first.len() - 1`. Entries above
/// `zero_lag` measure how well the second sequence matches the first delayed
/// by that many samples.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationProfile {
    /// Correlation values, length `first.len() + second.len() - 1`.
    pub values: Vec<f64>,
    /// Index of the maximum (first maximal index on ties).
    pub peak: usize,
    /// Index corresponding to zero sample lag.
    pub zero_lag: usize,
}

/// Compute the full discrete cross-correlation of `second` against `first`.
///
/// The output has length `first.len() + second.len() - 1`. Entries are
/// independent dot products of the overlapping slices and are computed in
/// parallel.
///
/// # Panics
///
/// Panics if either sequence is empty. The resampler never produces empty
/// sequences for valid signals.
pub fn cross_correlate(first: &[f64], second: &[f64]) -> CorrelationProfile {
    assert!(
        !first.is_empty() && !second.is_empty(),
        "cannot correlate empty sequences"
    );
    let n1 = first.len();
    let n2 = second.len();
    let zero_lag = n1 - 1;

    let values: Vec<f64> = (0..n1 + n2 - 1)
        .into_par_iter()
        .map(|k| {
            let lag = k as isize - zero_lag as isize;
            let start = lag.max(0) as usize;
            let end = (n1 as isize + lag).min(n2 as isize) as usize;
            let offset = (start as isize - lag) as usize;
            second[start..end]
                .iter()
                .zip(&first[offset..offset + (end - start)])
                .map(|(s, f)| s * f)
                .sum()
        })
        .collect();

    let peak = first_argmax(&values);
    CorrelationProfile {
        values,
        peak,
        zero_lag,
    }
}

/// Index of the first maximal entry.
fn first_argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
