//! Statistical utility functions shared across modules
//!
//! Contains the NaN-skipping median used by median centering, decimal
//! rounding for reported correlations, and the histogram printed in run
//! summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Median of the non-NaN values in `values`.
///
/// Returns NaN when no value is present. An even number of values yields the
/// mean of the two middle values.
pub fn median(values: &[f64]) -> f64 {
    let mut finite: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }

    finite.sort_by(|a, b| a.total_cmp(b));
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        (finite[mid - 1] + finite[mid]) / 2.0
    } else {
        finite[mid]
    }
}

/// Mean of the non-NaN values, NaN if there are none
pub fn nan_mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, n), &x| (s + x, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Round to `decimals` places, ties to even.
///
/// Scales by `10^decimals`, rounds half to even and scales back, so 0.125
/// becomes 0.12 and 0.135 becomes 0.14 at two decimals (subject to the
/// binary representation of the scaled value).
pub fn round_half_even(x: f64, decimals: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round_ties_even() / scale
}

/// Equal-width histogram over the finite values of a sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` entries
    pub edges: Vec<f64>,
    /// Number of values per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Build a histogram with `n_bins` equal-width bins spanning the finite
    /// range of `values`. The last bin is closed on both sides. When all
    /// values are equal the range is widened to `[v - 0.5, v + 0.5]`.
    pub fn new(values: &[f64], n_bins: usize) -> Self {
        let n_bins = n_bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();

        if finite.is_empty() {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0usize; n_bins];
        for &x in &finite {
            let bin = (((x - lo) / (hi - lo)) * n_bins as f64).floor() as usize;
            counts[bin.min(n_bins - 1)] += 1;
        }

        Self { edges, counts }
    }

    /// Total number of values counted
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return writeln!(f, "  (no finite values)");
        }

        const BAR_WIDTH: usize = 40;
        let max_count = self.counts.iter().copied().max().unwrap_or(0).max(1);
        for (i, &count) in self.counts.iter().enumerate() {
            let bar_len = count * BAR_WIDTH / max_count;
            writeln!(
                f,
                "  [{:>6.2}, {:>6.2}{} {:>6} {}",
                self.edges[i],
                self.edges[i + 1],
                if i + 1 == self.counts.len() { ']' } else { ')' },
                count,
                "#".repeat(bar_len)
            )?;
        }
        Ok(())
    }
}
