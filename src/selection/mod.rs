//! Threshold selection of co-varying features

use crate::correlation::CorrelationParams;
use crate::io::CorrelationResults;

/// Parameters for a full selection run
#[derive(Debug, Clone)]
pub struct SelectionParams {
    /// Minimum correlation for a row to be selected [default: 0.5]
    pub threshold: f64,
    /// Bins in the reported correlation histogram [default: 10]
    pub histogram_bins: usize,
    pub correlation: CorrelationParams,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            histogram_bins: 10,
            correlation: CorrelationParams::default(),
        }
    }
}

/// Positions in `results` whose correlation is at least `threshold`.
///
/// Undefined correlations are never selected. Positions keep row order.
pub fn select_features(results: &CorrelationResults, threshold: f64) -> Vec<usize> {
    results
        .correlations
        .iter()
        .enumerate()
        .filter(|(_, &r)| r.is_finite() && r >= threshold)
        .map(|(i, _)| i)
        .collect()
}
