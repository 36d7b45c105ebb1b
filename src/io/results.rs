//! Feature correlation results structure

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationMethod;
use crate::stats::{median, nan_mean, Histogram};

/// Per-row feature correlations between the RNA and protein tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResults {
    /// 0-based row position in the input tables
    pub row_indices: Vec<usize>,
    /// Feature identifiers (row positions when the tables carry no ids)
    pub feature_ids: Vec<String>,
    /// Rounded correlation of the absolute deviations, NaN when undefined
    pub correlations: Vec<f64>,
    /// Number of complete sample pairs behind each correlation
    pub n_pairs: Vec<usize>,
    /// Two-sided p-values of the unrounded correlations; NaN unless requested
    pub pvalues: Vec<f64>,
    /// Benjamini-Hochberg adjusted p-values
    pub padj: Vec<f64>,
    /// Correlation coefficient used
    pub method: CorrelationMethod,
}

impl CorrelationResults {
    /// Results read back from a correlation table, without pair counts or p-values
    pub fn from_scores(row_indices: Vec<usize>, feature_ids: Vec<String>, correlations: Vec<f64>) -> Self {
        let n = row_indices.len();
        Self {
            row_indices,
            feature_ids,
            correlations,
            n_pairs: vec![0; n],
            pvalues: vec![f64::NAN; n],
            padj: vec![f64::NAN; n],
            method: CorrelationMethod::default(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.row_indices.len()
    }

    /// Number of rows with a defined correlation
    pub fn n_defined(&self) -> usize {
        self.correlations.iter().filter(|r| r.is_finite()).count()
    }

    /// Results restricted to the given positions, in the given order
    pub fn subset(&self, positions: &[usize]) -> Self {
        Self {
            row_indices: positions.iter().map(|&i| self.row_indices[i]).collect(),
            feature_ids: positions.iter().map(|&i| self.feature_ids[i].clone()).collect(),
            correlations: positions.iter().map(|&i| self.correlations[i]).collect(),
            n_pairs: positions.iter().map(|&i| self.n_pairs[i]).collect(),
            pvalues: positions.iter().map(|&i| self.pvalues[i]).collect(),
            padj: positions.iter().map(|&i| self.padj[i]).collect(),
            method: self.method,
        }
    }

    /// Summary statistics at a selection threshold
    pub fn summary(&self, threshold: f64, n_bins: usize) -> CorrelationSummary {
        let selected = self
            .correlations
            .iter()
            .filter(|&&r| r.is_finite() && r >= threshold)
            .count();

        CorrelationSummary {
            total_rows: self.n_rows(),
            defined: self.n_defined(),
            selected,
            threshold,
            mean: nan_mean(&self.correlations),
            median: median(&self.correlations),
            histogram: Histogram::new(&self.correlations, n_bins),
        }
    }
}

/// Summary of a feature correlation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub total_rows: usize,
    pub defined: usize,
    pub selected: usize,
    pub threshold: f64,
    pub mean: f64,
    pub median: f64,
    pub histogram: Histogram,
}

impl std::fmt::Display for CorrelationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Feature Correlation Summary")?;
        writeln!(f, "===========================")?;
        writeln!(f, "Total rows: {}", self.total_rows)?;
        writeln!(f, "Defined correlations: {}", self.defined)?;
        writeln!(f, "Mean correlation: {:.3}", self.mean)?;
        writeln!(f, "Median correlation: {:.3}", self.median)?;
        writeln!(f, "Selected (correlation >= {}): {}", self.threshold, self.selected)?;
        writeln!(f)?;
        writeln!(f, "Correlation histogram:")?;
        write!(f, "{}", self.histogram)
    }
}

/// Everything a full run produced, written as JSON on request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: CorrelationSummary,
    pub selected_genes: Vec<String>,
    pub protein_records: usize,
    pub rna_records: usize,
    pub results: CorrelationResults,
}
