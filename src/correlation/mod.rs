//! Feature correlation between the RNA and protein tables
//!
//! Each table is reduced to the absolute deviation of every value from its
//! row median, and the two reduced tables are then correlated row by row.

mod row;
mod significance;

pub use row::{row_correlation, CorrelationMethod, RowCorrelation};
pub use significance::{benjamini_hochberg, correlation_pvalue};

use rayon::prelude::*;

use crate::data::ExpressionMatrix;
use crate::error::{FeatselError, Result};
use crate::io::CorrelationResults;
use crate::normalization::absolute_deviation;
use crate::stats::round_half_even;

/// Parameters for the feature correlation
#[derive(Debug, Clone)]
pub struct CorrelationParams {
    /// Correlation coefficient [default: Pearson]
    pub method: CorrelationMethod,
    /// Decimal places kept in the reported correlation [default: 2]
    pub decimals: u32,
    /// Append each row's median as an extra sample before centering
    pub median_anchor: bool,
    /// Fill in t-test p-values and BH-adjusted p-values; left NaN otherwise
    pub significance: bool,
}

impl Default for CorrelationParams {
    fn default() -> Self {
        Self {
            method: CorrelationMethod::Pearson,
            decimals: 2,
            median_anchor: false,
            significance: false,
        }
    }
}

/// Per-row correlation of the median-centered, absolute-valued RNA and
/// protein tables.
///
/// Rows are matched by position. Sample columns are matched by id and only
/// shared samples are used.
pub fn feature_correlation(
    rna: &ExpressionMatrix,
    protein: &ExpressionMatrix,
    params: &CorrelationParams,
) -> Result<CorrelationResults> {
    if rna.n_features() != protein.n_features() {
        return Err(FeatselError::DimensionMismatch {
            expected: format!("{} protein rows (one per RNA row)", rna.n_features()),
            got: format!("{} protein rows", protein.n_features()),
        });
    }

    if rna.n_features() == 0 {
        return Err(FeatselError::EmptyData {
            reason: "Tables have no rows".to_string(),
        });
    }

    let mismatched = rna
        .feature_ids()
        .iter()
        .zip(protein.feature_ids())
        .filter(|(a, b)| a != b)
        .count();
    if mismatched > 0 {
        log::warn!(
            "{} rows have different feature ids in the RNA and protein tables; rows are matched by position",
            mismatched
        );
    }

    let (rna, protein) = rna.align_samples(protein)?;
    let (rna, protein) = if params.median_anchor {
        log::debug!("Appending median anchor column to both tables");
        (rna.with_median_anchor()?, protein.with_median_anchor()?)
    } else {
        (rna, protein)
    };

    log::info!(
        "Correlating {} rows over {} samples ({})",
        rna.n_features(),
        rna.n_samples(),
        params.method
    );

    let rna_dev = absolute_deviation(rna.values());
    let pro_dev = absolute_deviation(protein.values());

    let per_row: Vec<RowCorrelation> = (0..rna_dev.nrows())
        .into_par_iter()
        .map(|i| {
            let x = rna_dev.row(i).to_vec();
            let y = pro_dev.row(i).to_vec();
            row_correlation(&x, &y, params.method)
        })
        .collect();

    let (pvalues, padj) = if params.significance {
        let pvalues: Vec<f64> = per_row
            .iter()
            .map(|rc| correlation_pvalue(rc.value, rc.n))
            .collect();
        let padj = benjamini_hochberg(&pvalues);
        (pvalues, padj)
    } else {
        (vec![f64::NAN; per_row.len()], vec![f64::NAN; per_row.len()])
    };

    let undefined = per_row.iter().filter(|rc| rc.value.is_nan()).count();
    if undefined > 0 {
        log::warn!(
            "{} rows have an undefined correlation (constant or fewer than two complete samples)",
            undefined
        );
    }

    Ok(CorrelationResults {
        row_indices: (0..per_row.len()).collect(),
        feature_ids: rna.feature_ids().to_vec(),
        correlations: per_row
            .iter()
            .map(|rc| round_half_even(rc.value, params.decimals))
            .collect(),
        n_pairs: per_row.iter().map(|rc| rc.n).collect(),
        pvalues,
        padj,
        method: params.method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_feature_correlation_basic() {
        // Row 0: same deviation pattern in both tables -> 1.0
        // Row 1: opposite deviation pattern -> -1.0 after abs deviation
        // Row 2: constant protein row -> NaN
        let rna = ExpressionMatrix::new(
            array![
                [1.0, 2.0, 3.0, 10.0],
                [5.0, 5.0, 0.0, 10.0],
                [1.0, 2.0, 3.0, 4.0],
            ],
            ids("g", 3),
            ids("s", 4),
        )
        .unwrap();
        let protein = ExpressionMatrix::new(
            array![
                [11.0, 12.0, 13.0, 20.0],
                [7.0, 3.0, 5.0, 5.0],
                [2.0, 2.0, 2.0, 2.0],
            ],
            ids("g", 3),
            ids("s", 4),
        )
        .unwrap();

        let results = feature_correlation(&rna, &protein, &CorrelationParams::default()).unwrap();
        assert_eq!(results.n_rows(), 3);
        assert_eq!(results.correlations[0], 1.0);
        assert_eq!(results.correlations[1], -1.0);
        assert!(results.correlations[2].is_nan());
        assert!(results.pvalues.iter().all(|p| p.is_nan()));
        assert_eq!(results.n_pairs, vec![4, 4, 4]);
    }

    #[test]
    fn test_significance_when_requested() {
        let rna = ExpressionMatrix::new(
            array![[1.0, 2.0, 3.0, 10.0, 4.0], [1.0, 2.0, 3.0, 4.0, 5.0]],
            ids("g", 2),
            ids("s", 5),
        )
        .unwrap();
        let protein = ExpressionMatrix::new(
            array![[11.0, 12.0, 13.0, 20.0, 14.0], [2.0, 2.0, 2.0, 2.0, 2.0]],
            ids("g", 2),
            ids("s", 5),
        )
        .unwrap();

        let params = CorrelationParams {
            significance: true,
            ..CorrelationParams::default()
        };
        let results = feature_correlation(&rna, &protein, &params).unwrap();
        assert!(results.pvalues[0] < 1e-6);
        assert!(results.padj[0] < 1e-6);
        assert!(results.pvalues[1].is_nan());
        assert!(results.padj[1].is_nan());
    }

    #[test]
    fn test_feature_correlation_rounding() {
        // abs deviations: rna [2, 1, 0, 1, 2], protein [1, 2, 0, 1, 2], r = 9 / 14
        let rna = ExpressionMatrix::new(array![[1.0, 2.0, 3.0, 4.0, 5.0]], ids("g", 1), ids("s", 5)).unwrap();
        let protein = ExpressionMatrix::new(array![[2.0, 1.0, 3.0, 4.0, 5.0]], ids("g", 1), ids("s", 5)).unwrap();

        let results = feature_correlation(&rna, &protein, &CorrelationParams::default()).unwrap();
        assert_eq!(results.correlations[0], 0.64);
        assert!((results.correlations[0] - 9.0 / 14.0).abs() < 0.005);
    }

    #[test]
    fn test_row_count_mismatch() {
        let rna = ExpressionMatrix::new(array![[1.0, 2.0], [3.0, 4.0]], ids("g", 2), ids("s", 2)).unwrap();
        let protein = ExpressionMatrix::new(array![[1.0, 2.0]], ids("g", 1), ids("s", 2)).unwrap();
        let result = feature_correlation(&rna, &protein, &CorrelationParams::default());
        assert!(matches!(result, Err(FeatselError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_columns_aligned_by_sample_id() {
        let rna = ExpressionMatrix::new(
            array![[1.0, 2.0, 3.0, 10.0]],
            ids("g", 1),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        )
        .unwrap();
        // same values, shuffled columns, plus an extra column
        let protein = ExpressionMatrix::new(
            array![[10.0, 99.0, 3.0, 1.0, 2.0]],
            ids("g", 1),
            vec!["d".into(), "x".into(), "c".into(), "a".into(), "b".into()],
        )
        .unwrap();

        let results = feature_correlation(&rna, &protein, &CorrelationParams::default()).unwrap();
        assert_eq!(results.correlations[0], 1.0);
        assert_eq!(results.n_pairs[0], 4);
    }

    #[test]
    fn test_median_anchor_adds_pair() {
        let rna = ExpressionMatrix::new(array![[1.0, 2.0, 3.0, 10.0]], ids("g", 1), ids("s", 4)).unwrap();
        let protein = ExpressionMatrix::new(array![[4.0, 1.0, 3.0, 2.0]], ids("g", 1), ids("s", 4)).unwrap();

        let params = CorrelationParams {
            median_anchor: true,
            ..CorrelationParams::default()
        };
        let anchored = feature_correlation(&rna, &protein, &params).unwrap();
        let plain = feature_correlation(&rna, &protein, &CorrelationParams::default()).unwrap();
        assert_eq!(anchored.n_pairs[0], 5);
        assert_eq!(plain.n_pairs[0], 4);
    }
}
