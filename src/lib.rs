//! rust_featsel: RNA/protein feature selection
//!
//! Scores every gene by how well its RNA and protein abundances co-vary:
//! both tables are median-centered per row, reduced to absolute deviations,
//! and correlated row by row. Genes at or above a correlation threshold are
//! selected and their records pulled from the raw source tables.
//!
//! # Example
//!
//! ```ignore
//! use rust_featsel::prelude::*;
//!
//! let rna = read_matrix("train_rna_common.tsv", IdColumn::Auto)?;
//! let protein = read_matrix("train_pro_common.tsv", IdColumn::Auto)?;
//!
//! let (results, selected) = select_correlated(&rna, &protein, &SelectionParams::default())?;
//! write_correlations("feature_corr.tsv", &results)?;
//! ```

pub mod cli;
pub mod correlation;
pub mod data;
pub mod error;
pub mod extract;
pub mod io;
pub mod normalization;
pub mod selection;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::correlation::{feature_correlation, CorrelationMethod, CorrelationParams};
    pub use crate::data::{ExpressionMatrix, GeneLabels, LabelLookup};
    pub use crate::error::{FeatselError, Result};
    pub use crate::extract::{extract_records, genes_for_rows, RecordIndex};
    pub use crate::io::{
        read_correlations, read_matrix, write_correlations, write_lines, write_selected, CorrelationResults,
        CorrelationSummary, IdColumn, RunReport,
    };
    pub use crate::normalization::{absolute_deviation, median_center, row_medians};
    pub use crate::selection::{select_features, SelectionParams};
}

use prelude::*;

/// Gene names and raw records for the selected rows
#[derive(Debug, Clone)]
pub struct Extraction {
    pub genes: Vec<String>,
    pub protein_records: Vec<String>,
    pub rna_records: Vec<String>,
}

/// Correlate the two tables and select rows at or above the threshold
pub fn select_correlated(
    rna: &ExpressionMatrix,
    protein: &ExpressionMatrix,
    params: &SelectionParams,
) -> Result<(CorrelationResults, Vec<usize>)> {
    let results = feature_correlation(rna, protein, &params.correlation)?;
    let selected = select_features(&results, params.threshold);
    log::info!(
        "{} of {} rows have correlation >= {}",
        selected.len(),
        results.n_rows(),
        params.threshold
    );
    Ok((results, selected))
}

/// Name the selected rows and pull their first matching raw records
pub fn extract_selected(
    results: &CorrelationResults,
    selected: &[usize],
    labels: &GeneLabels,
    raw_protein: &RecordIndex,
    raw_rna: &RecordIndex,
) -> Result<Extraction> {
    let rows: Vec<usize> = selected.iter().map(|&i| results.row_indices[i]).collect();
    let genes = genes_for_rows(labels, &rows)?;

    Ok(Extraction {
        protein_records: extract_records(raw_protein, &genes),
        rna_records: extract_records(raw_rna, &genes),
        genes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ids(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i + 1)).collect()
    }

    #[test]
    fn test_full_pipeline() {
        let rna = ExpressionMatrix::new(
            array![
                [1.0, 2.0, 3.0, 10.0, 2.5],  // co-varying
                [5.0, 5.0, 0.0, 10.0, 5.0],  // anti-varying
                [1.0, 2.0, 3.0, 4.0, 5.0],   // constant protein
                [2.0, 9.0, 4.0, 4.0, 1.0],   // co-varying
            ],
            (0..4).map(|i| i.to_string()).collect(),
            ids("s", 5),
        )
        .unwrap();
        let protein = ExpressionMatrix::new(
            array![
                [11.0, 12.0, 13.0, 20.0, 12.5],
                [7.0, 3.0, 5.0, 5.0, 5.0],
                [2.0, 2.0, 2.0, 2.0, 2.0],
                [3.0, 17.0, 7.0, 7.0, 1.0],
            ],
            (0..4).map(|i| i.to_string()).collect(),
            ids("s", 5),
        )
        .unwrap();

        let (results, selected) = select_correlated(&rna, &protein, &SelectionParams::default()).unwrap();
        assert_eq!(results.n_rows(), 4);
        assert_eq!(selected, vec![0, 3]);

        let labels = GeneLabels::new(vec!["TP53".into(), "EGFR".into(), "MYC".into(), "KRAS".into()]);
        let raw_protein = RecordIndex::new(vec![
            "gene\tp1\tp2".to_string(),
            "KRAS\t0.1\t0.2".to_string(),
            "TP53\t0.3\t0.4".to_string(),
        ]);
        let raw_rna = RecordIndex::new(vec![
            "gene\tr1\tr2".to_string(),
            "TP53\t10\t20".to_string(),
        ]);

        let extraction = extract_selected(&results, &selected, &labels, &raw_protein, &raw_rna).unwrap();
        assert_eq!(extraction.genes, vec!["TP53", "KRAS"]);
        assert_eq!(extraction.protein_records, vec!["TP53\t0.3\t0.4", "KRAS\t0.1\t0.2"]);
        assert_eq!(extraction.rna_records, vec!["TP53\t10\t20"]);

        let summary = results.summary(0.5, 10);
        assert_eq!(summary.selected, 2);
        assert_eq!(summary.defined, 3);
    }

    #[test]
    fn test_all_missing_row_keeps_positions() {
        let mut rna_file = NamedTempFile::new().unwrap();
        write!(rna_file, "s1\ts2\ts3\ts4\n1\t2\t3\t10\n1\t2\t3\t4\n5\t1\t3\t2\n").unwrap();
        // the middle protein row has no values at all
        let mut pro_file = NamedTempFile::new().unwrap();
        write!(pro_file, "s1\ts2\ts3\ts4\n11\t12\t13\t20\n\t\t\t\n15\t11\t13\t12\n").unwrap();

        let rna = read_matrix(rna_file.path(), IdColumn::Auto).unwrap();
        let protein = read_matrix(pro_file.path(), IdColumn::Auto).unwrap();
        assert_eq!(protein.n_features(), 3);

        let (results, selected) = select_correlated(&rna, &protein, &SelectionParams::default()).unwrap();
        assert_eq!(results.row_indices, vec![0, 1, 2]);
        assert_eq!(results.correlations[0], 1.0);
        assert!(results.correlations[1].is_nan());
        assert_eq!(results.n_pairs[1], 0);
        assert_eq!(results.correlations[2], 1.0);
        assert_eq!(selected, vec![0, 2]);

        let labels = GeneLabels::new(vec!["TP53".into(), "EGFR".into(), "MYC".into()]);
        let raw = RecordIndex::new(vec!["MYC\t1".to_string(), "EGFR\t2".to_string(), "TP53\t3".to_string()]);
        let extraction = extract_selected(&results, &selected, &labels, &raw, &raw).unwrap();
        assert_eq!(extraction.genes, vec!["TP53", "MYC"]);
        assert_eq!(extraction.protein_records, vec!["TP53\t3", "MYC\t1"]);
    }
}
