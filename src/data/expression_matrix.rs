//! Dense abundance matrix for one omics modality

use std::collections::HashMap;

use ndarray::{concatenate, Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{FeatselError, Result};
use crate::normalization::row_medians;

/// Deduplicate names by appending _1, _2, etc. to duplicates
fn deduplicate_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for name in &names {
        *seen.entry(name.clone()).or_insert(0) += 1;
    }
    if !seen.values().any(|&c| c > 1) {
        return names;
    }

    seen.clear();
    let mut result = Vec::with_capacity(names.len());
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            result.push(name);
        } else {
            let new_name = format!("{}_{}", name, *count - 1);
            log::warn!("Duplicate feature id '{}' renamed to '{}'", name, new_name);
            result.push(new_name);
        }
    }
    result
}

/// An abundance matrix (RNA expression or protein abundance).
/// Rows are features (genes), columns are samples. Missing values are NaN.
#[derive(Debug, Clone)]
pub struct ExpressionMatrix {
    /// Abundance values (features x samples)
    values: Array2<f64>,
    /// Feature identifiers
    feature_ids: Vec<String>,
    /// Sample identifiers
    sample_ids: Vec<String>,
}

impl ExpressionMatrix {
    /// Create a new matrix, validating dimensions and rejecting infinities
    pub fn new(values: Array2<f64>, feature_ids: Vec<String>, sample_ids: Vec<String>) -> Result<Self> {
        let (n_features, n_samples) = values.dim();

        if feature_ids.len() != n_features {
            return Err(FeatselError::DimensionMismatch {
                expected: format!("{} feature IDs", n_features),
                got: format!("{} feature IDs", feature_ids.len()),
            });
        }

        if sample_ids.len() != n_samples {
            return Err(FeatselError::DimensionMismatch {
                expected: format!("{} sample IDs", n_samples),
                got: format!("{} sample IDs", sample_ids.len()),
            });
        }

        if values.iter().any(|x| x.is_infinite()) {
            return Err(FeatselError::InvalidTable {
                reason: "Values must be finite or missing".to_string(),
            });
        }

        let feature_ids = deduplicate_names(feature_ids);

        Ok(Self {
            values,
            feature_ids,
            sample_ids,
        })
    }

    /// Number of features (rows)
    pub fn n_features(&self) -> usize {
        self.values.nrows()
    }

    /// Number of samples (columns)
    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn feature_ids(&self) -> &[String] {
        &self.feature_ids
    }

    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Values of one feature across samples
    pub fn feature_values(&self, feature_idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(feature_idx)
    }

    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|id| id == sample_id)
    }

    /// Number of missing values
    pub fn n_missing(&self) -> usize {
        self.values.iter().filter(|x| x.is_nan()).count()
    }

    /// Subset to specific features
    pub fn subset_features(&self, feature_indices: &[usize]) -> Result<Self> {
        let values = self.values.select(Axis(0), feature_indices);
        let feature_ids = feature_indices
            .iter()
            .map(|&i| self.feature_ids[i].clone())
            .collect();

        Self::new(values, feature_ids, self.sample_ids.clone())
    }

    /// Subset to specific samples
    pub fn subset_samples(&self, sample_indices: &[usize]) -> Result<Self> {
        let values = self.values.select(Axis(1), sample_indices);
        let sample_ids = sample_indices
            .iter()
            .map(|&i| self.sample_ids[i].clone())
            .collect();

        Self::new(values, self.feature_ids.clone(), sample_ids)
    }

    /// Restrict both matrices to the samples they share, in `self`'s column order
    pub fn align_samples(&self, other: &ExpressionMatrix) -> Result<(Self, Self)> {
        let (left, right): (Vec<usize>, Vec<usize>) = self
            .sample_ids
            .iter()
            .enumerate()
            .filter_map(|(i, id)| other.sample_index(id).map(|j| (i, j)))
            .unzip();

        if left.is_empty() {
            return Err(FeatselError::InvalidTable {
                reason: "The two tables share no sample columns".to_string(),
            });
        }

        let dropped = self.n_samples() + other.n_samples() - 2 * left.len();
        if dropped > 0 {
            log::warn!(
                "{} sample columns are not shared by both tables and were dropped ({} shared)",
                dropped,
                left.len()
            );
        }

        Ok((self.subset_samples(&left)?, other.subset_samples(&right)?))
    }

    /// Copy with an extra `median` column holding each row's median.
    ///
    /// After median centering this column is zero in every row, so it adds
    /// a `(0, 0)` point to each row correlation.
    pub fn with_median_anchor(&self) -> Result<Self> {
        let medians = row_medians(self.values.view()).insert_axis(Axis(1));
        let values = concatenate(Axis(1), &[self.values.view(), medians.view()]).map_err(|e| {
            FeatselError::InvalidTable {
                reason: format!("Could not append median column: {}", e),
            }
        })?;

        let mut sample_ids = self.sample_ids.clone();
        sample_ids.push("median".to_string());

        Self::new(values, self.feature_ids.clone(), sample_ids)
    }
}
