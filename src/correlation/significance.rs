//! Significance of row correlations
//!
//! P-values come from the t statistic `r * sqrt((n - 2) / (1 - r^2))` with
//! `n - 2` degrees of freedom, adjusted with Benjamini-Hochberg.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Two-sided p-value for a correlation `r` estimated from `n` pairs.
///
/// NaN when `r` is undefined or fewer than three pairs were used.
pub fn correlation_pvalue(r: f64, n: usize) -> f64 {
    if !r.is_finite() || n < 3 {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.cdf(-t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// Benjamini-Hochberg FDR adjustment. Non-finite p-values are left out of
/// the correction and come back NaN.
pub fn benjamini_hochberg(pvalues: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..pvalues.len()).filter(|&i| pvalues[i].is_finite()).collect();
    order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));

    let m = order.len() as f64;
    let mut padj = vec![f64::NAN; pvalues.len()];
    let mut cummin = 1.0_f64;
    for (rank, &i) in order.iter().enumerate().rev() {
        cummin = cummin.min(pvalues[i] * m / (rank + 1) as f64);
        padj[i] = cummin;
    }
    padj
}
