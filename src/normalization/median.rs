//! Median centering and absolute deviation from the row median

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::stats::median;

/// NaN-skipping median of every row. An all-missing row yields NaN.
pub fn row_medians(values: ArrayView2<f64>) -> Array1<f64> {
    let rows: Vec<f64> = (0..values.nrows())
        .into_par_iter()
        .map(|i| {
            let row = values.row(i);
            match row.as_slice() {
                Some(slice) => median(slice),
                None => median(&row.to_vec()),
            }
        })
        .collect();

    Array1::from(rows)
}

/// Subtract each row's median from every value in that row.
///
/// Missing values stay missing.
pub fn median_center(values: ArrayView2<f64>) -> Array2<f64> {
    let medians = row_medians(values);
    let mut centered = values.to_owned();
    for (mut row, &m) in centered.axis_iter_mut(Axis(0)).zip(medians.iter()) {
        row.mapv_inplace(|x| x - m);
    }
    centered
}

/// Absolute deviation of every value from its row median, `|x - median(row)|`
pub fn absolute_deviation(values: ArrayView2<f64>) -> Array2<f64> {
    median_center(values).mapv(f64::abs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_row_medians() {
        let values = array![[1.0, 3.0, 2.0], [4.0, 1.0, f64::NAN], [f64::NAN, f64::NAN, f64::NAN]];
        let medians = row_medians(values.view());
        assert_eq!(medians[0], 2.0);
        assert_eq!(medians[1], 2.5);
        assert!(medians[2].is_nan());
    }

    #[test]
    fn test_row_medians_non_contiguous() {
        let values = array![[1.0, 3.0, 2.0], [4.0, 1.0, 9.0]];
        let transposed = values.t();
        let medians = row_medians(transposed);
        assert_eq!(medians.to_vec(), vec![2.5, 2.0, 5.5]);
    }

    #[test]
    fn test_median_center() {
        let values = array![[1.0, 3.0, 2.0], [10.0, 20.0, f64::NAN]];
        let centered = median_center(values.view());
        assert_eq!(centered.row(0).to_vec(), vec![-1.0, 1.0, 0.0]);
        assert_eq!(centered[[1, 0]], -5.0);
        assert_eq!(centered[[1, 1]], 5.0);
        assert!(centered[[1, 2]].is_nan());
    }

    #[test]
    fn test_absolute_deviation() {
        let values = array![[1.0, 5.0, 2.0, 8.0]];
        // median = 3.5
        let dev = absolute_deviation(values.view());
        assert_eq!(dev.row(0).to_vec(), vec![2.5, 1.5, 1.5, 4.5]);
    }
}
