//! Row-wise normalization of abundance tables

mod median;

pub use median::{absolute_deviation, median_center, row_medians};
