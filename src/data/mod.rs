//! Data structures for the matched omics tables

mod expression_matrix;
mod labels;

pub use expression_matrix::ExpressionMatrix;
pub use labels::{GeneLabels, LabelLookup};
