//! Input/Output for abundance tables and correlation results

mod results;
mod tsv;

pub use results::{CorrelationResults, CorrelationSummary, RunReport};
pub use tsv::{read_correlations, read_matrix, write_correlations, write_lines, write_selected, IdColumn};
