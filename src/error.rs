//! Error types for rust_featsel

use thiserror::Error;

/// Main error type for feature selection operations
#[derive(Error, Debug)]
pub enum FeatselError {
    #[error("Invalid table: {reason}")]
    InvalidTable { reason: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid labels: {reason}")]
    InvalidLabels { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for feature selection operations
pub type Result<T> = std::result::Result<T, FeatselError>;
