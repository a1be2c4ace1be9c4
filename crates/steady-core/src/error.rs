//! Error types for steady-state detection
//!
//! Provides a unified error type for all steady-points crates.

use thiserror::Error;

/// Core error type for steady-state operations
#[derive(Error, Debug)]
pub enum Error {
    /// A column named by the parameters is not present in the series
    #[error("Missing column: '{column}' defined in {context} is not in the data")]
    MissingColumn { column: String, context: String },

    /// A required parameter list is empty
    #[error("Empty parameter: {0} must contain at least one entry")]
    EmptyParameter(String),

    /// A stability tolerance that is not a positive finite number
    #[error("Invalid tolerance for column '{column}': {tolerance} must be greater than 0")]
    InvalidTolerance { column: String, tolerance: f64 },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The scan was stopped through its cancellation flag
    #[error("Scan cancelled after {visited} candidates")]
    Cancelled { visited: usize },

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a column absent from the series
    pub fn missing_column(column: &str, context: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            context: context.to_string(),
        }
    }

    /// Create an error for columns of different lengths
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// True for errors caused by the parameter bundle rather than the data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::EmptyParameter(_)
                | Self::InvalidTolerance { .. }
                | Self::InvalidParameter(_)
        )
    }
}
