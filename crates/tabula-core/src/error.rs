//! Error types for tabula-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabula-core
#[derive(Debug, Error)]
pub enum Error {
    /// No column with the given name exists in the schema
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column index out of bounds
    #[error("Column index {0} out of bounds (count: {1})")]
    ColumnOutOfBounds(usize, usize),

    /// Row width does not match the schema
    #[error("Row has {actual} values, schema has {expected} columns")]
    RowWidthMismatch { expected: usize, actual: usize },
}
