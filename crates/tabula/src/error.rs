//! Error types for the table layer

use std::path::PathBuf;

use thiserror::Error;

/// Result type for table and catalog operations
pub type TableResult<T> = std::result::Result<T, TableError>;

/// Errors that can occur while opening or querying tables
#[derive(Debug, Error)]
pub enum TableError {
    /// The dataset file could not be read
    #[error(transparent)]
    Sas(#[from] tabula_sas::SasError),

    /// Schema-level error (e.g. an unknown column name)
    #[error(transparent)]
    Core(#[from] tabula_core::Error),

    /// IO error while listing a directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog directory does not exist
    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The catalog path exists but is not a directory
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// No dataset with this name in the catalog
    #[error("Table not found: {0}")]
    TableNotFound(String),
}
