//! SAS7BDAT error types

use thiserror::Error;

/// Result type for SAS7BDAT operations
pub type SasResult<T> = std::result::Result<T, SasError>;

/// Errors that can occur while reading a SAS7BDAT file
#[derive(Debug, Error)]
pub enum SasError {
    /// IO error (failed read, or a header cut short)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format
    #[error("Invalid SAS7BDAT format: {0}")]
    InvalidFormat(String),

    /// A required subheader was not found
    #[error("Could not find subheader: {0}")]
    MissingSubheader(&'static str),

    /// A subheader that must be unique appeared several times
    #[error("Multiple ({count}) instances of the same subheader: {name}")]
    DuplicateSubheader { name: &'static str, count: usize },

    /// A slice reached past the end of its source buffer
    #[error("Read out of range: offset {offset} + length {length} exceeds {available} bytes")]
    OutOfRange {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// Layout variant (64-bit or big-endian) that this reader does not decode
    #[error("Unsupported SAS7BDAT variant: {0}")]
    UnsupportedVariant(String),

    /// Date/time conversion that could not be recovered
    #[error("Date conversion error: {0}")]
    DateConversion(#[from] DateConversionError),
}

impl SasError {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
        SasError::InvalidFormat(msg.into())
    }
}

/// A day or second count outside the window the converter accepts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateConversionError {
    /// The raw count is outside `[min, max]`
    #[error("{unit}={value} must fall within the range [{min}, {max}]")]
    CountOutOfRange {
        unit: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The resulting calendar year is outside `[min, max]`
    #[error("year={year} must fall within the range [{min}, {max}]")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    /// The count cannot be represented by the calendar type at all
    #[error("{unit}={value} overflows the calendar")]
    Overflow { unit: &'static str, value: i64 },
}
