//! Column types

use std::fmt;

/// Semantic type of a column.
///
/// Files only distinguish numeric and character storage; `Date` and `Time`
/// are numeric columns refined by their display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnType {
    /// IEEE 754 double (possibly stored truncated)
    Numeric,
    /// Fixed-width text
    Character,
    /// Day count since the format epoch
    Date,
    /// Second count since the format epoch, exposed as a time of day
    Time,
}

impl ColumnType {
    /// Whether values are converted to calendar types
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::Time)
    }

    /// Lowercase name used in listings
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Character => "character",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column metadata as discovered in a dataset file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDescriptor {
    /// Column index (0-based, dense)
    pub index: usize,
    /// Physical column name
    pub name: String,
    /// Descriptive label (often friendlier than the name)
    pub label: Option<String>,
    /// Semantic type
    pub column_type: ColumnType,
    /// Byte offset of the field within a row
    pub offset: usize,
    /// Byte length of the field within a row
    pub length: usize,
    /// Display format name (e.g. `DATE`, `TIME`, `BEST`)
    pub format: Option<String>,
}

impl ColumnDescriptor {
    /// Create a column with zero offset and length
    pub fn new<S: Into<String>>(index: usize, name: S, column_type: ColumnType) -> Self {
        Self {
            index,
            name: name.into(),
            label: None,
            column_type,
            offset: 0,
            length: 0,
            format: None,
        }
    }

    /// Set label
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set byte offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set byte length
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Set display format
    pub fn with_format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }
}
