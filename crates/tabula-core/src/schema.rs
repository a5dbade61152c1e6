//! Table schema

use crate::column::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::value::Value;

/// Ordered columns of a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    columns: Vec<ColumnDescriptor>,
}

impl Schema {
    /// Create a schema from columns in index order
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// All columns, in index order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names, in index order
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a column by index
    pub fn column(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Get a column by exact name
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Index of the column with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Resolve column names to indices, failing on the first unknown name
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.index_of(n)
                    .ok_or_else(|| Error::ColumnNotFound(n.to_string()))
            })
            .collect()
    }

    /// Pick the values at `indices` out of a full-width row
    pub fn project(&self, row: &[Value], indices: &[usize]) -> Result<Vec<Value>> {
        if row.len() != self.columns.len() {
            return Err(Error::RowWidthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        indices
            .iter()
            .map(|&i| {
                row.get(i)
                    .cloned()
                    .ok_or(Error::ColumnOutOfBounds(i, row.len()))
            })
            .collect()
    }
}

impl From<Vec<ColumnDescriptor>> for Schema {
    fn from(columns: Vec<ColumnDescriptor>) -> Self {
        Self::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use pretty_assertions::assert_eq;

    fn pizza() -> Schema {
        Schema::new(vec![
            ColumnDescriptor::new(0, "id", ColumnType::Character).with_length(5),
            ColumnDescriptor::new(1, "prot", ColumnType::Numeric).with_length(8),
            ColumnDescriptor::new(2, "brand", ColumnType::Character).with_length(1),
        ])
    }

    #[test]
    fn test_resolve() {
        let schema = pizza();
        assert_eq!(schema.resolve(&["brand", "id"]).unwrap(), vec![2, 0]);
        assert!(matches!(
            schema.resolve(&["nope"]),
            Err(Error::ColumnNotFound(n)) if n == "nope"
        ));
    }

    #[test]
    fn test_project() {
        let schema = pizza();
        let row = vec![Value::from("14069"), Value::from(21.43), Value::from("a")];
        let projected = schema.project(&row, &[1, 2]).unwrap();
        assert_eq!(projected, vec![Value::from(21.43), Value::from("a")]);

        assert!(matches!(
            schema.project(&row[..2], &[0]),
            Err(Error::RowWidthMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!(pizza().names(), vec!["id", "prot", "brand"]);
    }
}
