//! Push-style consumers for [`SasReader`](crate::SasReader).
//!
//! The reader calls [`SasReaderCallback::column`] once per column in index
//! order, then [`SasReaderCallback::read_data`] once, then
//! [`SasReaderCallback::row`] once per row until the file is exhausted or
//! the callback returns `false`.

use tabula_core::{ColumnDescriptor, Schema, Value};

/// Receives the columns and rows of a file as they are decoded.
pub trait SasReaderCallback {
    /// A column was discovered.
    fn column(&mut self, column: &ColumnDescriptor);

    /// Whether rows should be decoded at all. Returning `false` ends the
    /// read right after the columns.
    fn read_data(&mut self) -> bool;

    /// A row was decoded. `row_number` starts at 1. Return `false` to stop.
    fn row(&mut self, row_number: u64, values: &[Value]) -> bool;
}

impl<T: SasReaderCallback + ?Sized> SasReaderCallback for &mut T {
    fn column(&mut self, column: &ColumnDescriptor) {
        (**self).column(column)
    }

    fn read_data(&mut self) -> bool {
        (**self).read_data()
    }

    fn row(&mut self, row_number: u64, values: &[Value]) -> bool {
        (**self).row(row_number, values)
    }
}

/// Counts rows without keeping them.
#[derive(Debug, Default, Clone)]
pub struct CountingCallback {
    count: u64,
}

impl CountingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows seen so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl SasReaderCallback for CountingCallback {
    fn column(&mut self, _column: &ColumnDescriptor) {}

    fn read_data(&mut self) -> bool {
        true
    }

    fn row(&mut self, _row_number: u64, _values: &[Value]) -> bool {
        self.count += 1;
        true
    }
}

/// Collects the schema and skips every row.
#[derive(Debug, Default, Clone)]
pub struct ColumnCollector {
    columns: Vec<ColumnDescriptor>,
}

impl ColumnCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn into_schema(self) -> Schema {
        Schema::new(self.columns)
    }
}

impl SasReaderCallback for ColumnCollector {
    fn column(&mut self, column: &ColumnDescriptor) {
        self.columns.push(column.clone());
    }

    fn read_data(&mut self) -> bool {
        false
    }

    fn row(&mut self, _row_number: u64, _values: &[Value]) -> bool {
        false
    }
}

/// Rows gathered by a [`RowCollector`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedRows {
    /// The selected columns, in selection order
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Vec<Value>>,
}

/// Collects rows, optionally projected onto named columns and capped at a
/// maximum count.
///
/// An unknown column name ends the read before any row is decoded, and a
/// row that does not match the schema ends it at that row; either error is
/// reported by [`RowCollector::finish`].
#[derive(Debug, Default)]
pub struct RowCollector {
    selection: Option<Vec<String>>,
    max_rows: Option<u64>,
    columns: Vec<ColumnDescriptor>,
    schema: Schema,
    indices: Option<Vec<usize>>,
    rows: Vec<Vec<Value>>,
    error: Option<tabula_core::Error>,
}

impl RowCollector {
    /// Collect every column of every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the named columns, in the given order
    pub fn with_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.selection = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Stop after `max_rows` rows
    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Rows collected so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn is_full(&self) -> bool {
        self.max_rows
            .is_some_and(|max| self.rows.len() as u64 >= max)
    }

    /// The collected rows, or the projection error that cut the read short.
    pub fn finish(self) -> tabula_core::Result<CollectedRows> {
        if let Some(err) = self.error {
            return Err(err);
        }
        // columns seen without a data phase never reached the schema
        let schema = if self.schema.is_empty() {
            Schema::new(self.columns)
        } else {
            self.schema
        };
        let columns = match &self.indices {
            Some(indices) => indices
                .iter()
                .filter_map(|&i| schema.column(i).cloned())
                .collect(),
            None => schema.columns().to_vec(),
        };
        Ok(CollectedRows {
            columns,
            rows: self.rows,
        })
    }
}

impl SasReaderCallback for RowCollector {
    fn column(&mut self, column: &ColumnDescriptor) {
        self.columns.push(column.clone());
    }

    fn read_data(&mut self) -> bool {
        self.schema = Schema::new(std::mem::take(&mut self.columns));
        if let Some(names) = &self.selection {
            match self.schema.resolve(names) {
                Ok(indices) => self.indices = Some(indices),
                Err(err) => {
                    self.error = Some(err);
                    return false;
                }
            }
        }
        !self.is_full()
    }

    fn row(&mut self, _row_number: u64, values: &[Value]) -> bool {
        let row = match &self.indices {
            Some(indices) => match self.schema.project(values, indices) {
                Ok(row) => row,
                Err(err) => {
                    self.error = Some(err);
                    return false;
                }
            },
            None => values.to_vec(),
        };
        self.rows.push(row);
        !self.is_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabula_core::ColumnType;

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new(0, "id", ColumnType::Character).with_length(5),
            ColumnDescriptor::new(1, "mois", ColumnType::Numeric).with_length(8),
            ColumnDescriptor::new(2, "brand", ColumnType::Character).with_length(1),
        ]
    }

    fn row(i: u64) -> Vec<Value> {
        vec![
            Value::character(format!("{i:05}")),
            Value::Numeric(i as f64),
            Value::character("A"),
        ]
    }

    /// Drive a callback the way the reader does.
    fn drive<C: SasReaderCallback>(cb: &mut C, rows: u64) -> u64 {
        for column in columns() {
            cb.column(&column);
        }
        if !cb.read_data() {
            return 0;
        }
        let mut delivered = 0;
        for i in 1..=rows {
            delivered += 1;
            if !cb.row(i, &row(i)) {
                break;
            }
        }
        delivered
    }

    #[test]
    fn test_counting() {
        let mut cb = CountingCallback::new();
        assert_eq!(drive(&mut cb, 30), 30);
        assert_eq!(cb.count(), 30);
    }

    #[test]
    fn test_column_collector_skips_rows() {
        let mut cb = ColumnCollector::new();
        assert_eq!(drive(&mut cb, 30), 0);
        assert_eq!(cb.into_schema().names(), vec!["id", "mois", "brand"]);
    }

    #[test]
    fn test_row_collector_limit() {
        let mut cb = RowCollector::new().with_max_rows(4);
        assert_eq!(drive(&mut cb, 30), 4);
        let collected = cb.finish().unwrap();
        assert_eq!(collected.rows.len(), 4);
        assert_eq!(collected.rows[3], row(4));
        assert_eq!(collected.columns, columns());
    }

    #[test]
    fn test_row_collector_zero_limit() {
        let mut cb = RowCollector::new().with_max_rows(0);
        assert_eq!(drive(&mut cb, 30), 0);
        assert!(cb.finish().unwrap().rows.is_empty());
    }

    #[test]
    fn test_row_collector_projection() {
        let mut cb = RowCollector::new().with_columns(["brand", "id"]);
        assert_eq!(drive(&mut cb, 2), 2);
        let collected = cb.finish().unwrap();
        assert_eq!(
            collected.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["brand", "id"]
        );
        assert_eq!(
            collected.rows[1],
            vec![Value::character("A"), Value::character("00002")]
        );
    }

    #[test]
    fn test_row_collector_unknown_column() {
        let mut cb = RowCollector::new().with_columns(["nope"]);
        assert_eq!(drive(&mut cb, 5), 0);
        assert!(matches!(
            cb.finish(),
            Err(tabula_core::Error::ColumnNotFound(n)) if n == "nope"
        ));
    }

    #[test]
    fn test_row_collector_rejects_short_row() {
        let mut cb = RowCollector::new().with_columns(["brand"]);
        for column in columns() {
            cb.column(&column);
        }
        assert!(cb.read_data());
        assert!(cb.row(1, &row(1)));
        assert!(!cb.row(2, &row(2)[..2]));
        assert!(matches!(
            cb.finish(),
            Err(tabula_core::Error::RowWidthMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn test_mut_ref_forwarding() {
        let mut counter = CountingCallback::new();
        {
            let mut by_ref = &mut counter;
            drive(&mut by_ref, 3);
        }
        assert_eq!(counter.count(), 3);
    }
}
