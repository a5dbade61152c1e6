//! A single dataset file exposed as a table.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tabula_core::Schema;
use tabula_sas::{
    CollectedRows, ColumnCollector, CountingCallback, ReadSummary, RowCollector, SasReadOptions,
    SasReader, SasReaderCallback,
};

use crate::error::TableResult;

/// File suffix of SAS datasets.
pub const SAS_EXTENSION: &str = ".sas7bdat";

/// Which columns and how many rows to materialize.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    /// Column names in output order (default: all columns)
    pub columns: Option<Vec<String>>,
    /// Maximum number of rows (default: all rows)
    pub max_rows: Option<u64>,
}

impl TableQuery {
    /// Every column of every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Select columns by name
    pub fn with_columns<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.columns = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Limit the number of rows
    pub fn with_max_rows(mut self, max_rows: u64) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Table name for a dataset path: the file name without `.sas7bdat`.
pub fn table_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(SAS_EXTENSION) {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

/// A SAS7BDAT file queried as a table.
///
/// Nothing is read until a query runs. The schema is loaded by a
/// columns-only read the first time it is needed and kept afterwards; rows
/// and counts always re-read the file.
#[derive(Debug)]
pub struct SasTable {
    path: PathBuf,
    name: String,
    reader: SasReader,
    schema: OnceLock<Schema>,
}

impl SasTable {
    /// Refer to the dataset at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::with_options(path, SasReadOptions::default())
    }

    /// Refer to the dataset at `path`, reading it with `options`
    pub fn with_options<P: AsRef<Path>>(path: P, options: SasReadOptions) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: table_name(&path),
            path,
            reader: SasReader::with_options(options),
            schema: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The table's columns
    pub fn columns(&self) -> TableResult<&Schema> {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }
        let mut collector = ColumnCollector::new();
        self.reader.read_file(&self.path, &mut collector)?;
        Ok(self.schema.get_or_init(|| collector.into_schema()))
    }

    /// Materialize the rows selected by `query`
    pub fn rows(&self, query: &TableQuery) -> TableResult<CollectedRows> {
        let mut collector = RowCollector::new();
        if let Some(columns) = &query.columns {
            collector = collector.with_columns(columns.iter().cloned());
        }
        if let Some(max_rows) = query.max_rows {
            collector = collector.with_max_rows(max_rows);
        }
        self.reader.read_file(&self.path, &mut collector)?;
        Ok(collector.finish()?)
    }

    /// Count the rows
    pub fn count(&self) -> TableResult<u64> {
        let mut counter = CountingCallback::new();
        self.reader.read_file(&self.path, &mut counter)?;
        log::debug!("({}) counted {} rows", self.path.display(), counter.count());
        Ok(counter.count())
    }

    /// Stream the file through a custom callback
    pub fn read<C: SasReaderCallback + ?Sized>(&self, callback: &mut C) -> TableResult<ReadSummary> {
        Ok(self.reader.read_file(&self.path, callback)?)
    }
}
