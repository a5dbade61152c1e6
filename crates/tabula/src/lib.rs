//! # tabula
//!
//! Query-a-table access to SAS7BDAT datasets.
//!
//! A [`SasCatalog`] is a directory of `.sas7bdat` files; each file is a
//! [`SasTable`] that can enumerate its columns, materialize rows for a
//! column subset up to a row limit, and count its rows. Every query is a
//! forward-only streaming pass over the file, so datasets larger than memory
//! can be counted or sampled.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tabula::prelude::*;
//!
//! let catalog = SasCatalog::open("datasets")?;
//! for table in catalog.tables()? {
//!     println!("{}: {} columns", table.name(), table.columns()?.len());
//! }
//!
//! let pizza = catalog.table("pizza")?;
//! let sample = pizza.rows(&TableQuery::all().with_columns(["id", "brand"]).with_max_rows(5))?;
//! for row in &sample.rows {
//!     println!("{row:?}");
//! }
//! # Ok::<(), tabula::TableError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod prelude;
pub mod table;

pub use catalog::{is_sas_directory, is_sas_file, SasCatalog};
pub use error::{TableError, TableResult};
pub use table::{table_name, SasTable, TableQuery, SAS_EXTENSION};

// Re-export core types
pub use tabula_core::{ColumnDescriptor, ColumnType, Error, Result, Schema, Value};

// Re-export reader types
pub use tabula_sas::{
    is_magic_number, CollectedRows, ColumnCollector, CountingCallback, FileHeader, LayoutPolicy,
    ReadSummary, RowCollector, SasError, SasReadOptions, SasReader, SasReaderCallback, SasResult,
};
