//! # tabula-sas
//!
//! Streaming reader for SAS7BDAT dataset files.
//!
//! The reader decodes the file header, walks the fixed-size pages in order,
//! resolves the column catalog from the metadata subheaders and pushes each
//! decoded row to a [`SasReaderCallback`]. Only one page is held in memory at
//! a time, so files larger than memory can be scanned.
//!
//! Only the uncompressed little-endian 32-bit layout is decoded; see
//! [`LayoutPolicy`] for how other layouts are treated.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tabula_sas::{CountingCallback, SasReader};
//!
//! let mut counter = CountingCallback::new();
//! SasReader::new().read_file("pizza.sas7bdat", &mut counter)?;
//! println!("{} rows", counter.count());
//! # Ok::<(), tabula_sas::SasError>(())
//! ```

pub mod callback;
pub mod datetime;
pub mod error;
pub mod format;
pub mod header;
pub mod metadata;
pub mod options;
pub mod page;
pub mod reader;
pub mod rows;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use callback::{CollectedRows, ColumnCollector, CountingCallback, RowCollector, SasReaderCallback};
pub use error::{DateConversionError, SasError, SasResult};
pub use header::{is_magic_number, FileHeader};
pub use options::{LayoutPolicy, SasReadOptions};
pub use reader::{ReadSummary, SasReader};
