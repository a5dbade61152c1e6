//! Prelude module - common imports for tabula users
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

pub use crate::{
    // Core types
    ColumnDescriptor,
    ColumnType,
    Schema,
    Value,

    // Tables
    SasCatalog,
    SasTable,
    TableQuery,

    // Reading
    CountingCallback,
    SasReadOptions,
    SasReader,
    SasReaderCallback,

    // Error types
    TableError,
    TableResult,
};
